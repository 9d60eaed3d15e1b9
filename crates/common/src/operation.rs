//! Operation records derived from `paths`
//!
//! Operations never own models; every schema is referenced by its registry
//! name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods an OpenAPI path item can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// All methods in processing order
    pub const ALL: [HttpMethod; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Header,
    Query,
    Cookie,
}

impl ParameterLocation {
    /// Order in which parameter containers are synthesized
    pub const CONTAINER_ORDER: [ParameterLocation; 4] =
        [Self::Query, Self::Header, Self::Path, Self::Cookie];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Header => "header",
            Self::Query => "query",
            Self::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationParameter {
    /// Parameter name as written in the document
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Set when the parameter declares `content` instead of `schema`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Registry name of the parameter's schema model
    pub schema: String,
}

/// Mime type → model name, plus the primary (first) model
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaContent {
    pub content: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl MediaContent {
    pub fn insert(&mut self, mime_type: &str, model: String) {
        if self.schema.is_none() {
            self.schema = Some(model.clone());
        }
        self.content.insert(mime_type.to_string(), model);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(flatten)]
    pub media: MediaContent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub media: MediaContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub path: String,
    pub method: HttpMethod,
    /// Canonical name (escaped `operationId` or `<method>-<path>`)
    pub name: String,
    /// SCREAMING_SNAKE variant of `name`
    pub constant_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    /// Path-level parameters merged with operation-level ones
    pub parameters: Vec<OperationParameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Status code → response
    pub responses: IndexMap<String, Response>,
    /// Location → registry name of the synthesized container model
    pub parameter_models: IndexMap<ParameterLocation, String>,
}

impl Operation {
    /// Parameters carried in `location`, in merged order
    pub fn parameters_in(
        &self,
        location: ParameterLocation,
    ) -> impl Iterator<Item = &OperationParameter> + '_ {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }

    /// Registry name of the container model for `location`
    pub fn parameter_model(&self, location: ParameterLocation) -> Option<&str> {
        self.parameter_models.get(&location).map(String::as_str)
    }
}
