//! OpenAPI 3.x type definitions
//!
//! Only the structural keywords the model builder reads are typed; anything
//! else on a schema lands in `extensions`. Maps are `IndexMap` so iteration
//! follows document order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use typegraph_common::{HttpMethod, ParameterLocation, Result, TypeGraphError};

/// OpenAPI document root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenApiSpec {
    /// OpenAPI version (e.g., "3.0.3")
    #[serde(default)]
    pub openapi: String,

    /// API metadata
    #[serde(default)]
    pub info: Option<Info>,

    /// API paths (endpoints)
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    /// Reusable components
    #[serde(default)]
    pub components: Option<Components>,
}

/// API information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,

    /// API version
    pub version: String,

    /// API description
    #[serde(default)]
    pub description: Option<String>,
}

/// Path item (operations for a path)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub get: Option<Operation>,

    #[serde(default)]
    pub put: Option<Operation>,

    #[serde(default)]
    pub post: Option<Operation>,

    #[serde(default)]
    pub delete: Option<Operation>,

    #[serde(default)]
    pub options: Option<Operation>,

    #[serde(default)]
    pub head: Option<Operation>,

    #[serde(default)]
    pub patch: Option<Operation>,

    #[serde(default)]
    pub trace: Option<Operation>,

    /// Parameters shared by every operation on this path
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    /// Operation ID (unique identifier)
    #[serde(rename = "operationId")]
    #[serde(default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub deprecated: bool,

    /// Tags (for grouping)
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(rename = "requestBody")]
    #[serde(default)]
    pub request_body: Option<RequestBody>,

    /// Status code → response
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// Parameter definition, or a reference to one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "$ref")]
    #[serde(default)]
    pub ref_path: Option<String>,

    /// Parameter name
    #[serde(default)]
    pub name: String,

    /// Location: query, header, path, cookie
    #[serde(rename = "in")]
    #[serde(default)]
    pub location: Option<ParameterLocation>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub deprecated: bool,

    #[serde(default)]
    pub schema: Option<Schema>,

    /// Single-entry media type map, used instead of `schema`
    #[serde(default)]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// Request body, or a reference to one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(rename = "$ref")]
    #[serde(default)]
    pub ref_path: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Content types
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

/// Response, or a reference to one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "$ref")]
    #[serde(default)]
    pub ref_path: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Content types
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// Media type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<Schema>,
}

/// `additionalProperties` is either a flag or a schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Any(bool),
    Schema(Box<Schema>),
}

/// `exclusiveMaximum`/`exclusiveMinimum`: a flag in 3.0, a bound in 3.1
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
    Flag(bool),
    Limit(f64),
}

/// `type`: a single keyword in 3.0, optionally a list in 3.1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    List(Vec<String>),
}

impl SchemaType {
    /// First declared keyword other than `"null"`
    pub fn keyword(&self) -> Option<&str> {
        match self {
            SchemaType::Single(keyword) => Some(keyword.as_str()),
            SchemaType::List(keywords) => keywords.iter().map(String::as_str).find(|k| *k != "null"),
        }
        .filter(|keyword| *keyword != "null")
    }

    /// Whether `"null"` is one of the declared keywords
    pub fn admits_null(&self) -> bool {
        match self {
            SchemaType::Single(keyword) => keyword == "null",
            SchemaType::List(keywords) => keywords.iter().any(|k| k == "null"),
        }
    }
}

/// Discriminator object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName")]
    pub property_name: String,

    /// Discriminator value → reference
    #[serde(default)]
    pub mapping: Option<IndexMap<String, String>>,
}

/// Schema definition, or a reference to one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "$ref")]
    #[serde(default)]
    pub ref_path: Option<String>,

    /// Type: string, number, integer, boolean, array, object
    #[serde(rename = "type")]
    #[serde(default)]
    pub schema_type: Option<SchemaType>,

    /// Format (e.g., int32, int64, date-time)
    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub nullable: Option<bool>,

    #[serde(default)]
    pub deprecated: Option<bool>,

    #[serde(default)]
    pub default: Option<Value>,

    #[serde(rename = "enum")]
    #[serde(default)]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default)]
    pub multiple_of: Option<f64>,

    #[serde(default)]
    pub maximum: Option<f64>,

    #[serde(default)]
    pub exclusive_maximum: Option<ExclusiveBound>,

    #[serde(default)]
    pub minimum: Option<f64>,

    #[serde(default)]
    pub exclusive_minimum: Option<ExclusiveBound>,

    #[serde(default)]
    pub max_length: Option<u64>,

    #[serde(default)]
    pub min_length: Option<u64>,

    #[serde(default)]
    pub pattern: Option<String>,

    /// Items schema (for array type)
    #[serde(default)]
    pub items: Option<Box<Schema>>,

    #[serde(default)]
    pub max_items: Option<u64>,

    #[serde(default)]
    pub min_items: Option<u64>,

    #[serde(default)]
    pub unique_items: Option<bool>,

    /// Properties (for object type)
    #[serde(default)]
    pub properties: Option<IndexMap<String, Schema>>,

    /// Required properties
    #[serde(default)]
    pub required: Vec<String>,

    #[serde(default)]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(default)]
    pub max_properties: Option<u64>,

    #[serde(default)]
    pub min_properties: Option<u64>,

    #[serde(default)]
    pub one_of: Option<Vec<Schema>>,

    #[serde(default)]
    pub any_of: Option<Vec<Schema>>,

    #[serde(default)]
    pub all_of: Option<Vec<Schema>>,

    #[serde(default)]
    pub discriminator: Option<Discriminator>,

    /// Extensions (x-*, etc.)
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Schema {
    /// Reference node pointing at `ref_path`
    pub fn reference(ref_path: &str) -> Self {
        Self {
            ref_path: Some(ref_path.to_string()),
            ..Self::default()
        }
    }

    /// Declared structural type, ignoring a 3.1 `"null"` member
    pub fn declared_type(&self) -> Option<&str> {
        self.schema_type.as_ref().and_then(SchemaType::keyword)
    }

    /// `nullable: true`, or `"null"` listed in `type`
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
            || self.schema_type.as_ref().is_some_and(SchemaType::admits_null)
    }

    /// Whether any of `oneOf`/`anyOf`/`allOf` is present
    pub fn has_composition(&self) -> bool {
        self.one_of.is_some() || self.any_of.is_some() || self.all_of.is_some()
    }
}

/// Reusable components
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,

    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,

    #[serde(rename = "requestBodies")]
    #[serde(default)]
    pub request_bodies: IndexMap<String, RequestBody>,

    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// An already-bundled document
///
/// The raw JSON tree is kept next to the typed view so local pointers can
/// reach any node, including ones inside schemas (`.../oneOf/0`).
#[derive(Debug, Clone)]
pub struct OpenApiDocument {
    raw: Value,
    spec: OpenApiSpec,
}

impl OpenApiDocument {
    /// Build from a parsed JSON tree
    pub fn from_value(raw: Value) -> Result<Self> {
        let spec: OpenApiSpec = serde_json::from_value(raw.clone()).map_err(|e| {
            TypeGraphError::Parse(format!("Document is not a valid OpenAPI object: {}", e))
        })?;
        Ok(Self { raw, spec })
    }

    /// Raw JSON tree
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Typed view
    pub fn spec(&self) -> &OpenApiSpec {
        &self.spec
    }

    /// `components.schemas`, or nothing
    pub fn component_schemas(&self) -> impl Iterator<Item = (&String, &Schema)> + '_ {
        self.spec
            .components
            .iter()
            .flat_map(|components| components.schemas.iter())
    }
}

impl PathItem {
    /// Declared operations in processing order
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL.into_iter().filter_map(move |method| {
            let op = match method {
                HttpMethod::Get => self.get.as_ref(),
                HttpMethod::Put => self.put.as_ref(),
                HttpMethod::Post => self.post.as_ref(),
                HttpMethod::Delete => self.delete.as_ref(),
                HttpMethod::Options => self.options.as_ref(),
                HttpMethod::Head => self.head.as_ref(),
                HttpMethod::Patch => self.patch.as_ref(),
                HttpMethod::Trace => self.trace.as_ref(),
            };
            op.map(|op| (method, op))
        })
    }
}
