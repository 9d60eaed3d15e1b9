//! OpenAPI document intake

use super::types::OpenApiDocument;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;
use typegraph_common::{Result, TypeGraph, TypeGraphError};

/// Loads an already-bundled OpenAPI 3.x document and runs a build pass on it
pub struct OpenApiParser {
    document: OpenApiDocument,
}

impl OpenApiParser {
    /// Load a document from disk
    ///
    /// `.yaml` and `.yml` files are read as YAML, anything else as JSON.
    ///
    /// # Example
    /// ```rust,ignore
    /// let graph = OpenApiParser::from_file("petstore.yaml")?.parse()?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TypeGraphError::Parse(format!(
                "Failed to read OpenAPI file {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        info!(path = %path.display(), yaml = is_yaml, "loading document");

        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(json)?;
        Self::from_value(raw)
    }

    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(raw)
    }

    /// Wrap an already-parsed JSON tree
    pub fn from_value(raw: Value) -> Result<Self> {
        Ok(Self {
            document: OpenApiDocument::from_value(raw)?,
        })
    }

    pub fn document(&self) -> &OpenApiDocument {
        &self.document
    }

    /// Run one full build pass
    pub fn parse(&self) -> Result<TypeGraph> {
        crate::process_document(&self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_file(suffix: &str) -> NamedTempFile {
        Builder::new().suffix(suffix).tempfile().unwrap()
    }

    #[test]
    fn test_parse_minimal_openapi() {
        let openapi_json = r#"{
            "openapi": "3.0.0",
            "info": {
                "title": "Test API",
                "version": "1.0.0"
            },
            "paths": {}
        }"#;

        let parser = OpenApiParser::from_json(openapi_json).unwrap();
        assert_eq!(parser.document().spec().openapi, "3.0.0");

        let graph = parser.parse().unwrap();
        assert!(graph.models.is_empty());
        assert!(graph.operations.is_empty());
    }

    #[test]
    fn test_parse_yaml() {
        let openapi_yaml = r#"
openapi: 3.0.3
info:
  title: Pets
  version: "1.0"
paths: {}
components:
  schemas:
    Pet:
      type: object
      properties:
        name:
          type: string
"#;

        let graph = OpenApiParser::from_yaml(openapi_yaml).unwrap().parse().unwrap();
        assert!(graph.models.get("Pet").is_some());
        assert_eq!(graph.ordered, vec!["Pet"]);
    }

    #[test]
    fn test_invalid_syntax_keeps_source_error() {
        let err = OpenApiParser::from_json("{ not json").err().unwrap();
        assert!(matches!(err, TypeGraphError::Json(_)));

        let err = OpenApiParser::from_yaml("paths: [").err().unwrap();
        assert!(matches!(err, TypeGraphError::Yaml(_)));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let err = OpenApiParser::from_json(r#"{ "paths": [] }"#).err().unwrap();
        assert!(matches!(err, TypeGraphError::Parse(_)));
    }

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let mut yaml = temp_file(".yaml");
        writeln!(yaml, "openapi: 3.1.0\npaths: {{}}").unwrap();
        let parser = OpenApiParser::from_file(yaml.path()).unwrap();
        assert_eq!(parser.document().spec().openapi, "3.1.0");

        let mut json = temp_file(".json");
        write!(json, r#"{{"openapi": "3.0.1", "paths": {{}}}}"#).unwrap();
        let parser = OpenApiParser::from_file(json.path()).unwrap();
        assert_eq!(parser.document().spec().openapi, "3.0.1");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = OpenApiParser::from_file("/nonexistent/openapi.json").err().unwrap();
        assert!(err.to_string().contains("/nonexistent/openapi.json"));
    }
}
