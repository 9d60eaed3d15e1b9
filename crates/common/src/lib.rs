//! Common types for the typegraph crates
//!
//! This crate holds the contract between the resolution engine and code
//! emitters: the `Model` graph, the `ModelRegistry` that owns it, the
//! per-path `Operation` records and the error and advisory types.

mod model;
mod operation;

pub use model::{
    ArrayModel, CompositionBranch, CompositionModel, CompositionType, Documentation, Model,
    ModelKind, ModelRef, ModelRegistry, NumericConstraints, ObjectModel, ObjectProperty,
    PrimitiveModel, PrimitiveType, StringConstraints,
};
pub use operation::{
    HttpMethod, MediaContent, Operation, OperationParameter, ParameterLocation, RequestBody,
    Response,
};

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// Errors that abort a build pass
#[derive(Error, Debug)]
pub enum TypeGraphError {
    #[error("Malformed reference '{reference}': {reason}")]
    MalformedReference { reference: String, reason: String },

    #[error("Schema for '{name}' matches no primitive, array, object or composition shape")]
    UnknownSchemaShape { name: String },

    #[error("Circular dependency between models: {}", models.join(", "))]
    CircularDependency { models: Vec<String> },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for typegraph operations
pub type Result<T> = std::result::Result<T, TypeGraphError>;

/// Non-fatal findings recorded during a build pass
///
/// Advisories never abort the pass; the input was resolved deterministically
/// and the advisory records which choice was made.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Advisory {
    #[error("Model '{model}' declares several composition keywords ({}); using {}", keywords.join(", "), keywords[0])]
    AmbiguousComposition { model: String, keywords: Vec<String> },

    #[error("Discriminator value '{value}' of '{model}' maps to '{target}', which matches no branch")]
    UnresolvedDiscriminatorMapping {
        model: String,
        value: String,
        target: String,
    },

    #[error("Model name '{requested}' is already taken; using '{allocated}'")]
    NameCollision { requested: String, allocated: String },
}

/// Everything a build pass produces, handed to emitters
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeGraph {
    /// Every named model, keyed by canonical name
    pub models: ModelRegistry,

    /// Operations grouped by path, in document order
    pub operations: IndexMap<String, Vec<Operation>>,

    /// Names of the emittable models in dependency order
    pub ordered: Vec<String>,

    /// Non-fatal findings
    pub advisories: Vec<Advisory>,
}

impl TypeGraph {
    /// Emittable models in dependency order
    pub fn ordered_models(&self) -> impl Iterator<Item = &Model> + '_ {
        self.ordered.iter().filter_map(|name| self.models.get(name))
    }

    /// Look up the operations declared for a path
    pub fn operations_for(&self, path: &str) -> &[Operation] {
        self.operations.get(path).map(Vec::as_slice).unwrap_or(&[])
    }
}
