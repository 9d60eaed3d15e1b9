//! OpenAPI → model graph resolution
//!
//! Turns an already-bundled OpenAPI 3.x document into a [`TypeGraph`]: every
//! schema becomes a named [`Model`](typegraph_common::Model), every operation
//! an [`Operation`](typegraph_common::Operation) record, and the models that
//! need a declaration come out in dependency order.
//!
//! ## Pass structure
//! 1. `components.schemas` are built in document order
//! 2. Paths and operations are processed, reusing the registry from step 1
//! 3. Emission candidates are sorted so dependencies come first
//!
//! Any error aborts the pass; nothing partial is returned.
//!
//! ## Usage
//! ```rust,ignore
//! use typegraph_parser::OpenApiParser;
//!
//! let graph = OpenApiParser::from_file("petstore.yaml")?.parse()?;
//! ```

pub mod builder;
pub mod classifier;
mod composition;
pub mod naming;
pub mod openapi;
pub mod operations;
pub mod reference;
pub mod sorter;

pub use builder::ModelBuilder;
pub use classifier::{classify, SchemaKind};
pub use openapi::{OpenApiDocument, OpenApiParser};
pub use operations::process_operations;
pub use sorter::{emission_candidates, sort_by_dependencies};

use tracing::info;
use typegraph_common::{Result, TypeGraph};

/// Run one full build pass over `document`
pub fn process_document(document: &OpenApiDocument) -> Result<TypeGraph> {
    let mut builder = ModelBuilder::new(document);
    builder.build_components()?;
    let operations = process_operations(&mut builder)?;
    let (models, advisories) = builder.finish();

    let candidates = emission_candidates(&models);
    let ordered: Vec<String> = sort_by_dependencies(&models, &candidates)?
        .into_iter()
        .map(|model| model.name.clone())
        .collect();

    info!(
        models = models.len(),
        ordered = ordered.len(),
        paths = operations.len(),
        advisories = advisories.len(),
        "type graph built"
    );

    Ok(TypeGraph {
        models,
        operations,
        ordered,
        advisories,
    })
}
