//! OpenAPI 3.x document model and intake
//!
//! The document must already be bundled: every `$ref` is local (`#/...`).
//!
//! ## Usage
//! ```rust,ignore
//! use typegraph_parser::openapi::OpenApiParser;
//!
//! let parser = OpenApiParser::from_file("petstore.yaml")?;
//! let graph = parser.parse()?;
//! for model in graph.ordered_models() {
//!     println!("{}", model.name);
//! }
//! ```

mod parser;
mod types;

pub use parser::OpenApiParser;
pub use types::*;
