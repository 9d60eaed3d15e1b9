//! Structural schema classification
//!
//! Classification looks at which keywords are present, not at a declared tag,
//! so `{ "properties": {...} }` without `type` is still an object.

use crate::openapi::Schema;
use typegraph_common::PrimitiveType;

/// The four structural shapes a resolved schema can take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Primitive(PrimitiveType),
    Array,
    Object,
    Composition,
}

/// Classify a resolved (non-`$ref`) schema
///
/// Checks run primitive, array, object, composition; the first match wins.
/// Composition keywords on an object node leave it an object. `enum` only
/// affects naming. Returns `None` when no structural signal is present.
pub fn classify(schema: &Schema) -> Option<SchemaKind> {
    let declared = schema.declared_type();

    if let Some(primitive) = declared.and_then(PrimitiveType::from_keyword) {
        return Some(SchemaKind::Primitive(primitive));
    }
    if declared == Some("array") || schema.items.is_some() {
        return Some(SchemaKind::Array);
    }
    if declared == Some("object")
        || schema.properties.is_some()
        || schema.additional_properties.is_some()
    {
        return Some(SchemaKind::Object);
    }
    if schema.has_composition() {
        return Some(SchemaKind::Composition);
    }
    None
}

/// Whether a schema is an unnamed-primitive candidate
pub fn is_primitive(schema: &Schema) -> bool {
    matches!(classify(schema), Some(SchemaKind::Primitive(_)))
}
