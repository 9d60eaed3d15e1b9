//! Local reference resolution
//!
//! Follows `#/...` JSON pointers inside an already-bundled document. External
//! references are expected to have been inlined by whatever loaded the
//! document.

use crate::openapi::{OpenApiDocument, Parameter, RequestBody, Response, Schema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;
use typegraph_common::{Result, TypeGraphError};

/// Document nodes that may be a `$ref` in place of a definition
pub trait Referenceable: DeserializeOwned + Clone {
    fn reference(&self) -> Option<&str>;
}

impl Referenceable for Schema {
    fn reference(&self) -> Option<&str> {
        self.ref_path.as_deref()
    }
}

impl Referenceable for Parameter {
    fn reference(&self) -> Option<&str> {
        self.ref_path.as_deref()
    }
}

impl Referenceable for RequestBody {
    fn reference(&self) -> Option<&str> {
        self.ref_path.as_deref()
    }
}

impl Referenceable for Response {
    fn reference(&self) -> Option<&str> {
        self.ref_path.as_deref()
    }
}

/// Resolve `node` if it is a reference; pass it through otherwise
///
/// Reference chains are followed until a definition is reached.
pub fn resolve<'a, T: Referenceable>(
    document: &OpenApiDocument,
    node: &'a T,
) -> Result<Cow<'a, T>> {
    let Some(first) = node.reference() else {
        return Ok(Cow::Borrowed(node));
    };

    let mut visited = vec![first.to_string()];
    let mut target = follow_reference(document.raw(), first)?;

    while let Some(next) = target.get("$ref").and_then(Value::as_str) {
        if visited.iter().any(|seen| seen == next) {
            return Err(malformed(first, "reference chain loops back on itself"));
        }
        visited.push(next.to_string());
        target = follow_reference(document.raw(), next)?;
    }

    let resolved = T::deserialize(target)
        .map_err(|e| malformed(first, &format!("target has an unexpected shape: {}", e)))?;
    Ok(Cow::Owned(resolved))
}

/// Follow a local `#/...` reference from the document root
pub fn follow_reference<'v>(root: &'v Value, reference: &str) -> Result<&'v Value> {
    let pointer = reference
        .strip_prefix('#')
        .ok_or_else(|| malformed(reference, "external reference was not bundled"))?;

    if pointer.is_empty() {
        return Ok(root);
    }
    let pointer = pointer
        .strip_prefix('/')
        .ok_or_else(|| malformed(reference, "pointer must start with '/'"))?;

    pointer.split('/').try_fold(root, |node, raw| {
        let segment = unescape_segment(raw);
        let next = match node {
            Value::Object(map) => map.get(&*segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        next.ok_or_else(|| malformed(reference, &format!("segment '{}' not found", segment)))
    })
}

/// Undo JSON pointer escaping (`~1` → `/`, then `~0` → `~`)
pub fn unescape_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') {
        Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(segment)
    }
}

fn malformed(reference: &str, reason: &str) -> TypeGraphError {
    TypeGraphError::MalformedReference {
        reference: reference.to_string(),
        reason: reason.to_string(),
    }
}
