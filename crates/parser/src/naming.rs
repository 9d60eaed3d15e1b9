//! Identifier canonicalization
//!
//! Every model and operation name goes through here so the same input always
//! produces the same identifier.

use crate::reference::unescape_segment;
use typegraph_common::{ModelRegistry, Result, TypeGraphError};

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Drop non-identifier characters, capitalizing the character after each
/// dropped run and the first character
///
/// Unlike [`escape_name`] this never adds a leading underscore, so it is the
/// right tool for fragments appended to an existing name.
pub fn pascal_segment(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    let mut capitalize_next = true;

    for ch in raw.chars() {
        if !is_identifier_char(ch) {
            capitalize_next = true;
            continue;
        }
        if capitalize_next {
            name.push(ch.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            name.push(ch);
        }
    }

    name
}

/// Canonical PascalCase identifier
///
/// # Examples
/// ```
/// use typegraph_parser::naming::escape_name;
///
/// assert_eq!(escape_name("my-schema"), "MySchema");
/// assert_eq!(escape_name("get-/pets/{petId}"), "GetPetsPetId");
/// assert_eq!(escape_name("2fa-token"), "_2faToken");
/// ```
pub fn escape_name(raw: &str) -> String {
    prefix_leading_digit(pascal_segment(raw))
}

/// SCREAMING_SNAKE_CASE constant name for an operation
///
/// Kept characters are joined without a separator before upper-casing.
///
/// ```
/// use typegraph_parser::naming::to_constant_name;
///
/// assert_eq!(to_constant_name("listPets"), "LISTPETS");
/// ```
pub fn to_constant_name(raw: &str) -> String {
    let joined: String = raw
        .chars()
        .filter(|ch| is_identifier_char(*ch))
        .map(|ch| ch.to_ascii_uppercase())
        .collect();
    prefix_leading_digit(joined)
}

fn prefix_leading_digit(name: String) -> String {
    if name.starts_with(|ch: char| ch.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    }
}

/// Capitalize the first character, leaving the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Model name for a `#/components/<section>/<name>` reference
pub fn name_from_reference(reference: &str) -> Result<String> {
    let segment = reference.split('/').nth(3).ok_or_else(|| {
        TypeGraphError::MalformedReference {
            reference: reference.to_string(),
            reason: "expected '#/components/<section>/<name>'".to_string(),
        }
    })?;
    Ok(escape_name(&unescape_segment(segment)))
}

/// First of `name`, `name2`, `name3`, ... that the registry does not hold
pub fn unique_name(registry: &ModelRegistry, name: &str) -> String {
    first_free_name(name, |candidate| registry.contains(candidate))
}

/// First of `name`, `name2`, `name3`, ... for which `taken` is false
pub fn first_free_name(name: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(name) {
        return name.to_string();
    }
    (2..)
        .map(|counter| format!("{}{}", name, counter))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// Pick a registry name for a synthesized model, escalating on collision
///
/// Tries `base`, then `base` + `Qualifier`, then `Parent` + that composite,
/// numbered if even that is taken. The result depends only on what the
/// registry holds at call time.
pub fn allocate_name(
    registry: &ModelRegistry,
    base: &str,
    qualifier: &str,
    parent: &str,
) -> String {
    let candidate = escape_name(base);
    if !registry.contains(&candidate) {
        return candidate;
    }

    let qualified = format!("{}{}", base, capitalize(qualifier));
    let candidate = escape_name(&qualified);
    if !registry.contains(&candidate) {
        return candidate;
    }

    unique_name(
        registry,
        &escape_name(&format!("{}{}", parent, capitalize(&qualified))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use typegraph_common::{Documentation, Model, ModelKind, PrimitiveModel, PrimitiveType};

    fn primitive(name: &str) -> Model {
        Model {
            name: name.to_string(),
            nullable: false,
            docs: Documentation::default(),
            reference: None,
            dependencies: vec![],
            kind: ModelKind::Primitive(PrimitiveModel {
                primitive_type: PrimitiveType::String,
                format: None,
                enum_values: None,
                numeric: Default::default(),
                string: Default::default(),
            }),
        }
    }

    #[test]
    fn test_escape_name() {
        assert_eq!(escape_name("my-schema"), "MySchema");
        assert_eq!(escape_name("pet_store"), "Pet_store");
        assert_eq!(escape_name("application/json"), "ApplicationJson");
        assert_eq!(escape_name("v1.Pod"), "V1Pod");
        assert_eq!(escape_name("404"), "_404");
        assert_eq!(escape_name("héllo wörld"), "HLloWRld");
        assert_eq!(escape_name(""), "");
        assert_eq!(escape_name("---"), "");
    }

    #[test]
    fn test_escape_name_is_idempotent() {
        let inputs = [
            "my-schema",
            "get-/pets/{petId}",
            "2fa",
            "_private",
            "already_Canonical",
            "x-y-z",
            "0",
            "a b\tc",
        ];
        for input in inputs {
            let once = escape_name(input);
            assert_eq!(escape_name(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_pascal_segment_keeps_leading_digit() {
        assert_eq!(pascal_segment("200"), "200");
        assert_eq!(pascal_segment("default"), "Default");
        assert_eq!(pascal_segment("date-time"), "DateTime");
    }

    #[test]
    fn test_to_constant_name() {
        assert_eq!(to_constant_name("ListPets"), "LISTPETS");
        assert_eq!(to_constant_name("get-/pets"), "GETPETS");
        assert_eq!(to_constant_name("3d-model"), "_3DMODEL");
    }

    #[test]
    fn test_name_from_reference() {
        assert_eq!(
            name_from_reference("#/components/schemas/my-schema").unwrap(),
            "MySchema"
        );
        assert_eq!(
            name_from_reference("#/components/schemas/Pet/properties/name").unwrap(),
            "Pet"
        );
        assert_eq!(
            name_from_reference("#/components/schemas/a~1b").unwrap(),
            "AB"
        );
        assert!(name_from_reference("#/definitions").is_err());
    }

    #[test]
    fn test_allocate_name_escalates() {
        let mut registry = ModelRegistry::new();
        assert_eq!(allocate_name(&registry, "id", "pathParam", "GetPet"), "Id");

        registry.register(primitive("Id"));
        assert_eq!(
            allocate_name(&registry, "id", "pathParam", "GetPet"),
            "IdPathParam"
        );

        registry.register(primitive("IdPathParam"));
        assert_eq!(
            allocate_name(&registry, "id", "pathParam", "GetPet"),
            "GetPetIdPathParam"
        );

        registry.register(primitive("GetPetIdPathParam"));
        assert_eq!(
            allocate_name(&registry, "id", "pathParam", "GetPet"),
            "GetPetIdPathParam2"
        );
    }

    #[test]
    fn test_unique_name_numbers_taken_names() {
        let mut registry = ModelRegistry::new();
        assert_eq!(unique_name(&registry, "GetABResponseBody"), "GetABResponseBody");

        registry.register(primitive("GetABResponseBody"));
        assert_eq!(unique_name(&registry, "GetABResponseBody"), "GetABResponseBody2");

        registry.reserve("GetABResponseBody2");
        assert_eq!(unique_name(&registry, "GetABResponseBody"), "GetABResponseBody3");
    }
}
