//! Model graph types
//!
//! A `Model` is the canonical, named form of one schema node. Models refer to
//! each other by name through `ModelRef`; the `ModelRegistry` owns every named
//! model produced by a build pass.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Canonical representation of a schema node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Canonical name, unique within the registry
    pub name: String,

    /// Whether `null` is an accepted value
    pub nullable: bool,

    /// Title, description, deprecation and default value
    #[serde(flatten)]
    pub docs: Documentation,

    /// The `$ref` this model was reached through, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Direct children only, in declaration order
    pub dependencies: Vec<ModelRef>,

    /// Variant-specific data
    #[serde(flatten)]
    pub kind: ModelKind,
}

/// Documentation metadata carried over from the schema
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Documentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub deprecated: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// The four structural variants
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "modelType", rename_all = "lowercase")]
pub enum ModelKind {
    Primitive(PrimitiveModel),
    Array(ArrayModel),
    Object(ObjectModel),
    Composition(CompositionModel),
}

/// Declared primitive type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
}

impl PrimitiveType {
    /// Parse an OpenAPI `type` keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// The OpenAPI `type` keyword
    pub fn keyword(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

/// Numeric bounds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    pub exclusive_maximum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    pub exclusive_minimum: bool,
}

/// String length and pattern bounds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveModel {
    #[serde(rename = "type")]
    pub primitive_type: PrimitiveType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
    #[serde(flatten)]
    pub numeric: NumericConstraints,
    #[serde(flatten)]
    pub string: StringConstraints,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<ModelRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    pub unique_items: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectModel {
    pub properties: Vec<ObjectProperty>,

    /// Typed dictionary values (`additionalProperties: {schema}`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<ModelRef>,

    /// `additionalProperties: true`
    pub has_any_additional_properties: bool,

    /// Additional properties without declared properties or composition
    pub is_dictionary: bool,

    /// Neither composition nor any form of additional properties
    pub interface: bool,

    /// Registry name of the nested composition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
}

impl ObjectModel {
    /// Find a property by its original name
    pub fn property(&self, prop_name: &str) -> Option<&ObjectProperty> {
        self.properties.iter().find(|p| p.prop_name == prop_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectProperty {
    /// Property name as written in the document
    pub prop_name: String,
    pub required: bool,
    pub model: ModelRef,
}

/// Which keyword produced a composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompositionType {
    #[serde(rename = "oneOf")]
    OneOf,
    #[serde(rename = "anyOf")]
    AnyOf,
    #[serde(rename = "allOf")]
    AllOf,
}

impl CompositionType {
    /// Priority order used when a node declares more than one keyword
    pub const PRIORITY: [CompositionType; 3] = [Self::OneOf, Self::AnyOf, Self::AllOf];

    /// The OpenAPI keyword
    pub fn keyword(self) -> &'static str {
        match self {
            Self::OneOf => "oneOf",
            Self::AnyOf => "anyOf",
            Self::AllOf => "allOf",
        }
    }

    /// Suffix appended to the owning model's name
    pub fn name_suffix(self) -> &'static str {
        match self {
            Self::OneOf => "OneOf",
            Self::AnyOf => "AnyOf",
            Self::AllOf => "AllOf",
        }
    }

    /// Prefix used to name anonymous branches
    pub fn branch_prefix(self) -> &'static str {
        match self {
            Self::AllOf => "Part",
            Self::OneOf | Self::AnyOf => "Option",
        }
    }

    pub fn is_union(self) -> bool {
        !matches!(self, Self::AllOf)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionBranch {
    pub model: ModelRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionModel {
    pub composition_type: CompositionType,
    pub sub_schemas: Vec<CompositionBranch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    /// A mapping was declared, whether or not every entry matched a branch
    pub has_mapping: bool,
}

impl CompositionModel {
    /// Branches tagged with a discriminator value, in original order
    pub fn mapped(&self) -> impl Iterator<Item = &CompositionBranch> + '_ {
        self.sub_schemas
            .iter()
            .filter(|b| b.discriminator_value.is_some())
    }

    /// Branches without a discriminator value, in original order
    pub fn unmapped(&self) -> impl Iterator<Item = &CompositionBranch> + '_ {
        self.sub_schemas
            .iter()
            .filter(|b| b.discriminator_value.is_none())
    }
}

/// A dependency edge: either a registry name or an unnamed primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelRef {
    Named(String),
    Inline(Box<Model>),
}

impl ModelRef {
    /// Registry name, or the synthesized name of an inline primitive
    pub fn name(&self) -> &str {
        match self {
            ModelRef::Named(name) => name,
            ModelRef::Inline(model) => &model.name,
        }
    }

    /// Follow the edge through the registry
    pub fn resolve<'a>(&'a self, registry: &'a ModelRegistry) -> Option<&'a Model> {
        match self {
            ModelRef::Named(name) => registry.get(name),
            ModelRef::Inline(model) => Some(model),
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ModelRef::Inline(_))
    }
}

impl Model {
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, ModelKind::Primitive(_))
    }

    /// A primitive with declared `enum` values
    pub fn is_enum(&self) -> bool {
        matches!(&self.kind, ModelKind::Primitive(p) if p.enum_values.is_some())
    }

    pub fn is_dictionary(&self) -> bool {
        matches!(&self.kind, ModelKind::Object(o) if o.is_dictionary)
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveModel> {
        match &self.kind {
            ModelKind::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayModel> {
        match &self.kind {
            ModelKind::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectModel> {
        match &self.kind {
            ModelKind::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_composition(&self) -> Option<&CompositionModel> {
        match &self.kind {
            ModelKind::Composition(c) => Some(c),
            _ => None,
        }
    }
}

/// Name → Model map owned by one build pass
///
/// Structural models are reserved before their children are built and filled
/// afterwards, so a child that refers back to an ancestor finds the name
/// already taken and stops recursing.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: IndexMap<String, Option<Model>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is bound or reserved
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Claim `name` ahead of building its model
    ///
    /// Returns `false` when the name is already bound or reserved.
    pub fn reserve(&mut self, name: &str) -> bool {
        if self.models.contains_key(name) {
            return false;
        }
        self.models.insert(name.to_string(), None);
        true
    }

    /// Bind a finished model to its reserved slot
    ///
    /// Binding a name that already holds a model is a no-op.
    pub fn fill(&mut self, model: Model) {
        let slot = self.models.entry(model.name.clone()).or_insert(None);
        if slot.is_none() {
            *slot = Some(model);
        }
    }

    /// Reserve and bind in one step
    ///
    /// Returns `false`, leaving the existing binding in place, when the name
    /// was already taken.
    pub fn register(&mut self, model: Model) -> bool {
        if !self.reserve(&model.name) {
            return false;
        }
        self.fill(model);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.get(name).and_then(Option::as_ref)
    }

    /// Bound models in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Model> + '_ {
        self.models.values().filter_map(Option::as_ref)
    }

    /// Names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Serialize for ModelRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for model in self.iter() {
            map.serialize_entry(&model.name, model)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn object(name: &str) -> Model {
        Model {
            name: name.to_string(),
            nullable: false,
            docs: Documentation::default(),
            reference: None,
            dependencies: vec![],
            kind: ModelKind::Object(ObjectModel {
                interface: true,
                ..ObjectModel::default()
            }),
        }
    }

    #[test]
    fn test_register_keeps_first_binding() {
        let mut registry = ModelRegistry::new();
        assert!(registry.register(object("Pet")));

        let mut other = object("Pet");
        other.nullable = true;
        assert!(!registry.register(other));

        assert_eq!(registry.len(), 1);
        assert!(!registry.get("Pet").unwrap().nullable);
    }

    #[test]
    fn test_reserved_name_is_taken_but_unbound() {
        let mut registry = ModelRegistry::new();
        assert!(registry.reserve("Node"));
        assert!(registry.contains("Node"));
        assert!(registry.get("Node").is_none());
        assert_eq!(registry.iter().count(), 0);

        registry.fill(object("Node"));
        assert!(registry.get("Node").is_some());
    }

    #[test]
    fn test_partitions_preserve_order() {
        let branch = |name: &str, value: Option<&str>| CompositionBranch {
            model: ModelRef::Named(name.to_string()),
            discriminator_value: value.map(str::to_string),
        };
        let composition = CompositionModel {
            composition_type: CompositionType::OneOf,
            sub_schemas: vec![
                branch("A", None),
                branch("B", Some("b")),
                branch("C", None),
                branch("D", Some("d")),
            ],
            discriminator: Some("kind".to_string()),
            has_mapping: true,
        };

        let mapped: Vec<_> = composition.mapped().map(|b| b.model.name()).collect();
        let unmapped: Vec<_> = composition.unmapped().map(|b| b.model.name()).collect();
        assert_eq!(mapped, vec!["B", "D"]);
        assert_eq!(unmapped, vec!["A", "C"]);
    }

    #[test]
    fn test_serialized_model_is_tagged() {
        let json = serde_json::to_value(object("Pet")).unwrap();
        assert_eq!(json["modelType"], "object");
        assert_eq!(json["name"], "Pet");
        assert_eq!(json["interface"], true);
    }
}
