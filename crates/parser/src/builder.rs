//! Recursive model construction
//!
//! `ModelBuilder` turns schema nodes into `Model`s and owns the registry for
//! one build pass. Structural models reserve their name before any child is
//! built; a child that leads back to a reserved name gets a `Named` edge and
//! recursion stops there. That reservation is the only cycle breaker.
//!
//! ## Child naming
//! - `$ref` children are named after the referenced component, so every site
//!   referring to it shares one model.
//! - Primitive children stay inline and unregistered.
//! - Everything else is registered under a synthesized name: `<Parent>Item`,
//!   `<Parent><Prop>`, `<Composition>Part<N>` or `<Composition>Option<N>`.

use crate::classifier::{classify, is_primitive, SchemaKind};
use crate::naming::{escape_name, first_free_name, name_from_reference, pascal_segment};
use crate::openapi::{AdditionalProperties, ExclusiveBound, OpenApiDocument, Schema};
use crate::reference;
use tracing::{debug, warn};
use typegraph_common::{
    Advisory, ArrayModel, Documentation, Model, ModelKind, ModelRef, ModelRegistry,
    NumericConstraints, ObjectModel, ObjectProperty, PrimitiveModel, PrimitiveType, Result,
    StringConstraints, TypeGraphError,
};

/// Build context for one pass over a document
pub struct ModelBuilder<'d> {
    pub(crate) document: &'d OpenApiDocument,
    pub(crate) registry: ModelRegistry,
    pub(crate) advisories: Vec<Advisory>,
}

impl<'d> ModelBuilder<'d> {
    pub fn new(document: &'d OpenApiDocument) -> Self {
        Self {
            document,
            registry: ModelRegistry::new(),
            advisories: Vec::new(),
        }
    }

    pub fn document(&self) -> &'d OpenApiDocument {
        self.document
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    /// Hand over the registry and advisories; the registry is read-only from
    /// here on
    pub fn finish(self) -> (ModelRegistry, Vec<Advisory>) {
        (self.registry, self.advisories)
    }

    pub(crate) fn advise(&mut self, advisory: Advisory) {
        warn!("{}", advisory);
        self.advisories.push(advisory);
    }

    /// Name for a new synthesized model, numbered when `requested` is already
    /// taken by a registered model or by a component that is still to be
    /// built. The caller registers the model before touching the registry
    /// again.
    pub(crate) fn fresh_name(&mut self, requested: &str) -> String {
        let document = self.document;
        let registry = &self.registry;
        let allocated = first_free_name(requested, |candidate| {
            registry.contains(candidate)
                || document
                    .component_schemas()
                    .any(|(key, _)| escape_name(key) == candidate)
        });
        if allocated != requested {
            self.advise(Advisory::NameCollision {
                requested: requested.to_string(),
                allocated: allocated.clone(),
            });
        }
        allocated
    }

    /// Build every `components.schemas` entry in document order
    pub fn build_components(&mut self) -> Result<()> {
        let document = self.document;
        for (key, schema) in document.component_schemas() {
            self.build(schema, "", Some(&escape_name(key)))?;
        }
        Ok(())
    }

    /// Build a model for `node`
    ///
    /// With an explicit name the result is registered and returned as a
    /// `Named` edge; a name that is already bound or reserved is returned
    /// as-is without looking at `node`. Without a name, primitives come back
    /// inline and containers are named `<parent>Array`/`<parent>Object`.
    pub fn build(&mut self, node: &Schema, parent: &str, name: Option<&str>) -> Result<ModelRef> {
        if let Some(name) = name {
            if self.registry.contains(name) {
                debug!(model = name, "reusing registered model");
                return Ok(ModelRef::Named(name.to_string()));
            }
        }

        let document = self.document;
        let resolved = reference::resolve(document, node)?;
        let kind = classify(&resolved).ok_or_else(|| TypeGraphError::UnknownSchemaShape {
            name: name.unwrap_or(parent).to_string(),
        })?;

        let primitive_type = match kind {
            SchemaKind::Primitive(primitive_type) => primitive_type,
            SchemaKind::Array | SchemaKind::Object | SchemaKind::Composition => {
                let model_name = match name {
                    Some(name) => name.to_string(),
                    None if kind == SchemaKind::Array => format!("{}Array", parent),
                    None => format!("{}Object", parent),
                };
                if !self.registry.reserve(&model_name) {
                    return Ok(ModelRef::Named(model_name));
                }

                debug!(model = %model_name, ?kind, "building model");
                let mut model = if kind == SchemaKind::Array {
                    self.array_model(&resolved, &model_name)?
                } else {
                    self.object_model(&resolved, &model_name)?
                };
                model.reference = node.ref_path.clone();
                self.registry.fill(model);
                return Ok(ModelRef::Named(model_name));
            }
        };

        let mut model = primitive_model(&resolved, primitive_type, parent, name);
        model.reference = node.ref_path.clone();
        if name.is_none() {
            return Ok(ModelRef::Inline(Box::new(model)));
        }

        let model_name = model.name.clone();
        debug!(model = %model_name, "registering primitive");
        self.registry.register(model);
        Ok(ModelRef::Named(model_name))
    }

    /// Build a model under a name that is always registered
    pub fn build_named(&mut self, node: &Schema, name: &str) -> Result<String> {
        self.build(node, "", Some(name))?;
        Ok(name.to_string())
    }

    /// Build a child of `parent`, applying the child naming policy
    pub(crate) fn build_child(
        &mut self,
        node: &Schema,
        parent: &str,
        synthesized_name: impl FnOnce() -> String,
    ) -> Result<ModelRef> {
        if let Some(reference) = node.ref_path.as_deref() {
            let name = name_from_reference(reference)?;
            return self.build(node, parent, Some(&name));
        }
        if is_primitive(node) {
            return self.build(node, parent, None);
        }
        let name = synthesized_name();
        self.build(node, parent, Some(&name))
    }

    fn array_model(&mut self, schema: &Schema, name: &str) -> Result<Model> {
        let items = schema
            .items
            .as_deref()
            .map(|items| self.build_child(items, name, || format!("{}Item", name)))
            .transpose()?;

        let dependencies = items.iter().cloned().collect();
        let array = ArrayModel {
            items,
            max_items: schema.max_items,
            min_items: schema.min_items,
            unique_items: schema.unique_items.unwrap_or(false),
        };
        Ok(base_model(schema, name, ModelKind::Array(array), dependencies))
    }

    fn object_model(&mut self, schema: &Schema, name: &str) -> Result<Model> {
        let document = self.document;
        let mut dependencies = Vec::new();
        let mut properties = Vec::new();

        for (prop_name, prop) in schema.properties.iter().flatten() {
            let model =
                self.build_child(prop, name, || format!("{}{}", name, pascal_segment(prop_name)))?;
            let has_default = reference::resolve(document, prop)?.default.is_some();
            let required = has_default || schema.required.iter().any(|r| r == prop_name);

            dependencies.push(model.clone());
            properties.push(ObjectProperty {
                prop_name: prop_name.clone(),
                required,
                model,
            });
        }

        let mut object = ObjectModel {
            properties,
            max_properties: schema.max_properties,
            min_properties: schema.min_properties,
            ..ObjectModel::default()
        };

        match &schema.additional_properties {
            Some(AdditionalProperties::Schema(values)) => {
                let model = self.build_child(values, name, || format!("{}Item", name))?;
                dependencies.push(model.clone());
                object.additional_properties = Some(model);
            }
            Some(AdditionalProperties::Any(true)) => object.has_any_additional_properties = true,
            Some(AdditionalProperties::Any(false)) | None => {}
        }

        if schema.has_composition() {
            let composition = self.composition_model(schema, name)?;
            dependencies.push(ModelRef::Named(composition.clone()));
            object.composition = Some(composition);
        }

        let open = object.has_any_additional_properties || object.additional_properties.is_some();
        object.is_dictionary =
            object.composition.is_none() && open && schema.properties.is_none();
        object.interface =
            object.composition.is_none() && schema.additional_properties.is_none();

        Ok(base_model(schema, name, ModelKind::Object(object), dependencies))
    }
}

/// Common fields shared by every variant
pub(crate) fn base_model(
    schema: &Schema,
    name: &str,
    kind: ModelKind,
    dependencies: Vec<ModelRef>,
) -> Model {
    Model {
        name: name.to_string(),
        nullable: schema.is_nullable(),
        docs: Documentation {
            title: schema.title.clone(),
            description: schema.description.clone(),
            deprecated: schema.deprecated.unwrap_or(false),
            default: schema.default.clone(),
        },
        reference: None,
        dependencies,
        kind,
    }
}

fn primitive_model(
    schema: &Schema,
    primitive_type: PrimitiveType,
    parent: &str,
    name: Option<&str>,
) -> Model {
    let name = match name {
        Some(name) => name.to_string(),
        None if schema.enum_values.is_some() => format!("{}Enum", parent),
        None => {
            let suffix = schema.format.as_deref().unwrap_or(primitive_type.keyword());
            format!("{}{}", parent, pascal_segment(suffix))
        }
    };

    let (maximum, exclusive_maximum) = bound(schema.maximum, schema.exclusive_maximum);
    let (minimum, exclusive_minimum) = bound(schema.minimum, schema.exclusive_minimum);
    let primitive = PrimitiveModel {
        primitive_type,
        format: schema.format.clone(),
        enum_values: schema.enum_values.clone(),
        numeric: NumericConstraints {
            multiple_of: schema.multiple_of,
            maximum,
            exclusive_maximum,
            minimum,
            exclusive_minimum,
        },
        string: StringConstraints {
            max_length: schema.max_length,
            min_length: schema.min_length,
            pattern: schema.pattern.clone(),
        },
    };
    base_model(schema, &name, ModelKind::Primitive(primitive), Vec::new())
}

/// Fold the 3.0 flag form and the 3.1 numeric form into (bound, exclusive)
fn bound(inclusive: Option<f64>, exclusive: Option<ExclusiveBound>) -> (Option<f64>, bool) {
    match exclusive {
        Some(ExclusiveBound::Limit(limit)) => (Some(limit), true),
        Some(ExclusiveBound::Flag(flag)) => (inclusive, flag),
        None => (inclusive, false),
    }
}
