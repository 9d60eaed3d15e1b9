//! oneOf / anyOf / allOf resolution

use crate::builder::ModelBuilder;
use crate::openapi::{Discriminator, Schema};
use std::collections::HashMap;
use tracing::debug;
use typegraph_common::{
    Advisory, CompositionBranch, CompositionModel, CompositionType, Documentation, Model,
    ModelKind, ModelRef, Result, TypeGraphError,
};

fn branches_for(schema: &Schema, composition_type: CompositionType) -> Option<&Vec<Schema>> {
    match composition_type {
        CompositionType::OneOf => schema.one_of.as_ref(),
        CompositionType::AnyOf => schema.any_of.as_ref(),
        CompositionType::AllOf => schema.all_of.as_ref(),
    }
}

/// Fallback for mapping targets like `#/.../oneOf/1`
fn branch_index_from_pointer(target: &str) -> Option<usize> {
    target.rsplit('/').next()?.parse().ok()
}

impl<'d> ModelBuilder<'d> {
    /// Build the composition model nested in `owner` and return its name
    ///
    /// Only the highest-priority keyword present is used (oneOf, anyOf,
    /// allOf); the others are dropped with an advisory. The composition is
    /// always a new model, numbered if `<Owner><Keyword>` is already taken.
    pub(crate) fn composition_model(&mut self, schema: &Schema, owner: &str) -> Result<String> {
        let present: Vec<(CompositionType, &Vec<Schema>)> = CompositionType::PRIORITY
            .into_iter()
            .filter_map(|kind| branches_for(schema, kind).map(|branches| (kind, branches)))
            .collect();

        let Some(&(composition_type, branches)) = present.first() else {
            return Err(TypeGraphError::UnknownSchemaShape {
                name: owner.to_string(),
            });
        };

        let name = self.fresh_name(&format!("{}{}", owner, composition_type.name_suffix()));
        self.registry.reserve(&name);

        if present.len() > 1 {
            let keywords = present
                .iter()
                .map(|(kind, _)| kind.keyword().to_string())
                .collect();
            self.advise(Advisory::AmbiguousComposition {
                model: name.clone(),
                keywords,
            });
        }

        debug!(model = %name, kind = composition_type.keyword(), branches = branches.len(), "building composition");

        let mut reference_index = HashMap::new();
        let mut sub_schemas = Vec::with_capacity(branches.len());
        for (index, branch) in branches.iter().enumerate() {
            if let Some(reference) = branch.ref_path.as_deref() {
                reference_index.insert(reference.to_string(), index);
            }
            let model = self.build_child(branch, &name, || {
                format!("{}{}{}", name, composition_type.branch_prefix(), index + 1)
            })?;
            sub_schemas.push(CompositionBranch {
                model,
                discriminator_value: None,
            });
        }

        let mut composition = CompositionModel {
            composition_type,
            sub_schemas,
            discriminator: None,
            has_mapping: false,
        };
        if let Some(discriminator) = &schema.discriminator {
            self.apply_discriminator(&name, discriminator, &reference_index, &mut composition);
        }

        let dependencies = composition
            .sub_schemas
            .iter()
            .map(|branch| branch.model.clone())
            .collect::<Vec<ModelRef>>();

        self.registry.fill(Model {
            name: name.clone(),
            nullable: false,
            docs: Documentation::default(),
            reference: None,
            dependencies,
            kind: ModelKind::Composition(composition),
        });
        Ok(name)
    }

    fn apply_discriminator(
        &mut self,
        name: &str,
        discriminator: &Discriminator,
        reference_index: &HashMap<String, usize>,
        composition: &mut CompositionModel,
    ) {
        composition.discriminator = Some(discriminator.property_name.clone());
        let Some(mapping) = &discriminator.mapping else {
            return;
        };
        composition.has_mapping = true;

        for (value, target) in mapping {
            let index = reference_index
                .get(target)
                .copied()
                .or_else(|| branch_index_from_pointer(target))
                .filter(|index| *index < composition.sub_schemas.len());

            match index {
                Some(index) => {
                    composition.sub_schemas[index].discriminator_value = Some(value.clone())
                }
                None => self.advise(Advisory::UnresolvedDiscriminatorMapping {
                    model: name.to_string(),
                    value: value.clone(),
                    target: target.clone(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_index_from_pointer() {
        assert_eq!(branch_index_from_pointer("#/components/schemas/Pet/oneOf/2"), Some(2));
        assert_eq!(branch_index_from_pointer("#/components/schemas/Cat"), None);
        assert_eq!(branch_index_from_pointer(""), None);
    }
}
