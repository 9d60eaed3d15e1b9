//! Dependency ordering of emitted models
//!
//! Only objects, compositions and enums become standalone declarations in an
//! emitter, so only they are ordered. Everything else either needs no
//! declaration (primitives, dictionaries) or is written in place (arrays),
//! in which case its own dependencies count instead.

use std::collections::HashSet;
use tracing::debug;
use typegraph_common::{Model, ModelKind, ModelRef, ModelRegistry, Result, TypeGraphError};

/// Models that need a standalone declaration, in registry order
pub fn emission_candidates(registry: &ModelRegistry) -> Vec<&Model> {
    registry
        .iter()
        .filter(|model| match &model.kind {
            ModelKind::Object(object) => !object.is_dictionary,
            ModelKind::Composition(_) => true,
            ModelKind::Primitive(primitive) => primitive.enum_values.is_some(),
            ModelKind::Array(_) => false,
        })
        .collect()
}

/// Order `candidates` so every model follows the models it depends on
///
/// Runs repeated passes over the pending set, emitting each model once all
/// of its direct dependencies are satisfied. A pass that emits nothing means
/// the remaining models depend on each other, reported as
/// `CircularDependency` in their original order.
pub fn sort_by_dependencies<'r>(
    registry: &'r ModelRegistry,
    candidates: &[&'r Model],
) -> Result<Vec<&'r Model>> {
    let candidate_names: HashSet<&str> = candidates.iter().map(|m| m.name.as_str()).collect();
    let mut emitted: HashSet<&str> = HashSet::with_capacity(candidates.len());
    let mut ordered = Vec::with_capacity(candidates.len());
    let mut pending = candidates.to_vec();
    let mut pass = 0;

    while !pending.is_empty() {
        pass += 1;
        let before = pending.len();
        let mut waiting = Vec::new();

        for model in pending {
            let ready = model.dependencies.iter().all(|dependency| {
                let check = Check {
                    registry,
                    candidates: &candidate_names,
                    emitted: &emitted,
                    owner: &model.name,
                };
                check.satisfied(dependency, &mut HashSet::new())
            });

            if ready {
                emitted.insert(&model.name);
                ordered.push(model);
            } else {
                waiting.push(model);
            }
        }

        debug!(pass, emitted = before - waiting.len(), waiting = waiting.len(), "sort pass");
        if waiting.len() == before {
            return Err(TypeGraphError::CircularDependency {
                models: waiting.iter().map(|m| m.name.clone()).collect(),
            });
        }
        pending = waiting;
    }

    Ok(ordered)
}

struct Check<'a, 'r> {
    registry: &'r ModelRegistry,
    candidates: &'a HashSet<&'r str>,
    emitted: &'a HashSet<&'r str>,
    owner: &'a str,
}

impl<'a, 'r> Check<'a, 'r> {
    fn satisfied(&self, dependency: &'r ModelRef, visiting: &mut HashSet<&'r str>) -> bool {
        let name = dependency.name();
        if name == self.owner || self.emitted.contains(name) {
            return true;
        }

        let Some(model) = dependency.resolve(self.registry) else {
            return true;
        };
        if model.is_primitive() || model.is_dictionary() {
            return true;
        }
        if self.candidates.contains(name) {
            return false;
        }

        // Written in place: look through to what it needs
        if !visiting.insert(name) {
            return true;
        }
        model
            .dependencies
            .iter()
            .all(|inner| self.satisfied(inner, visiting))
    }
}
