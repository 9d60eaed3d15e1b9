//! Per-operation parameter and body modeling
//!
//! Runs after component schemas are built so `$ref` parameters and bodies
//! land on the models already in the registry.

use crate::builder::ModelBuilder;
use crate::naming::{
    allocate_name, capitalize, escape_name, name_from_reference, pascal_segment, to_constant_name,
};
use crate::openapi::{self, MediaType};
use crate::reference;
use indexmap::IndexMap;
use tracing::debug;
use typegraph_common::{
    Documentation, HttpMethod, MediaContent, Model, ModelKind, ModelRef, ObjectModel,
    ObjectProperty, Operation, OperationParameter, ParameterLocation, RequestBody, Response,
    Result, TypeGraphError,
};

/// Build an `Operation` for every declared method, keyed by path
pub fn process_operations(
    builder: &mut ModelBuilder<'_>,
) -> Result<IndexMap<String, Vec<Operation>>> {
    let document = builder.document();
    let mut operations = IndexMap::new();

    for (path, item) in &document.spec().paths {
        let path_parent = escape_name(path);
        let shared = item
            .parameters
            .iter()
            .map(|param| process_parameter(builder, param, &path_parent, "DefaultParam"))
            .collect::<Result<Vec<_>>>()?;

        let mut records = Vec::new();
        for (method, op) in item.operations() {
            records.push(process_operation(builder, path, method, op, &shared)?);
        }
        operations.insert(path.clone(), records);
    }

    Ok(operations)
}

fn operation_name(path: &str, method: HttpMethod, op: &openapi::Operation) -> String {
    match &op.operation_id {
        Some(id) => escape_name(id),
        None => escape_name(&format!("{}-{}", method, path)),
    }
}

fn process_operation(
    builder: &mut ModelBuilder<'_>,
    path: &str,
    method: HttpMethod,
    op: &openapi::Operation,
    shared: &[OperationParameter],
) -> Result<Operation> {
    let name = operation_name(path, method, op);
    debug!(operation = %name, %method, path, "processing operation");

    let mut parameters = shared.to_vec();
    for param in &op.parameters {
        let param = process_parameter(builder, param, &name, "Param")?;
        let inherited = parameters
            .iter_mut()
            .find(|p| p.name == param.name && p.location == param.location);
        match inherited {
            Some(existing) => *existing = param,
            None => parameters.push(param),
        }
    }

    let request_body = op
        .request_body
        .as_ref()
        .map(|body| process_request_body(builder, body, &name))
        .transpose()?;

    let status_qualified = op.responses.len() > 1;
    let mut responses = IndexMap::new();
    for (status, response) in &op.responses {
        let suffix = if status_qualified {
            format!("{}ResponseBody", pascal_segment(status))
        } else {
            "ResponseBody".to_string()
        };
        let response = process_response(builder, response, &name, &suffix)?;
        responses.insert(status.clone(), response);
    }

    let parameter_models = parameter_containers(builder, &name, &parameters);

    Ok(Operation {
        path: path.to_string(),
        method,
        constant_name: to_constant_name(&name),
        name,
        summary: op.summary.clone(),
        description: op.description.clone(),
        tags: op.tags.clone(),
        deprecated: op.deprecated,
        parameters,
        request_body,
        responses,
        parameter_models,
    })
}

/// Resolve one parameter and build its schema model
///
/// `qualifier` is appended to the location (`pathParam`, `queryDefaultParam`)
/// when the plain parameter name is already taken.
fn process_parameter(
    builder: &mut ModelBuilder<'_>,
    param: &openapi::Parameter,
    parent: &str,
    qualifier: &str,
) -> Result<OperationParameter> {
    let document = builder.document();
    let resolved = reference::resolve(document, param)?;

    let location = resolved.location.ok_or_else(|| {
        TypeGraphError::Parse(format!(
            "Parameter '{}' of '{}' has no location",
            resolved.name, parent
        ))
    })?;

    let (schema, mime_type) = match &resolved.schema {
        Some(schema) => (schema, None),
        None => resolved
            .content
            .as_ref()
            .and_then(|content| content.first())
            .and_then(|(mime, media)| media.schema.as_ref().map(|s| (s, Some(mime.clone()))))
            .ok_or_else(|| {
                TypeGraphError::Parse(format!(
                    "Parameter '{}' of '{}' has neither schema nor content",
                    resolved.name, parent
                ))
            })?,
    };

    let model_name = match param.ref_path.as_deref() {
        Some(reference) => name_from_reference(reference)?,
        None => allocate_name(
            builder.registry(),
            &resolved.name,
            &format!("{}{}", location, qualifier),
            parent,
        ),
    };
    let schema_name = match schema.ref_path.as_deref() {
        Some(reference) => name_from_reference(reference)?,
        None => model_name,
    };
    builder.build_named(schema, &schema_name)?;

    Ok(OperationParameter {
        name: resolved.name.clone(),
        location,
        required: resolved.required,
        deprecated: resolved.deprecated,
        description: resolved.description.clone(),
        mime_type,
        schema: schema_name,
    })
}

fn process_request_body(
    builder: &mut ModelBuilder<'_>,
    body: &openapi::RequestBody,
    operation: &str,
) -> Result<RequestBody> {
    let resolved = reference::resolve(builder.document(), body)?;
    Ok(RequestBody {
        description: resolved.description.clone(),
        required: resolved.required,
        media: body_models(builder, &resolved.content, operation, "RequestBody")?,
    })
}

fn process_response(
    builder: &mut ModelBuilder<'_>,
    response: &openapi::Response,
    operation: &str,
    suffix: &str,
) -> Result<Response> {
    let resolved = reference::resolve(builder.document(), response)?;
    Ok(Response {
        description: resolved.description.clone(),
        media: body_models(builder, &resolved.content, operation, suffix)?,
    })
}

/// One model per media type that carries a schema
///
/// Inline schemas always get a model of their own; `$ref` schemas share the
/// referenced one.
fn body_models(
    builder: &mut ModelBuilder<'_>,
    content: &IndexMap<String, MediaType>,
    base: &str,
    suffix: &str,
) -> Result<MediaContent> {
    let with_schema: Vec<_> = content
        .iter()
        .filter_map(|(mime, media)| media.schema.as_ref().map(|schema| (mime, schema)))
        .collect();
    let mime_qualified = with_schema.len() > 1;

    let mut media = MediaContent::default();
    for (mime, schema) in with_schema {
        let name = match schema.ref_path.as_deref() {
            Some(reference) => name_from_reference(reference)?,
            None if mime_qualified => builder.fresh_name(&escape_name(&format!(
                "{}{}{}",
                base,
                pascal_segment(mime),
                suffix
            ))),
            None => builder.fresh_name(&escape_name(&format!("{}{}", base, suffix))),
        };
        builder.build_named(schema, &name)?;
        media.insert(mime, name);
    }
    Ok(media)
}

/// Group merged parameters into one object model per location
fn parameter_containers(
    builder: &mut ModelBuilder<'_>,
    operation: &str,
    parameters: &[OperationParameter],
) -> IndexMap<ParameterLocation, String> {
    let mut containers = IndexMap::new();

    for location in ParameterLocation::CONTAINER_ORDER {
        let properties: Vec<ObjectProperty> = parameters
            .iter()
            .filter(|p| p.location == location)
            .map(|p| ObjectProperty {
                prop_name: p.name.clone(),
                required: p.required,
                model: ModelRef::Named(p.schema.clone()),
            })
            .collect();
        if properties.is_empty() {
            continue;
        }

        let name = builder.fresh_name(&format!(
            "{}{}Params",
            operation,
            capitalize(location.as_str())
        ));
        let dependencies = properties.iter().map(|p| p.model.clone()).collect();
        let container = Model {
            name: name.clone(),
            nullable: false,
            docs: Documentation::default(),
            reference: None,
            dependencies,
            kind: ModelKind::Object(ObjectModel {
                properties,
                interface: true,
                ..ObjectModel::default()
            }),
        };

        builder.registry.register(container);
        containers.insert(location, name);
    }

    containers
}
