//! End-to-end passes through `OpenApiParser`

use pretty_assertions::assert_eq;
use typegraph_common::{HttpMethod, ModelRef, ParameterLocation, TypeGraphError};
use typegraph_parser::openapi::OpenApiParser;

const PETSTORE: &str = r##"{
    "openapi": "3.0.0",
    "info": {
        "title": "Swagger Petstore",
        "version": "1.0.0"
    },
    "paths": {
        "/pets": {
            "get": {
                "operationId": "listPets",
                "tags": ["pets"],
                "parameters": [
                    {
                        "name": "limit",
                        "in": "query",
                        "required": false,
                        "schema": { "type": "integer", "format": "int32" }
                    }
                ],
                "responses": {
                    "200": {
                        "description": "A paged array of pets",
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/Pets" }
                            }
                        }
                    },
                    "default": {
                        "description": "unexpected error",
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/Error" }
                            }
                        }
                    }
                }
            },
            "post": {
                "operationId": "createPets",
                "requestBody": {
                    "required": true,
                    "content": {
                        "application/json": {
                            "schema": { "$ref": "#/components/schemas/Pet" }
                        }
                    }
                },
                "responses": {
                    "201": { "description": "Null response" }
                }
            }
        },
        "/pets/{petId}": {
            "get": {
                "operationId": "showPetById",
                "summary": "Info for a specific pet",
                "parameters": [
                    {
                        "name": "petId",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "string" }
                    }
                ],
                "responses": {
                    "200": {
                        "description": "Expected response to a valid request",
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/Pet" }
                            }
                        }
                    }
                }
            }
        }
    },
    "components": {
        "schemas": {
            "Pet": {
                "type": "object",
                "required": ["id", "name"],
                "properties": {
                    "id": { "type": "integer", "format": "int64" },
                    "name": { "type": "string" },
                    "tag": { "type": "string" }
                }
            },
            "Pets": {
                "type": "array",
                "maxItems": 100,
                "items": { "$ref": "#/components/schemas/Pet" }
            },
            "Error": {
                "type": "object",
                "required": ["code", "message"],
                "properties": {
                    "code": { "type": "integer", "format": "int32" },
                    "message": { "type": "string" }
                }
            }
        }
    }
}"##;

#[test]
fn test_petstore_models() {
    let graph = OpenApiParser::from_json(PETSTORE).unwrap().parse().unwrap();

    let pet = graph.models.get("Pet").unwrap().as_object().unwrap();
    let props: Vec<_> = pet
        .properties
        .iter()
        .map(|p| (p.prop_name.as_str(), p.model.name(), p.required))
        .collect();
    assert_eq!(
        props,
        vec![
            ("id", "PetInt64", true),
            ("name", "PetString", true),
            ("tag", "PetString", false),
        ]
    );

    let pets = graph.models.get("Pets").unwrap().as_array().unwrap();
    assert_eq!(pets.items, Some(ModelRef::Named("Pet".to_string())));
    assert_eq!(pets.max_items, Some(100));

    assert_eq!(graph.ordered, vec!["Pet", "Error", "ListPetsQueryParams", "ShowPetByIdPathParams"]);
    assert!(graph.advisories.is_empty());
}

#[test]
fn test_petstore_operations() {
    let graph = OpenApiParser::from_json(PETSTORE).unwrap().parse().unwrap();

    let pets = graph.operations_for("/pets");
    assert_eq!(pets.len(), 2);

    let list = &pets[0];
    assert_eq!(list.method, HttpMethod::Get);
    assert_eq!(list.name, "ListPets");
    assert_eq!(list.constant_name, "LISTPETS");
    assert_eq!(list.tags, vec!["pets"]);
    assert_eq!(list.parameters[0].schema, "Limit");
    assert_eq!(
        list.parameter_model(ParameterLocation::Query),
        Some("ListPetsQueryParams")
    );
    assert_eq!(list.responses["200"].media.schema.as_deref(), Some("Pets"));
    assert_eq!(list.responses["default"].media.schema.as_deref(), Some("Error"));

    let create = &pets[1];
    assert_eq!(create.method, HttpMethod::Post);
    let body = create.request_body.as_ref().unwrap();
    assert!(body.required);
    assert_eq!(body.media.schema.as_deref(), Some("Pet"));
    assert_eq!(create.responses["201"].media.schema, None);
    assert!(create.parameter_models.is_empty());

    let show = &graph.operations_for("/pets/{petId}")[0];
    assert_eq!(show.summary.as_deref(), Some("Info for a specific pet"));
    assert_eq!(
        show.parameter_model(ParameterLocation::Path),
        Some("ShowPetByIdPathParams")
    );
    assert!(graph.operations_for("/unknown").is_empty());
}

#[test]
fn test_yaml_and_json_agree() {
    let json: serde_json::Value = serde_json::from_str(PETSTORE).unwrap();
    let yaml = serde_yaml::to_string(&json).unwrap();

    let from_json = OpenApiParser::from_json(PETSTORE).unwrap().parse().unwrap();
    let from_yaml = OpenApiParser::from_yaml(&yaml).unwrap().parse().unwrap();

    assert_eq!(from_json.ordered, from_yaml.ordered);
    assert_eq!(
        serde_json::to_value(&from_json).unwrap(),
        serde_json::to_value(&from_yaml).unwrap()
    );
}

#[test]
fn test_dangling_reference_aborts_pass() {
    let spec = r##"{
        "openapi": "3.0.0",
        "paths": {},
        "components": {
            "schemas": {
                "Owner": {
                    "type": "object",
                    "properties": { "pet": { "$ref": "#/components/schemas/Missing" } }
                }
            }
        }
    }"##;

    let err = OpenApiParser::from_json(spec).unwrap().parse().unwrap_err();
    match err {
        TypeGraphError::MalformedReference { reference, .. } => {
            assert_eq!(reference, "#/components/schemas/Missing")
        }
        other => panic!("unexpected error: {}", other),
    }
}
