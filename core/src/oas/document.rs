#![deny(missing_docs)]

//! # Document Parsing
//!
//! The top-level entry point for one generation pass: install the raw
//! document, parse models and operations, then prune the model universe
//! to the reachable closure.
//!
//! Model definitions are read from `definitions` (Swagger 2.0) or
//! `components.schemas` (OpenAPI 3.x), whichever is present, preserving
//! the document's enumeration order.

use crate::config::GenerationConfig;
use crate::error::AppResult;
use crate::oas::models::{Model, Spec, SpecInfo};
use crate::oas::reachability::filter_spec;
use crate::oas::routes::extract_operations;
use crate::oas::schemas::parse_schema;
use crate::oas::store::DocumentStore;
use serde_json::{Map, Value as JsonValue};

/// Parses a raw OpenAPI document into a normalized, filtered [`Spec`].
pub fn parse_document(document: JsonValue, config: &GenerationConfig) -> AppResult<Spec> {
    let store = DocumentStore::new(document);
    parse_document_with_store(&store, config)
}

/// Parses against an already-installed [`DocumentStore`].
///
/// Useful when the caller wants to keep the store alive for further
/// pointer lookups within the same pass.
pub fn parse_document_with_store(
    store: &DocumentStore,
    config: &GenerationConfig,
) -> AppResult<Spec> {
    let root = store.document();

    let spec = Spec {
        info: parse_info(root),
        host: text_or_default(root, "host"),
        base_path: text_or_default(root, "basePath"),
        schemes: string_list(root, "schemes"),
        consumes: string_list(root, "consumes"),
        models: parse_models(store)?,
        operations: extract_operations(store)?,
    };

    filter_spec(store, spec, config)
}

fn parse_info(root: &JsonValue) -> SpecInfo {
    let Some(info) = root.get("info").and_then(JsonValue::as_object) else {
        return SpecInfo::default();
    };
    SpecInfo {
        title: text_in(info, "title"),
        description: info
            .get("description")
            .and_then(JsonValue::as_str)
            .map(String::from),
        version: text_in(info, "version"),
    }
}

fn parse_models(store: &DocumentStore) -> AppResult<Vec<Model>> {
    let root = store.document();
    let definitions = root
        .get("definitions")
        .and_then(JsonValue::as_object)
        .or_else(|| {
            root.get("components")
                .and_then(|components| components.get("schemas"))
                .and_then(JsonValue::as_object)
        });
    let Some(definitions) = definitions else {
        return Ok(Vec::new());
    };

    let mut models = Vec::new();
    for (name, node) in definitions {
        models.push(Model {
            name: name.clone(),
            title: node
                .get("title")
                .and_then(JsonValue::as_str)
                .map(String::from),
            description: node
                .get("description")
                .and_then(JsonValue::as_str)
                .map(String::from),
            schema: parse_schema(store, node)?,
        });
    }
    Ok(models)
}

fn text_or_default(root: &JsonValue, key: &str) -> String {
    root.get(key)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn text_in(node: &Map<String, JsonValue>, key: &str) -> String {
    node.get(key)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_list(root: &JsonValue, key: &str) -> Vec<String> {
    root.get(key)
        .and_then(JsonValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(JsonValue::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::{PrimKind, Schema};
    use serde_json::json;

    #[test]
    fn test_info_and_host_defaults() {
        let spec = parse_document(json!({}), &GenerationConfig::new()).unwrap();
        assert_eq!(spec.info, SpecInfo::default());
        assert_eq!(spec.host, "");
        assert_eq!(spec.base_path, "");
        assert!(spec.schemes.is_empty());
        assert!(spec.consumes.is_empty());
        assert!(spec.models.is_empty());
        assert!(spec.operations.is_empty());
    }

    #[test]
    fn test_top_level_metadata_copied_verbatim() {
        let document = json!({
            "swagger": "2.0",
            "info": {
                "title": "Petstore",
                "description": "A store of pets",
                "version": "1.0.0"
            },
            "host": "petstore.example.com",
            "basePath": "/v2",
            "schemes": ["https", "http"],
            "consumes": ["application/json"],
            "paths": {}
        });
        let spec = parse_document(document, &GenerationConfig::new()).unwrap();
        assert_eq!(spec.info.title, "Petstore");
        assert_eq!(spec.info.description.as_deref(), Some("A store of pets"));
        assert_eq!(spec.info.version, "1.0.0");
        assert_eq!(spec.host, "petstore.example.com");
        assert_eq!(spec.base_path, "/v2");
        assert_eq!(spec.schemes, vec!["https".to_string(), "http".to_string()]);
        assert_eq!(spec.consumes, vec!["application/json".to_string()]);
    }

    #[test]
    fn test_models_from_components_schemas() {
        let document = json!({
            "openapi": "3.0.0",
            "paths": {
                "/things": {
                    "get": {
                        "operationId": "listThings",
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Thing" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Thing": {
                        "title": "A thing",
                        "description": "One thing.",
                        "properties": { "id": { "type": "integer" } }
                    }
                }
            }
        });
        let spec = parse_document(document, &GenerationConfig::new()).unwrap();
        assert_eq!(spec.models.len(), 1);
        let model = &spec.models[0];
        assert_eq!(model.name, "Thing");
        assert_eq!(model.title.as_deref(), Some("A thing"));
        assert_eq!(model.description.as_deref(), Some("One thing."));
        assert_eq!(
            model.schema,
            Schema::Object {
                props: [("id".to_string(), Schema::Prim(PrimKind::Int))]
                    .into_iter()
                    .collect()
            }
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let document = json!({
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "responses": {
                            "200": { "schema": { "$ref": "#/definitions/Pet" } }
                        }
                    }
                }
            },
            "definitions": {
                "Pet": {
                    "properties": {
                        "zeta": { "type": "string" },
                        "alpha": { "type": "integer" }
                    }
                }
            }
        });
        let first = parse_document(document.clone(), &GenerationConfig::new()).unwrap();
        let second = parse_document(document, &GenerationConfig::new()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
