#![deny(missing_docs)]

//! # Operation Extraction
//!
//! Walks the document's `paths` object and produces [`Operation`] records.
//! Operations without an `operationId` are silently dropped: they cannot
//! be selected by the caller's filter and the emitter has nothing to name
//! them by. Path and method strings are kept verbatim; template segments
//! like `/pets/{id}` are the emitter's concern.

use crate::error::AppResult;
use crate::oas::models::{ExternalDocs, Operation, Param, Response, StatusCode};
use crate::oas::schemas::parse_schema;
use crate::oas::store::DocumentStore;
use serde_json::{Map, Value as JsonValue};

/// HTTP methods recognized inside a path item.
const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Extracts all identified operations from the document, in `paths`
/// enumeration order.
pub fn extract_operations(store: &DocumentStore) -> AppResult<Vec<Operation>> {
    let Some(paths) = store.document().get("paths").and_then(JsonValue::as_object) else {
        return Ok(Vec::new());
    };

    let mut operations = Vec::new();
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for method in METHODS {
            let Some(node) = item.get(method).and_then(JsonValue::as_object) else {
                continue;
            };
            let Some(id) = node.get("operationId").and_then(JsonValue::as_str) else {
                continue;
            };
            operations.push(build_operation(store, path, method, id, node)?);
        }
    }
    Ok(operations)
}

fn build_operation(
    store: &DocumentStore,
    path: &str,
    method: &str,
    id: &str,
    node: &Map<String, JsonValue>,
) -> AppResult<Operation> {
    let mut path_params = Vec::new();
    let mut query_params = Vec::new();
    let mut body_params = Vec::new();

    if let Some(parameters) = node.get("parameters").and_then(JsonValue::as_array) {
        for parameter in parameters {
            // A parameter may itself be a reference; resolve it first.
            let target = match parameter.get("$ref").and_then(JsonValue::as_str) {
                Some(reference) => store.lookup(reference)?,
                None => parameter,
            };
            let Some(object) = target.as_object() else {
                continue;
            };

            let param = Param {
                name: object
                    .get("name")
                    .and_then(JsonValue::as_str)
                    .unwrap_or_default()
                    .to_string(),
                description: text(object, "description"),
                schema: parse_schema(store, target)?,
            };
            match object.get("in").and_then(JsonValue::as_str) {
                Some("path") => path_params.push(param),
                Some("query") => query_params.push(param),
                Some("body") => body_params.push(param),
                _ => {}
            }
        }
    }

    let request_body = match node.get("requestBody") {
        Some(body) => Some(parse_schema(store, body)?),
        None => None,
    };

    let mut responses = Vec::new();
    if let Some(declared) = node.get("responses").and_then(JsonValue::as_object) {
        for (key, response) in declared {
            let code = if key == "default" {
                StatusCode::Default
            } else if let Ok(code) = key.parse::<u16>() {
                StatusCode::Code(code)
            } else {
                // Range keys like "2XX" are outside the recognized surface
                continue;
            };
            let schema = match response.as_object() {
                Some(body) if body.contains_key("schema") || body.contains_key("content") => {
                    Some(parse_schema(store, response)?)
                }
                _ => None,
            };
            responses.push(Response { code, schema });
        }
    }

    Ok(Operation {
        id: id.to_string(),
        summary: text(node, "summary"),
        description: text(node, "description"),
        external_docs: external_docs(node),
        method: method.to_string(),
        path: path.to_string(),
        path_params,
        query_params,
        body_params,
        request_body,
        responses,
    })
}

fn text(node: &Map<String, JsonValue>, key: &str) -> Option<String> {
    node.get(key).and_then(JsonValue::as_str).map(String::from)
}

fn external_docs(node: &Map<String, JsonValue>) -> Option<ExternalDocs> {
    let docs = node.get("externalDocs")?.as_object()?;
    Some(ExternalDocs {
        url: docs.get("url")?.as_str()?.to_string(),
        description: text(docs, "description"),
    })
}
