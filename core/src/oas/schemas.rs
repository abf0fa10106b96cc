#![deny(missing_docs)]

//! # Schema Parsing
//!
//! Recursive translation of raw JSON nodes into the normalized [`Schema`]
//! algebra. Dispatch follows OpenAPI's quirky precedence: `schema`
//! wrappers first, then explicit `type`, composition keywords, `$ref`,
//! and finally `content` media types. Anything unrecognized degrades to
//! [`Schema::Any`] so vendor extensions never abort a pass.
//!
//! Named refs (`#/definitions/N`, `#/components/schemas/N`) stay symbolic
//! so the emitter can render them as named types; any other `$ref` is
//! dereferenced and inlined on the spot.

use crate::error::{AppError, AppResult};
use crate::oas::collapse::{collapse, merge_all_of};
use crate::oas::models::{PrimKind, Schema};
use crate::oas::ref_utils::named_model_ref;
use crate::oas::store::DocumentStore;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;

/// Media types whose `content` entry carries the effective schema.
const CONTENT_MEDIA_TYPES: [&str; 3] = [
    "application/json",
    "application/octet-stream",
    "application/x-www-form-urlencoded",
];

/// Parses a raw JSON node into a normalized schema.
pub fn parse_schema(store: &DocumentStore, node: &JsonValue) -> AppResult<Schema> {
    let Some(map) = node.as_object() else {
        return Ok(Schema::Any);
    };

    // Parameter wrapper: { "schema": X }
    if let Some(inner) = map.get("schema") {
        return parse_schema(store, inner);
    }

    match map.get("type") {
        // Explicit primitive type
        Some(JsonValue::String(name)) => {
            if let Some(kind) = PrimKind::from_type_name(name) {
                return Ok(Schema::Prim(kind));
            }
        }
        // Polymorphic type array: { "type": [t1, ..., tn] }
        Some(JsonValue::Array(names)) => {
            let members = names
                .iter()
                .map(|name| parse_schema(store, &json!({ "type": name })))
                .collect::<AppResult<Vec<_>>>()?;
            return Ok(collapse(Schema::Union { of: members }));
        }
        _ => {}
    }

    // Tuple-form items: { "items": [x1, ..., xn] }
    if let Some(JsonValue::Array(items)) = map.get("items") {
        let members = items
            .iter()
            .map(|item| parse_schema(store, item))
            .collect::<AppResult<Vec<_>>>()?;
        return Ok(collapse(Schema::Union { of: members }));
    }

    // anyOf / oneOf unions (treated identically)
    for keyword in ["anyOf", "oneOf"] {
        if let Some(JsonValue::Array(variants)) = map.get(keyword) {
            let members = variants
                .iter()
                .map(|variant| parse_schema(store, variant))
                .collect::<AppResult<Vec<_>>>()?;
            return Ok(collapse(Schema::Union { of: members }));
        }
    }

    // Typed arrays, with or without an element schema
    if map.get("type").and_then(JsonValue::as_str) == Some("array") {
        let of = match map.get("items") {
            Some(items) => parse_schema(store, items)?,
            None => Schema::Any,
        };
        return Ok(Schema::Array { of: Box::new(of) });
    }

    // Object-form items without an explicit type
    if let Some(items) = map.get("items") {
        return Ok(Schema::Array {
            of: Box::new(parse_schema(store, items)?),
        });
    }

    // Declared properties
    if let Some(JsonValue::Object(properties)) = map.get("properties") {
        let mut props = BTreeMap::new();
        for (name, value) in properties {
            props.insert(name.clone(), parse_schema(store, value)?);
        }
        return Ok(Schema::Object { props });
    }

    // allOf composition
    if let Some(JsonValue::Array(members)) = map.get("allOf") {
        if let [single] = members.as_slice() {
            return parse_schema(store, single);
        }
        let parsed = members
            .iter()
            .map(|member| parse_schema(store, member))
            .collect::<AppResult<Vec<_>>>()?;
        return merge_all_of(store, parsed);
    }

    // Untyped object
    if map.get("type").and_then(JsonValue::as_str) == Some("object") {
        return Ok(Schema::Object {
            props: BTreeMap::new(),
        });
    }

    // References: named model targets stay symbolic, everything else inlines
    if let Some(reference) = map.get("$ref").and_then(JsonValue::as_str) {
        if let Some(name) = named_model_ref(reference) {
            return Ok(Schema::Ref {
                name,
                pointer: reference.to_string(),
            });
        }
        return fetch(store, reference, None);
    }

    // Response / request body media types
    if let Some(JsonValue::Object(content)) = map.get("content") {
        for media_type in CONTENT_MEDIA_TYPES {
            if let Some(media) = content.get(media_type) {
                return parse_schema(store, media);
            }
        }
    }

    Ok(Schema::Any)
}

/// Dereferences a pointer against the store and parses the target.
///
/// The optional `referrer` is attached to a `RefNotFound` so the error
/// names the node that contained the dangling reference.
pub(crate) fn fetch(
    store: &DocumentStore,
    pointer: &str,
    referrer: Option<&str>,
) -> AppResult<Schema> {
    let node = match store.lookup(pointer) {
        Ok(node) => node,
        Err(AppError::RefNotFound { pointer, .. }) => {
            return Err(AppError::RefNotFound {
                pointer,
                referrer: referrer.map(String::from),
            });
        }
        Err(other) => return Err(other),
    };
    parse_schema(store, node)
}
