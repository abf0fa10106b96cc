#![deny(missing_docs)]

//! # Document Store
//!
//! Holds the raw parsed JSON document for the duration of one generation
//! pass and answers JSON Pointer lookups against it. The store is
//! installed once, read throughout the pass, and dropped at pass end;
//! nothing mutates it after construction.

use crate::error::{AppError, AppResult};
use crate::oas::ref_utils::{is_index_segment, pointer_segments};
use serde_json::Value as JsonValue;

/// The pass-scoped raw document.
///
/// Carried as an explicit parameter through parsing rather than stashed
/// in process-global state, so two passes can never observe each other.
#[derive(Debug)]
pub struct DocumentStore {
    document: JsonValue,
}

impl DocumentStore {
    /// Installs the document for this pass.
    pub fn new(document: JsonValue) -> Self {
        Self { document }
    }

    /// Returns the raw document root.
    pub fn document(&self) -> &JsonValue {
        &self.document
    }

    /// Resolves an RFC 6901 JSON Pointer (`#/...`) against the document.
    ///
    /// A segment of all ASCII digits indexes arrays by integer; against a
    /// map the same segment falls back to a plain string key.
    pub fn lookup(&self, pointer: &str) -> AppResult<&JsonValue> {
        let mut node = &self.document;
        for segment in pointer_segments(pointer) {
            let next = match node {
                JsonValue::Object(map) => map.get(&segment),
                JsonValue::Array(items) if is_index_segment(&segment) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                _ => None,
            };
            node = next.ok_or_else(|| AppError::RefNotFound {
                pointer: pointer.to_string(),
                referrer: None,
            })?;
        }
        Ok(node)
    }
}
