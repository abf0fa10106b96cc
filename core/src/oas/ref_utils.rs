#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for decomposing local `$ref` pointers (RFC 6901).
//!
//! Only document-local references (`#/...`) occur in this core; external
//! documents are never fetched.

use percent_encoding::percent_decode_str;

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent escapes).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Splits a `#/...` pointer into decoded segments.
///
/// `#` and the empty pointer address the document root and yield no
/// segments. The leading `#` is optional.
pub(crate) fn pointer_segments(pointer: &str) -> Vec<String> {
    let path = pointer.strip_prefix('#').unwrap_or(pointer);
    let Some(path) = path.strip_prefix('/') else {
        return Vec::new();
    };
    path.split('/').map(decode_pointer_segment).collect()
}

/// Returns true if a segment should index a JSON array.
pub(crate) fn is_index_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Extracts the model name from a `$ref` that targets a top-level model
/// location (`#/definitions/N` or `#/components/schemas/N`).
///
/// Returns `None` for every other reference; those are inlined eagerly.
pub(crate) fn named_model_ref(ref_str: &str) -> Option<String> {
    let segments = pointer_segments(ref_str);
    match segments.as_slice() {
        [section, name] if section == "definitions" => Some(name.clone()),
        [components, section, name] if components == "components" && section == "schemas" => {
            Some(name.clone())
        }
        _ => None,
    }
}
