#![deny(missing_docs)]

//! # OpenAPI Parsing Module
//!
//! - **models**: normalized schema algebra and spec records.
//! - **store**: pass-scoped raw document holder with JSON Pointer lookup.
//! - **schemas**: recursive schema parsing and reference fetching.
//! - **collapse**: union canonicalization and `allOf` merging.
//! - **routes**: operation extraction from `paths`.
//! - **reachability**: model pruning to the reference closure.
//! - **document**: the top-level entry point assembling a [`Spec`].

pub mod collapse;
pub mod document;
pub mod models;
pub mod reachability;
pub(crate) mod ref_utils;
pub mod routes;
pub mod schemas;
pub mod store;

// Re-export public API to keep caller imports flat
pub use collapse::{collapse, merge_all_of};
pub use document::{parse_document, parse_document_with_store};
pub use models::{
    ExternalDocs, Model, Operation, Param, PrimKind, Response, Schema, Spec, SpecInfo, StatusCode,
};
pub use routes::extract_operations;
pub use schemas::parse_schema;
pub use store::DocumentStore;
