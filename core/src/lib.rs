#![deny(missing_docs)]

//! # Apigen Core
//!
//! Normalization core for the apigen OpenAPI client generator.
//!
//! The crate ingests a parsed OpenAPI document (2.x or 3.x, as a
//! `serde_json::Value`) and produces a normalized [`oas::Spec`]: model
//! definitions collapsed into a canonical schema algebra, plus the
//! operations selected by the caller's configuration with their model
//! universe pruned to the reachable closure. Code emission, HTTP
//! runtimes and build-system integration live outside this crate.

/// Shared error types.
pub mod error;

/// Caller-supplied generation configuration.
pub mod config;

/// OpenAPI (OAS) parsing and normalization.
pub mod oas;

pub use config::GenerationConfig;
pub use error::{AppError, AppResult};
pub use oas::{
    parse_document, DocumentStore, ExternalDocs, Model, Operation, Param, PrimKind, Response,
    Schema, Spec, SpecInfo, StatusCode,
};
