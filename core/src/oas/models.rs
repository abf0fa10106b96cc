#![deny(missing_docs)]

//! # Normalized Models
//!
//! Definition of the normalized schema algebra and the spec-level records
//! handed to the emission backend.
//!
//! All values here are produced by construction and immutable afterwards;
//! no component rewrites a schema once it has been returned.

use serde::Serialize;
use std::collections::BTreeMap;

/// The kind tag for primitive schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrimKind {
    /// JSON `null`.
    Null,
    /// `type: string`.
    Str,
    /// `type: integer`.
    Int,
    /// `type: number`.
    Num,
    /// `type: boolean`.
    Bool,
}

impl PrimKind {
    /// Maps an OpenAPI `type` name to a primitive kind, if it is one.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(PrimKind::Null),
            "string" => Some(PrimKind::Str),
            "integer" => Some(PrimKind::Int),
            "number" => Some(PrimKind::Num),
            "boolean" => Some(PrimKind::Bool),
            _ => None,
        }
    }
}

/// A normalized schema value.
///
/// Schemas refer to top-level models symbolically through [`Schema::Ref`],
/// so the in-memory tree stays finite even when the document's reference
/// graph contains cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Schema {
    /// A primitive value.
    Prim(PrimKind),
    /// A homogeneous sequence.
    Array {
        /// Element schema.
        of: Box<Schema>,
    },
    /// A keyed record. Property iteration is lexicographic by name.
    Object {
        /// Property name to schema, uniquely keyed.
        props: BTreeMap<String, Schema>,
    },
    /// A canonical union: no nested unions, at most one object member,
    /// at most one array member, primitives distinct by kind.
    Union {
        /// Ordered union members.
        of: Vec<Schema>,
    },
    /// A named reference to a top-level model.
    Ref {
        /// Final path segment of the target, i.e. the model name.
        name: String,
        /// Full `#/...` JSON Pointer of the target.
        pointer: String,
    },
    /// The top type: an empty schema or unrecognized content.
    Any,
}

impl Schema {
    /// Short human-readable tag for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Schema::Prim(_) => "primitive",
            Schema::Array { .. } => "array",
            Schema::Object { .. } => "object",
            Schema::Union { .. } => "union",
            Schema::Ref { .. } => "reference",
            Schema::Any => "any",
        }
    }
}

/// A named top-level model definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Model {
    /// Definition name (map key under `definitions` / `components.schemas`).
    pub name: String,
    /// Optional `title` from the definition node.
    pub title: Option<String>,
    /// Optional `description` from the definition node.
    pub description: Option<String>,
    /// The normalized schema.
    pub schema: Schema,
}

/// A single operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// The normalized parameter schema.
    pub schema: Schema,
}

/// A response status selector: a concrete code or the `default` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusCode {
    /// A numeric HTTP status code.
    Code(u16),
    /// The OpenAPI `default` response.
    Default,
}

/// A single declared response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    /// The status selector.
    pub code: StatusCode,
    /// The response body schema, when one is declared.
    pub schema: Option<Schema>,
}

/// External documentation attached to an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalDocs {
    /// Documentation URL.
    pub url: String,
    /// Optional description.
    pub description: Option<String>,
}

/// A parsed API operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// The `operationId` value. Operations without one are dropped upstream.
    pub id: String,
    /// Optional short summary.
    pub summary: Option<String>,
    /// Optional verbose description.
    pub description: Option<String>,
    /// Optional external documentation link.
    pub external_docs: Option<ExternalDocs>,
    /// HTTP method, lower case as enumerated from the path item.
    pub method: String,
    /// Path template, verbatim (e.g. `/pets/{id}`).
    pub path: String,
    /// Parameters with `in: path`.
    pub path_params: Vec<Param>,
    /// Parameters with `in: query`.
    pub query_params: Vec<Param>,
    /// Parameters with `in: body` (Swagger 2.0).
    pub body_params: Vec<Param>,
    /// The `requestBody` schema (OpenAPI 3.x), when present.
    pub request_body: Option<Schema>,
    /// Declared responses in document order.
    pub responses: Vec<Response>,
}

/// Top-level document metadata (`info` block).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpecInfo {
    /// `info.title`, empty when absent.
    pub title: String,
    /// `info.description`.
    pub description: Option<String>,
    /// `info.version`, empty when absent.
    pub version: String,
}

/// The normalized specification handed to the emission backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spec {
    /// Document metadata.
    pub info: SpecInfo,
    /// `host`, empty when absent.
    pub host: String,
    /// `basePath`, empty when absent.
    pub base_path: String,
    /// `schemes`, empty when absent.
    pub schemes: Vec<String>,
    /// `consumes`, empty when absent.
    pub consumes: Vec<String>,
    /// Models reachable from the selected operations, in input order.
    pub models: Vec<Model>,
    /// Selected operations, in `paths` enumeration order.
    pub operations: Vec<Operation>,
}
