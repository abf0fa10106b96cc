#![deny(missing_docs)]

//! # Reachability Filtering
//!
//! Prunes the model universe to the transitive closure of references
//! reachable from the selected operations, so generation emits no dead
//! types and no dangling refs.
//!
//! The reference graph may contain cycles (`A` refs `B` refs `A`); the
//! fixpoint below breaks them by marking each pointer `New` exactly once
//! and flipping it to `Seen` before its target is expanded.

use crate::config::GenerationConfig;
use crate::error::AppResult;
use crate::oas::models::{Operation, Schema, Spec};
use crate::oas::schemas::fetch;
use crate::oas::store::DocumentStore;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Discovery state of one referenced pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefState {
    /// Discovered but not yet expanded.
    New,
    /// Expanded; sticky.
    Seen,
}

/// One tracked pointer with the pointer that introduced it.
#[derive(Debug, Clone)]
struct TrackedRef {
    state: RefState,
    referrer: Option<String>,
}

/// Applies the operation filter and prunes `spec.models` to the closure
/// of references reachable from the surviving operations.
pub fn filter_spec(
    store: &DocumentStore,
    spec: Spec,
    config: &GenerationConfig,
) -> AppResult<Spec> {
    let Spec {
        info,
        host,
        base_path,
        schemes,
        consumes,
        models,
        operations,
    } = spec;

    let operations: Vec<Operation> = operations
        .into_iter()
        .filter(|operation| config.include_operation(&operation.id))
        .collect();

    let mut reachable: BTreeSet<String> = BTreeSet::new();
    let mut tracked: IndexMap<String, TrackedRef> = IndexMap::new();

    let mut seeds = Vec::new();
    for operation in &operations {
        collect_operation_refs(operation, &mut seeds);
    }
    for (name, pointer) in seeds {
        reachable.insert(name);
        tracked.entry(pointer).or_insert(TrackedRef {
            state: RefState::New,
            referrer: None,
        });
    }

    // Fixpoint: expand every New pointer until none remain.
    while let Some(pointer) = next_new(&tracked) {
        if let Some(entry) = tracked.get_mut(&pointer) {
            entry.state = RefState::Seen;
        }
        let referrer = tracked
            .get(&pointer)
            .and_then(|entry| entry.referrer.clone());
        let schema = fetch(store, &pointer, referrer.as_deref())?;

        let mut found = Vec::new();
        collect_schema_refs(&schema, &mut found);
        for (name, target) in found {
            reachable.insert(name);
            tracked.entry(target).or_insert(TrackedRef {
                state: RefState::New,
                referrer: Some(pointer.clone()),
            });
        }
    }

    let models = models
        .into_iter()
        .filter(|model| reachable.contains(&model.name))
        .collect();

    Ok(Spec {
        info,
        host,
        base_path,
        schemes,
        consumes,
        models,
        operations,
    })
}

fn next_new(tracked: &IndexMap<String, TrackedRef>) -> Option<String> {
    tracked
        .iter()
        .find(|(_, entry)| entry.state == RefState::New)
        .map(|(pointer, _)| pointer.clone())
}

/// Collects every `(name, pointer)` reference inside an operation's
/// parameter, request body and response schemas.
fn collect_operation_refs(operation: &Operation, out: &mut Vec<(String, String)>) {
    for param in operation
        .path_params
        .iter()
        .chain(&operation.query_params)
        .chain(&operation.body_params)
    {
        collect_schema_refs(&param.schema, out);
    }
    if let Some(body) = &operation.request_body {
        collect_schema_refs(body, out);
    }
    for response in &operation.responses {
        if let Some(schema) = &response.schema {
            collect_schema_refs(schema, out);
        }
    }
}

/// Collects every `(name, pointer)` reference inside a schema tree.
pub(crate) fn collect_schema_refs(schema: &Schema, out: &mut Vec<(String, String)>) {
    match schema {
        Schema::Ref { name, pointer } => out.push((name.clone(), pointer.clone())),
        Schema::Array { of } => collect_schema_refs(of, out),
        Schema::Object { props } => {
            for value in props.values() {
                collect_schema_refs(value, out);
            }
        }
        Schema::Union { of } => {
            for member in of {
                collect_schema_refs(member, out);
            }
        }
        Schema::Prim(_) | Schema::Any => {}
    }
}
