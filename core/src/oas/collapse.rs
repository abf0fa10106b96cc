#![deny(missing_docs)]

//! # Union Canonicalization
//!
//! Rewrites union schemas into canonical form and merges `allOf`
//! compositions. Canonical form guarantees: no nested unions, at most one
//! object member, at most one array member, primitives distinct by kind.
//! The rewrite is an idempotent normal form, so collapsing an
//! already-collapsed union returns it unchanged.

use crate::error::{AppError, AppResult};
use crate::oas::models::Schema;
use crate::oas::schemas::fetch;
use crate::oas::store::DocumentStore;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Collapses a union schema into canonical form.
///
/// Non-union schemas pass through untouched. An empty union (e.g. from
/// `anyOf: []`) collapses to [`Schema::Any`].
pub fn collapse(schema: Schema) -> Schema {
    let Schema::Union { of } = schema else {
        return schema;
    };

    let mut members = Vec::new();
    flatten_into(of, &mut members);

    let mut objects: Vec<BTreeMap<String, Schema>> = Vec::new();
    let mut arrays: Vec<Schema> = Vec::new();
    let mut prims: Vec<Schema> = Vec::new();
    for member in members {
        match member {
            Schema::Object { props } => objects.push(props),
            Schema::Array { of } => arrays.push(*of),
            // Refs and Any are treated opaquely alongside primitives
            other => {
                if !prims.contains(&other) {
                    prims.push(other);
                }
            }
        }
    }

    let mut out = Vec::new();
    if !objects.is_empty() {
        out.push(merge_object_bag(objects));
    }
    if !arrays.is_empty() {
        out.push(Schema::Array {
            of: Box::new(collapse(Schema::Union { of: arrays })),
        });
    }
    out.extend(prims);

    match out.len() {
        0 => Schema::Any,
        1 => out.remove(0),
        _ => Schema::Union { of: out },
    }
}

/// Splices nested unions into a single member list.
fn flatten_into(members: Vec<Schema>, out: &mut Vec<Schema>) {
    for member in members {
        match member {
            Schema::Union { of } => flatten_into(of, out),
            other => out.push(other),
        }
    }
}

/// Merges all object members of a union into one object by key-wise union.
///
/// When both sides define the same key, the property becomes the collapse
/// of the union of both definitions.
fn merge_object_bag(bags: Vec<BTreeMap<String, Schema>>) -> Schema {
    let mut merged: BTreeMap<String, Schema> = BTreeMap::new();
    for props in bags {
        for (key, value) in props {
            match merged.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get().clone();
                    slot.insert(collapse(Schema::Union {
                        of: vec![existing, value],
                    }));
                }
            }
        }
    }
    Schema::Object { props: merged }
}

/// Merges an `allOf` member list into a single schema.
///
/// `Any` members are dropped. A single survivor is returned as-is. All
/// remaining members must be objects or references to objects; their
/// property maps are folded right-wins. Anything else is a fatal
/// merge conflict.
pub fn merge_all_of(store: &DocumentStore, members: Vec<Schema>) -> AppResult<Schema> {
    let mut remaining: Vec<Schema> = members
        .into_iter()
        .filter(|member| *member != Schema::Any)
        .collect();

    if remaining.is_empty() {
        return Ok(Schema::Any);
    }
    if remaining.len() == 1 {
        return Ok(remaining.remove(0));
    }

    let mut merged: BTreeMap<String, Schema> = BTreeMap::new();
    for member in remaining {
        let props = object_props(store, member)?;
        merged.extend(props);
    }
    Ok(Schema::Object { props: merged })
}

/// Extracts the property map of an object or object-targeting reference.
///
/// Chains of named refs are followed; a cycle that never reaches an
/// object is a merge conflict.
fn object_props(
    store: &DocumentStore,
    schema: Schema,
) -> AppResult<BTreeMap<String, Schema>> {
    let mut current = schema;
    let mut visited: Vec<String> = Vec::new();
    loop {
        match current {
            Schema::Object { props } => return Ok(props),
            Schema::Ref { pointer, .. } => {
                if visited.iter().any(|seen| *seen == pointer) {
                    return Err(AppError::MergeConflict(format!(
                        "allOf reference cycle through '{}'",
                        pointer
                    )));
                }
                current = fetch(store, &pointer, None)?;
                visited.push(pointer);
            }
            other => {
                return Err(AppError::MergeConflict(format!(
                    "allOf member is a {}, expected an object",
                    other.kind_name()
                )));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::PrimKind;
    use serde_json::json;

    fn prim(kind: PrimKind) -> Schema {
        Schema::Prim(kind)
    }

    fn object(entries: &[(&str, Schema)]) -> Schema {
        Schema::Object {
            props: entries
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_collapse_passes_non_unions_through() {
        assert_eq!(collapse(Schema::Any), Schema::Any);
        assert_eq!(collapse(prim(PrimKind::Str)), prim(PrimKind::Str));
    }

    #[test]
    fn test_collapse_dedupes_primitives() {
        let union = Schema::Union {
            of: vec![prim(PrimKind::Str), prim(PrimKind::Str), prim(PrimKind::Int)],
        };
        assert_eq!(
            collapse(union),
            Schema::Union {
                of: vec![prim(PrimKind::Str), prim(PrimKind::Int)]
            }
        );
    }

    #[test]
    fn test_collapse_unwraps_singleton() {
        let union = Schema::Union {
            of: vec![prim(PrimKind::Bool), prim(PrimKind::Bool)],
        };
        assert_eq!(collapse(union), prim(PrimKind::Bool));
    }

    #[test]
    fn test_collapse_empty_union_is_any() {
        assert_eq!(collapse(Schema::Union { of: vec![] }), Schema::Any);
    }

    #[test]
    fn test_collapse_flattens_nested_unions() {
        let union = Schema::Union {
            of: vec![
                Schema::Union {
                    of: vec![prim(PrimKind::Str), prim(PrimKind::Int)],
                },
                prim(PrimKind::Str),
            ],
        };
        assert_eq!(
            collapse(union),
            Schema::Union {
                of: vec![prim(PrimKind::Str), prim(PrimKind::Int)]
            }
        );
    }

    #[test]
    fn test_collapse_merges_objects_key_wise() {
        let union = Schema::Union {
            of: vec![
                object(&[("a", prim(PrimKind::Str))]),
                object(&[("a", prim(PrimKind::Int)), ("b", prim(PrimKind::Bool))]),
            ],
        };
        let expected = object(&[
            (
                "a",
                Schema::Union {
                    of: vec![prim(PrimKind::Str), prim(PrimKind::Int)],
                },
            ),
            ("b", prim(PrimKind::Bool)),
        ]);
        assert_eq!(collapse(union), expected);
    }

    #[test]
    fn test_collapse_merges_arrays_by_element_union() {
        let union = Schema::Union {
            of: vec![
                Schema::Array {
                    of: Box::new(prim(PrimKind::Str)),
                },
                Schema::Array {
                    of: Box::new(prim(PrimKind::Int)),
                },
            ],
        };
        assert_eq!(
            collapse(union),
            Schema::Array {
                of: Box::new(Schema::Union {
                    of: vec![prim(PrimKind::Str), prim(PrimKind::Int)]
                })
            }
        );
    }

    #[test]
    fn test_collapse_orders_object_array_prims() {
        let union = Schema::Union {
            of: vec![
                prim(PrimKind::Str),
                Schema::Array {
                    of: Box::new(Schema::Any),
                },
                object(&[("a", prim(PrimKind::Int))]),
            ],
        };
        match collapse(union) {
            Schema::Union { of } => {
                assert_eq!(of.len(), 3);
                assert!(matches!(of[0], Schema::Object { .. }));
                assert!(matches!(of[1], Schema::Array { .. }));
                assert_eq!(of[2], prim(PrimKind::Str));
            }
            other => panic!("expected union, got {:?}", other),
        }
    }

    #[test]
    fn test_collapse_dedupes_refs_structurally() {
        let pet = Schema::Ref {
            name: "Pet".into(),
            pointer: "#/definitions/Pet".into(),
        };
        let union = Schema::Union {
            of: vec![pet.clone(), pet.clone(), Schema::Any],
        };
        assert_eq!(
            collapse(union),
            Schema::Union {
                of: vec![pet, Schema::Any]
            }
        );
    }

    #[test]
    fn test_merge_all_of_objects_and_refs() {
        let store = DocumentStore::new(json!({
            "definitions": {
                "Base": { "properties": { "y": { "type": "integer" } } }
            }
        }));
        let members = vec![
            Schema::Ref {
                name: "Base".into(),
                pointer: "#/definitions/Base".into(),
            },
            object(&[("x", prim(PrimKind::Str))]),
        ];
        let merged = merge_all_of(&store, members).unwrap();
        assert_eq!(
            merged,
            object(&[("x", prim(PrimKind::Str)), ("y", prim(PrimKind::Int))])
        );
    }

    #[test]
    fn test_merge_all_of_right_wins() {
        let store = DocumentStore::new(json!({}));
        let members = vec![
            object(&[("x", prim(PrimKind::Str))]),
            object(&[("x", prim(PrimKind::Int))]),
        ];
        let merged = merge_all_of(&store, members).unwrap();
        assert_eq!(merged, object(&[("x", prim(PrimKind::Int))]));
    }

    #[test]
    fn test_merge_all_of_drops_any_members() {
        let store = DocumentStore::new(json!({}));
        let members = vec![Schema::Any, object(&[("x", prim(PrimKind::Str))])];
        let merged = merge_all_of(&store, members).unwrap();
        assert_eq!(merged, object(&[("x", prim(PrimKind::Str))]));

        assert_eq!(
            merge_all_of(&store, vec![Schema::Any, Schema::Any]).unwrap(),
            Schema::Any
        );
    }

    #[test]
    fn test_merge_all_of_non_object_is_conflict() {
        let store = DocumentStore::new(json!({}));
        let members = vec![
            object(&[("x", prim(PrimKind::Str))]),
            prim(PrimKind::Int),
        ];
        let err = merge_all_of(&store, members).unwrap_err();
        assert!(matches!(err, AppError::MergeConflict(_)));
    }

    #[test]
    fn test_merge_all_of_ref_cycle_is_conflict() {
        let store = DocumentStore::new(json!({
            "definitions": {
                "Loop": { "$ref": "#/definitions/Loop" }
            }
        }));
        let members = vec![
            object(&[("x", prim(PrimKind::Str))]),
            Schema::Ref {
                name: "Loop".into(),
                pointer: "#/definitions/Loop".into(),
            },
        ];
        let err = merge_all_of(&store, members).unwrap_err();
        assert!(matches!(err, AppError::MergeConflict(_)));
    }

    // Property-based tests with proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// Schemas whose unions were built through `collapse`, the way the
        /// parser builds them bottom-up.
        fn arb_schema() -> impl Strategy<Value = Schema> {
            let leaf = prop_oneof![
                Just(Schema::Any),
                prop_oneof![
                    Just(PrimKind::Null),
                    Just(PrimKind::Str),
                    Just(PrimKind::Int),
                    Just(PrimKind::Num),
                    Just(PrimKind::Bool),
                ]
                .prop_map(Schema::Prim),
                "[A-Z][a-z]{0,5}".prop_map(|name| Schema::Ref {
                    pointer: format!("#/definitions/{}", name),
                    name,
                }),
            ];
            leaf.prop_recursive(3, 24, 4, |inner| {
                prop_oneof![
                    inner.clone().prop_map(|of| Schema::Array { of: Box::new(of) }),
                    proptest::collection::btree_map("[a-z]{1,3}", inner.clone(), 0..4)
                        .prop_map(|props| Schema::Object { props }),
                    proptest::collection::vec(inner, 0..4)
                        .prop_map(|of| collapse(Schema::Union { of })),
                ]
            })
        }

        fn assert_canonical(schema: &Schema) {
            match schema {
                Schema::Union { of } => {
                    assert!(of.len() >= 2, "singleton unions must be unwrapped");
                    let mut objects = 0;
                    let mut arrays = 0;
                    let mut prims: Vec<&Schema> = Vec::new();
                    for member in of {
                        match member {
                            Schema::Union { .. } => panic!("nested union survived"),
                            Schema::Object { props } => {
                                objects += 1;
                                props.values().for_each(assert_canonical);
                            }
                            Schema::Array { of } => {
                                arrays += 1;
                                assert_canonical(of);
                            }
                            other => {
                                assert!(!prims.contains(&other), "duplicate primitive member");
                                prims.push(other);
                            }
                        }
                    }
                    assert!(objects <= 1, "more than one object member");
                    assert!(arrays <= 1, "more than one array member");
                }
                Schema::Array { of } => assert_canonical(of),
                Schema::Object { props } => props.values().for_each(assert_canonical),
                _ => {}
            }
        }

        /// Recursively sorts union members so results can be compared up
        /// to primitive order.
        fn order_normalized(schema: &Schema) -> Schema {
            match schema {
                Schema::Union { of } => {
                    let mut members: Vec<Schema> = of.iter().map(order_normalized).collect();
                    members.sort_by_key(|member| format!("{:?}", member));
                    Schema::Union { of: members }
                }
                Schema::Array { of } => Schema::Array {
                    of: Box::new(order_normalized(of)),
                },
                Schema::Object { props } => Schema::Object {
                    props: props
                        .iter()
                        .map(|(key, value)| (key.clone(), order_normalized(value)))
                        .collect(),
                },
                other => other.clone(),
            }
        }

        proptest! {
            #[test]
            fn prop_collapse_is_canonical(members in proptest::collection::vec(arb_schema(), 0..6)) {
                let collapsed = collapse(Schema::Union { of: members });
                assert_canonical(&collapsed);
            }

            #[test]
            fn prop_collapse_is_idempotent(members in proptest::collection::vec(arb_schema(), 0..6)) {
                let once = collapse(Schema::Union { of: members });
                let twice = collapse(once.clone());
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn prop_collapse_commutes_up_to_prim_order(
                (members, shuffled) in proptest::collection::vec(arb_schema(), 1..6)
                    .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
            ) {
                let left = collapse(Schema::Union { of: members });
                let right = collapse(Schema::Union { of: shuffled });
                prop_assert_eq!(order_normalized(&left), order_normalized(&right));
            }
        }
    }
}
