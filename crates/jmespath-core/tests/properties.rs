//! Property tests over generated documents and trees.

mod common;

use jmespath_core::{Adapter, Ast, Comparator, JsonAdapter, Node};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[a-c]{0,3}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-c]", inner), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn arb_node() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        Just(Ast::current()),
        "[a-c]".prop_map(|name| Ast::field(name)),
        (-3i64..3).prop_map(Ast::index),
        arb_json().prop_map(Ast::literal),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        let binary = prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Ast::sub(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Ast::pipe(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(s, b)| Ast::project(s, b)),
            (inner.clone(), inner.clone()).prop_map(|(s, b)| Ast::project_values(s, b)),
            (inner.clone(), inner.clone()).prop_map(|(s, p)| Ast::filter(s, p)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Ast::or(l, r)),
            (inner.clone(), inner.clone())
                .prop_map(|(l, r)| Ast::compare(Comparator::Less, l, r)),
        ];
        let unary = prop_oneof![
            inner.clone().prop_map(Ast::not),
            inner.clone().prop_map(Ast::flatten_list),
            inner.clone().prop_map(Ast::flatten),
            prop::collection::vec(inner, 0..3).prop_map(Ast::multi_select_list),
            (
                prop::option::of(-4i64..4),
                prop::option::of(-4i64..4),
                prop_oneof![Just(-1i64), Just(1), Just(2)],
            )
                .prop_map(|(start, stop, step)| Ast::slice(start, stop, Some(step))),
        ];
        prop_oneof![binary, unary]
    })
}

fn hash_of(node: &Node) -> u64 {
    let mut hasher = DefaultHasher::new();
    node.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn prop_flatten_is_one_level(items in prop::collection::vec(arb_json(), 0..6)) {
        let mut expected = Vec::new();
        for item in &items {
            match item {
                Value::Array(inner) => expected.extend(inner.iter().cloned()),
                other => expected.push(other.clone()),
            }
        }
        let result = common::eval(&Ast::flatten_list(Ast::current()), &Value::Array(items)).unwrap();
        prop_assert_eq!(result, Value::Array(expected));
    }

    #[test]
    fn prop_flatten_never_fails(data in arb_json()) {
        let result = common::eval(&Ast::flatten_list(Ast::current()), &data).unwrap();
        prop_assert!(result.is_array());
    }

    #[test]
    fn prop_projection_drops_nulls(items in prop::collection::vec(arb_json(), 0..6)) {
        let expected: Vec<Value> = items
            .iter()
            .map(|item| item.get("a").cloned().unwrap_or(Value::Null))
            .filter(|value| !value.is_null())
            .collect();
        let node = Ast::project(Ast::current(), Ast::field("a"));
        let result = common::eval(&node, &Value::Array(items)).unwrap();
        prop_assert_eq!(result, Value::Array(expected));
    }

    #[test]
    fn prop_index_wraps_negative(items in prop::collection::vec(arb_json(), 0..6), index in -8i64..8) {
        let len = items.len() as i64;
        let position = if index < 0 { len + index } else { index };
        let expected = if (0..len).contains(&position) {
            items[position as usize].clone()
        } else {
            Value::Null
        };
        let result = common::eval(&Ast::index(index), &Value::Array(items)).unwrap();
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn prop_not_matches_truthiness(data in arb_json()) {
        let adapter = JsonAdapter::new();
        let result = Ast::not(Ast::current()).evaluate(&adapter, &data).unwrap();
        prop_assert_eq!(result, Value::Bool(!adapter.is_truthy(&data)));
    }

    #[test]
    fn prop_evaluation_is_idempotent(node in arb_node(), data in arb_json()) {
        let adapter = common::json_adapter();
        let first = node.evaluate(&adapter, &data);
        let second = node.evaluate(&adapter, &data);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_evaluation_leaves_input_untouched(node in arb_node(), data in arb_json()) {
        let before = data.clone();
        let _ = common::eval(&node, &data);
        prop_assert_eq!(data, before);
    }

    #[test]
    fn prop_equal_trees_hash_equal(node in arb_node()) {
        let copy = node.clone();
        prop_assert_eq!(&node, &copy);
        prop_assert_eq!(hash_of(&node), hash_of(&copy));
    }

    #[test]
    fn prop_wrapping_changes_identity(node in arb_node()) {
        let piped = Ast::pipe(node.clone(), Ast::current());
        let chained = Ast::sub(node.clone(), Ast::current());
        prop_assert_ne!(&piped, &chained);
        prop_assert_ne!(&node, &piped);
    }
}
