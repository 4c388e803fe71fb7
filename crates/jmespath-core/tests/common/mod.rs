//! Functions and helpers shared by the integration tests.

#![allow(dead_code)]

use jmespath_core::{
    Adapter, Argument, ArgumentType, EvaluationError, Function, FunctionRegistry, JsonAdapter,
    Node, Signature, ValueKind, ValueOrdering,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub struct Length {
    signature: Signature,
}

impl Length {
    pub fn new() -> Self {
        Length {
            signature: Signature::new(vec![ArgumentType::Kinds(vec![
                ValueKind::String,
                ValueKind::Array,
                ValueKind::Object,
            ])]),
        }
    }
}

impl<V: Clone> Function<V> for Length {
    fn name(&self) -> &str {
        "length"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, adapter: &dyn Adapter<V>, args: &[Argument<'_, V>]) -> Result<V, EvaluationError> {
        let value = args[0].value().ok_or_else(|| EvaluationError::failed("length", "no value"))?;
        let length = match adapter.kind_of(value) {
            ValueKind::String => adapter
                .string_value(value)
                .map_or(0, |s| s.chars().count()),
            ValueKind::Array => adapter.array_length(value),
            _ => adapter.property_names(value).len(),
        };
        Ok(adapter.create_number(length as f64))
    }
}

pub struct Sum {
    signature: Signature,
}

impl Sum {
    pub fn new() -> Self {
        Sum {
            signature: Signature::new(vec![ArgumentType::ArrayOf(vec![ValueKind::Number])]),
        }
    }
}

impl<V: Clone> Function<V> for Sum {
    fn name(&self) -> &str {
        "sum"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, adapter: &dyn Adapter<V>, args: &[Argument<'_, V>]) -> Result<V, EvaluationError> {
        let value = args[0].value().ok_or_else(|| EvaluationError::failed("sum", "no value"))?;
        let total: f64 = adapter
            .to_list(value)
            .iter()
            .filter_map(|element| adapter.number_value(element))
            .sum();
        Ok(adapter.create_number(total))
    }
}

/// `sort_by(array, &expr)`
pub struct SortBy {
    signature: Signature,
}

impl SortBy {
    pub fn new() -> Self {
        SortBy {
            signature: Signature::new(vec![
                ArgumentType::kind(ValueKind::Array),
                ArgumentType::Expression,
            ]),
        }
    }
}

impl<V: Clone> Function<V> for SortBy {
    fn name(&self) -> &str {
        "sort_by"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, adapter: &dyn Adapter<V>, args: &[Argument<'_, V>]) -> Result<V, EvaluationError> {
        let elements = args[0]
            .value()
            .map(|value| adapter.to_list(value))
            .unwrap_or_default();
        let mut keyed = Vec::with_capacity(elements.len());
        for element in elements {
            let key = args[1].evaluate(adapter, &element)?;
            if adapter.kind_of(&key) != ValueKind::Number {
                return Err(EvaluationError::failed(
                    "sort_by",
                    format!("expected number keys, got {}", adapter.kind_name(&key)),
                ));
            }
            keyed.push((key, element));
        }
        keyed.sort_by(|(a, _), (b, _)| match adapter.compare(a, b) {
            ValueOrdering::Less => std::cmp::Ordering::Less,
            ValueOrdering::Greater => std::cmp::Ordering::Greater,
            _ => std::cmp::Ordering::Equal,
        });
        Ok(adapter.create_array(keyed.into_iter().map(|(_, element)| element).collect()))
    }
}

/// `concat(string, string...)`
pub struct Concat {
    signature: Signature,
}

impl Concat {
    pub fn new() -> Self {
        Concat {
            signature: Signature::variadic(vec![
                ArgumentType::kind(ValueKind::String),
                ArgumentType::kind(ValueKind::String),
            ]),
        }
    }
}

impl<V: Clone> Function<V> for Concat {
    fn name(&self) -> &str {
        "concat"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, adapter: &dyn Adapter<V>, args: &[Argument<'_, V>]) -> Result<V, EvaluationError> {
        let joined: String = args
            .iter()
            .filter_map(|arg| arg.value().and_then(|value| adapter.string_value(value)))
            .collect();
        Ok(adapter.create_string(&joined))
    }
}

/// Counts its invocations; returns its argument unchanged.
pub struct Tap {
    signature: Signature,
    pub calls: Arc<AtomicUsize>,
}

impl Tap {
    pub fn new(calls: Arc<AtomicUsize>) -> Self {
        Tap {
            signature: Signature::new(vec![ArgumentType::Any]),
            calls,
        }
    }
}

impl<V: Clone> Function<V> for Tap {
    fn name(&self) -> &str {
        "tap"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, adapter: &dyn Adapter<V>, args: &[Argument<'_, V>]) -> Result<V, EvaluationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(args[0].value().cloned().unwrap_or_else(|| adapter.create_null()))
    }
}

pub fn registry<V: Clone + 'static>() -> FunctionRegistry<V> {
    let mut registry = FunctionRegistry::new();
    registry
        .register(Length::new())
        .register(Sum::new())
        .register(SortBy::new())
        .register(Concat::new());
    registry
}

pub fn json_adapter() -> JsonAdapter {
    JsonAdapter::with_functions(registry())
}

pub fn eval(node: &Node, data: &Value) -> Result<Value, EvaluationError> {
    let adapter = json_adapter();
    node.evaluate(&adapter, data)
}

pub fn check(node: Node, data: Value, expected: Value) {
    let result = eval(&node, &data).unwrap_or_else(|e| panic!("evaluate({}) failed: {}", node, e));
    assert_eq!(result, expected, "expression: {}", node);
}

pub fn check_err(node: Node, data: Value) -> EvaluationError {
    eval(&node, &data)
        .err()
        .unwrap_or_else(|| panic!("expected error for {}", node))
}
