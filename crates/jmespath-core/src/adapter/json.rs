//! Binding for `serde_json::Value`.

use super::Adapter;
use crate::function::FunctionRegistry;
use crate::kind::ValueKind;
use serde_json::{Map, Number, Value};

/// Largest integer an `f64` holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Adapter over `serde_json::Value` documents.
#[derive(Debug, Default)]
pub struct JsonAdapter {
    functions: FunctionRegistry<Value>,
}

impl JsonAdapter {
    /// An adapter with no callable functions.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_functions(functions: FunctionRegistry<Value>) -> Self {
        JsonAdapter { functions }
    }
}

impl Adapter<Value> for JsonAdapter {
    fn kind_of(&self, value: &Value) -> ValueKind {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    fn to_list(&self, value: &Value) -> Vec<Value> {
        match value {
            Value::Array(items) => items.clone(),
            _ => Vec::new(),
        }
    }

    fn property(&self, value: &Value, name: &str) -> Value {
        value.get(name).cloned().unwrap_or(Value::Null)
    }

    fn property_names(&self, value: &Value) -> Vec<String> {
        match value {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn number_value(&self, value: &Value) -> Option<f64> {
        value.as_f64()
    }

    fn string_value(&self, value: &Value) -> Option<String> {
        value.as_str().map(str::to_string)
    }

    fn boolean_value(&self, value: &Value) -> Option<bool> {
        value.as_bool()
    }

    fn create_null(&self) -> Value {
        Value::Null
    }

    fn create_boolean(&self, value: bool) -> Value {
        Value::Bool(value)
    }

    fn create_number(&self, value: f64) -> Value {
        if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
            Value::Number(Number::from(value as i64))
        } else {
            Number::from_f64(value).map_or(Value::Null, Value::Number)
        }
    }

    fn create_string(&self, value: &str) -> Value {
        Value::String(value.to_string())
    }

    fn create_array(&self, elements: Vec<Value>) -> Value {
        Value::Array(elements)
    }

    fn create_object(&self, entries: Vec<(String, Value)>) -> Value {
        Value::Object(entries.into_iter().collect::<Map<String, Value>>())
    }

    fn functions(&self) -> Option<&FunctionRegistry<Value>> {
        Some(&self.functions)
    }

    fn array_length(&self, value: &Value) -> usize {
        value.as_array().map_or(0, Vec::len)
    }

    fn index(&self, value: &Value, index: usize) -> Value {
        value.get(index).cloned().unwrap_or(Value::Null)
    }

    fn values(&self, value: &Value) -> Vec<Value> {
        match value {
            Value::Object(map) => map.values().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn from_json(&self, json: &Value) -> Value {
        json.clone()
    }

    fn equals(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
            (Value::Array(xs), Value::Array(ys)) => {
                xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| self.equals(x, y))
            }
            (Value::Object(xs), Value::Object(ys)) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .all(|(key, x)| ys.get(key).is_some_and(|y| self.equals(x, y)))
            }
            _ => a == b,
        }
    }
}

/// Integers compare exactly; `f64` is only used when a float is involved.
fn numbers_equal(x: &Number, y: &Number) -> bool {
    if x.is_f64() || y.is_f64() {
        return x.as_f64() == y.as_f64();
    }
    match (x.as_i64(), y.as_i64()) {
        (Some(a), Some(b)) => a == b,
        _ => x.as_u64().is_some() && x.as_u64() == y.as_u64(),
    }
}
