//! The value-representation layer.
//!
//! The evaluator never looks at a concrete document type. Everything it
//! needs to know about a value, and every value it builds, goes through an
//! [`Adapter`] bound to that representation.

pub mod json;

use crate::function::FunctionRegistry;
use crate::kind::ValueKind;
use serde_json::Value as Json;
use std::cmp;
use std::collections::HashSet;

pub use json::JsonAdapter;

/// Result of [`Adapter::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueOrdering {
    Less,
    Equal,
    Greater,
    /// The two values have no defined order.
    Incomparable,
}

impl From<cmp::Ordering> for ValueOrdering {
    fn from(ordering: cmp::Ordering) -> Self {
        match ordering {
            cmp::Ordering::Less => ValueOrdering::Less,
            cmp::Ordering::Equal => ValueOrdering::Equal,
            cmp::Ordering::Greater => ValueOrdering::Greater,
        }
    }
}

/// Bridges the language semantics to one concrete value type `V`.
///
/// An adapter is a stateless bundle of pure functions: it is built once per
/// binding and shared freely between threads and evaluations. Implementors
/// supply the inspection and construction primitives; the remaining methods
/// have defaults written in terms of those and only need overriding when the
/// representation offers something cheaper.
///
/// Non-array values coerce to an empty sequence in [`Adapter::to_list`].
/// Implementations must keep that policy, flatten relies on it.
pub trait Adapter<V>: Send + Sync {
    fn kind_of(&self, value: &V) -> ValueKind;

    /// Elements of an array; empty for every other kind.
    fn to_list(&self, value: &V) -> Vec<V>;

    /// Field lookup. Null when `value` is not an object or lacks `name`.
    fn property(&self, value: &V, name: &str) -> V;

    /// Keys of an object in iteration order; empty for every other kind.
    fn property_names(&self, value: &V) -> Vec<String>;

    fn number_value(&self, value: &V) -> Option<f64>;

    fn string_value(&self, value: &V) -> Option<String>;

    fn boolean_value(&self, value: &V) -> Option<bool>;

    fn create_null(&self) -> V;

    fn create_boolean(&self, value: bool) -> V;

    fn create_number(&self, value: f64) -> V;

    fn create_string(&self, value: &str) -> V;

    fn create_array(&self, elements: Vec<V>) -> V;

    fn create_object(&self, entries: Vec<(String, V)>) -> V;

    /// Functions callable from expressions evaluated through this adapter.
    fn functions(&self) -> Option<&FunctionRegistry<V>> {
        None
    }

    fn is_array(&self, value: &V) -> bool {
        self.kind_of(value) == ValueKind::Array
    }

    fn is_object(&self, value: &V) -> bool {
        self.kind_of(value) == ValueKind::Object
    }

    fn is_null(&self, value: &V) -> bool {
        self.kind_of(value) == ValueKind::Null
    }

    /// `false`, null and empty strings, arrays and objects are falsy.
    /// Every number is truthy, zero included.
    fn is_truthy(&self, value: &V) -> bool {
        match self.kind_of(value) {
            ValueKind::Null => false,
            ValueKind::Boolean => self.boolean_value(value).unwrap_or(false),
            ValueKind::String => self
                .string_value(value)
                .is_some_and(|s| !s.is_empty()),
            ValueKind::Array => self.array_length(value) > 0,
            ValueKind::Object => !self.property_names(value).is_empty(),
            ValueKind::Number | ValueKind::Date => true,
        }
    }

    fn array_length(&self, value: &V) -> usize {
        self.to_list(value).len()
    }

    /// Element at a non-negative position; null when out of range or not an array.
    fn index(&self, value: &V, index: usize) -> V {
        self.to_list(value)
            .into_iter()
            .nth(index)
            .unwrap_or_else(|| self.create_null())
    }

    /// Values of an object in key order; empty for every other kind.
    fn values(&self, value: &V) -> Vec<V> {
        self.property_names(value)
            .iter()
            .map(|name| self.property(value, name))
            .collect()
    }

    /// Orders two numbers (or two dates through their numeric form).
    /// `null` equals `null`; every other pair is incomparable.
    fn compare(&self, a: &V, b: &V) -> ValueOrdering {
        match (self.kind_of(a), self.kind_of(b)) {
            (ValueKind::Null, ValueKind::Null) => ValueOrdering::Equal,
            (ValueKind::Number, ValueKind::Number) | (ValueKind::Date, ValueKind::Date) => {
                match (self.number_value(a), self.number_value(b)) {
                    (Some(x), Some(y)) => x
                        .partial_cmp(&y)
                        .map_or(ValueOrdering::Incomparable, ValueOrdering::from),
                    _ => ValueOrdering::Incomparable,
                }
            }
            _ => ValueOrdering::Incomparable,
        }
    }

    /// Deep structural equality. Values of different kinds are never equal.
    fn equals(&self, a: &V, b: &V) -> bool {
        let kind = self.kind_of(a);
        if kind != self.kind_of(b) {
            return false;
        }
        match kind {
            ValueKind::Null => true,
            ValueKind::Boolean => self.boolean_value(a) == self.boolean_value(b),
            ValueKind::String => self.string_value(a) == self.string_value(b),
            ValueKind::Number => self.compare(a, b) == ValueOrdering::Equal,
            ValueKind::Date => match self.compare(a, b) {
                ValueOrdering::Incomparable => self.string_value(a) == self.string_value(b),
                ordering => ordering == ValueOrdering::Equal,
            },
            ValueKind::Array => {
                let left = self.to_list(a);
                let right = self.to_list(b);
                left.len() == right.len()
                    && left.iter().zip(&right).all(|(x, y)| self.equals(x, y))
            }
            ValueKind::Object => {
                let left = self.property_names(a);
                let right: HashSet<String> = self.property_names(b).into_iter().collect();
                left.len() == right.len()
                    && left.iter().all(|name| {
                        right.contains(name)
                            && self.equals(&self.property(a, name), &self.property(b, name))
                    })
            }
        }
    }

    /// Builds `V` from a representation-independent JSON constant.
    fn from_json(&self, json: &Json) -> V {
        match json {
            Json::Null => self.create_null(),
            Json::Bool(b) => self.create_boolean(*b),
            Json::Number(n) => n
                .as_f64()
                .map_or_else(|| self.create_null(), |f| self.create_number(f)),
            Json::String(s) => self.create_string(s),
            Json::Array(items) => {
                self.create_array(items.iter().map(|item| self.from_json(item)).collect())
            }
            Json::Object(map) => self.create_object(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.from_json(item)))
                    .collect(),
            ),
        }
    }

    /// Kind name for diagnostics.
    fn kind_name(&self, value: &V) -> &'static str {
        self.kind_of(value).name()
    }
}
