//! The boundary between expressions and host-supplied functions.
//!
//! The evaluator only knows how to find a function by name, check the
//! arguments against its [`Signature`] and hand them over. What a function
//! does with them is up to the host.

use crate::adapter::Adapter;
use crate::error::EvaluationError;
use crate::kind::ValueKind;
use crate::node::Node;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What a single parameter accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentType {
    /// Any value (but not an expression reference).
    Any,
    /// A value whose kind is one of these.
    Kinds(Vec<ValueKind>),
    /// An array whose elements all have one of these kinds.
    ArrayOf(Vec<ValueKind>),
    /// An unevaluated expression reference (`&expr`).
    Expression,
}

impl ArgumentType {
    pub fn kind(kind: ValueKind) -> Self {
        ArgumentType::Kinds(vec![kind])
    }

    fn accepts<V>(&self, adapter: &dyn Adapter<V>, argument: &Argument<'_, V>) -> bool {
        match (self, argument) {
            (ArgumentType::Expression, Argument::Expression(_)) => true,
            (ArgumentType::Expression, Argument::Value(_)) => false,
            (_, Argument::Expression(_)) => false,
            (ArgumentType::Any, Argument::Value(_)) => true,
            (ArgumentType::Kinds(kinds), Argument::Value(value)) => {
                kinds.contains(&adapter.kind_of(value))
            }
            (ArgumentType::ArrayOf(kinds), Argument::Value(value)) => {
                adapter.is_array(value)
                    && adapter
                        .to_list(value)
                        .iter()
                        .all(|element| kinds.contains(&adapter.kind_of(element)))
            }
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(kinds: &[ValueKind]) -> String {
            kinds
                .iter()
                .map(|kind| kind.name())
                .collect::<Vec<_>>()
                .join(" or ")
        }
        match self {
            ArgumentType::Any => write!(f, "any"),
            ArgumentType::Kinds(kinds) => write!(f, "{}", join(kinds)),
            ArgumentType::ArrayOf(kinds) => write!(f, "array[{}]", join(kinds)),
            ArgumentType::Expression => write!(f, "expression"),
        }
    }
}

/// Declared arity and parameter types of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<ArgumentType>,
    min_arity: usize,
    max_arity: Option<usize>,
}

impl Signature {
    /// Exactly one argument per parameter.
    pub fn new(params: Vec<ArgumentType>) -> Self {
        let arity = params.len();
        Signature {
            params,
            min_arity: arity,
            max_arity: Some(arity),
        }
    }

    /// At least one argument per parameter; extra arguments take the last
    /// parameter's type.
    pub fn variadic(params: Vec<ArgumentType>) -> Self {
        let min_arity = params.len();
        Signature {
            params,
            min_arity,
            max_arity: None,
        }
    }

    /// The first `required` parameters are mandatory, the rest optional.
    pub fn with_optional(params: Vec<ArgumentType>, required: usize) -> Self {
        let max = params.len();
        Signature {
            params,
            min_arity: required.min(max),
            max_arity: Some(max),
        }
    }

    pub fn min_arity(&self) -> usize {
        self.min_arity
    }

    pub fn max_arity(&self) -> Option<usize> {
        self.max_arity
    }

    /// Type expected at `position` (zero based).
    pub fn param(&self, position: usize) -> Option<&ArgumentType> {
        match self.params.get(position) {
            Some(param) => Some(param),
            None if self.max_arity.is_none() => self.params.last(),
            None => None,
        }
    }

    fn arity_description(&self) -> String {
        match self.max_arity {
            Some(max) if max == self.min_arity => format!("{}", max),
            Some(max) => format!("{} to {}", self.min_arity, max),
            None => format!("at least {}", self.min_arity),
        }
    }

    /// Checks arity, then every argument against its parameter type.
    pub fn validate<V>(
        &self,
        name: &str,
        adapter: &dyn Adapter<V>,
        args: &[Argument<'_, V>],
    ) -> Result<(), EvaluationError> {
        let count = args.len();
        let too_many = self.max_arity.is_some_and(|max| count > max);
        if count < self.min_arity || too_many {
            return Err(EvaluationError::InvalidArity {
                name: name.to_string(),
                expected: self.arity_description(),
                actual: count,
            });
        }
        for (position, argument) in args.iter().enumerate() {
            let Some(param) = self.param(position) else {
                continue;
            };
            if !param.accepts(adapter, argument) {
                return Err(EvaluationError::InvalidArgumentType {
                    name: name.to_string(),
                    position: position + 1,
                    expected: param.to_string(),
                    actual: argument.describe(adapter),
                });
            }
        }
        Ok(())
    }
}

/// One argument as delivered to a function body.
#[derive(Debug, Clone)]
pub enum Argument<'a, V> {
    Value(V),
    /// Expression references are passed through unevaluated.
    Expression(&'a Node),
}

impl<'a, V: Clone> Argument<'a, V> {
    pub fn value(&self) -> Option<&V> {
        match self {
            Argument::Value(value) => Some(value),
            Argument::Expression(_) => None,
        }
    }

    pub fn expression(&self) -> Option<&'a Node> {
        match self {
            Argument::Value(_) => None,
            Argument::Expression(node) => Some(*node),
        }
    }

    /// Evaluates an expression argument against `current`. A plain value
    /// argument evaluates to itself.
    pub fn evaluate(&self, adapter: &dyn Adapter<V>, current: &V) -> Result<V, EvaluationError> {
        match self {
            Argument::Value(value) => Ok(value.clone()),
            Argument::Expression(node) => node.evaluate(adapter, current),
        }
    }
}

impl<V> Argument<'_, V> {
    fn describe(&self, adapter: &dyn Adapter<V>) -> String {
        match self {
            Argument::Expression(_) => "expression".to_string(),
            Argument::Value(value) if adapter.is_array(value) => {
                let mut kinds: Vec<ValueKind> = adapter
                    .to_list(value)
                    .iter()
                    .map(|element| adapter.kind_of(element))
                    .collect();
                kinds.sort();
                kinds.dedup();
                if kinds.is_empty() {
                    "array".to_string()
                } else {
                    let names: Vec<&str> = kinds.iter().map(|kind| kind.name()).collect();
                    format!("array[{}]", names.join(" or "))
                }
            }
            Argument::Value(value) => adapter.kind_name(value).to_string(),
        }
    }
}

/// A host function callable from expressions.
pub trait Function<V>: Send + Sync {
    fn name(&self) -> &str;

    fn signature(&self) -> &Signature;

    /// Runs the function. Arguments have already been checked against
    /// [`Function::signature`].
    fn call(&self, adapter: &dyn Adapter<V>, args: &[Argument<'_, V>])
        -> Result<V, EvaluationError>;
}

/// Name to function table.
pub struct FunctionRegistry<V> {
    functions: HashMap<String, Arc<dyn Function<V>>>,
}

impl<V> FunctionRegistry<V> {
    pub fn new() -> Self {
        FunctionRegistry {
            functions: HashMap::new(),
        }
    }

    /// Adds `function`, replacing any earlier one with the same name.
    pub fn register(&mut self, function: impl Function<V> + 'static) -> &mut Self {
        self.register_arc(Arc::new(function))
    }

    pub fn register_arc(&mut self, function: Arc<dyn Function<V>>) -> &mut Self {
        self.functions.insert(function.name().to_string(), function);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn Function<V>>> {
        self.functions.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl<V> Default for FunctionRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Extend<Arc<dyn Function<V>>> for FunctionRegistry<V> {
    fn extend<I: IntoIterator<Item = Arc<dyn Function<V>>>>(&mut self, iter: I) {
        for function in iter {
            self.register_arc(function);
        }
    }
}

impl<V> fmt::Debug for FunctionRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
