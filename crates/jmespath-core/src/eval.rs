//! Tree-walking evaluation.
//!
//! Every value is inspected and built through the adapter. Projections,
//! flattens and multi-selects always produce fresh containers; the input
//! document is never modified.

use crate::adapter::{Adapter, ValueOrdering};
use crate::error::EvaluationError;
use crate::function::Argument;
use crate::kind::ValueKind;
use crate::node::{Comparator, Node};
use tracing::{debug, trace};

/// A result plus whether it came out of a projection that a following
/// sub-expression should continue.
struct Evaluated<V> {
    value: V,
    projecting: bool,
}

impl<V> Evaluated<V> {
    fn plain(value: V) -> Self {
        Evaluated {
            value,
            projecting: false,
        }
    }

    fn projecting(value: V) -> Self {
        Evaluated {
            value,
            projecting: true,
        }
    }
}

impl Node {
    /// Evaluates this tree with `current` as the value `@` refers to.
    ///
    /// Evaluation is pure: the same tree, adapter and input always produce
    /// the same result. Recursion depth equals tree depth and is not
    /// checked here (see [`Node::depth`]).
    pub fn evaluate<V: Clone>(
        &self,
        adapter: &dyn Adapter<V>,
        current: &V,
    ) -> Result<V, EvaluationError> {
        Ok(self.eval(adapter, current)?.value)
    }

    fn eval<V: Clone>(
        &self,
        adapter: &dyn Adapter<V>,
        current: &V,
    ) -> Result<Evaluated<V>, EvaluationError> {
        match self {
            Node::Current | Node::Identity => Ok(Evaluated::plain(current.clone())),
            Node::Literal(literal) => Ok(Evaluated::plain(adapter.from_json(literal.value()))),
            Node::Field { source, name } => {
                let input = source.evaluate(adapter, current)?;
                let value = if adapter.is_object(&input) {
                    adapter.property(&input, name)
                } else {
                    adapter.create_null()
                };
                Ok(Evaluated::plain(value))
            }
            Node::Index { source, index } => {
                let input = source.evaluate(adapter, current)?;
                let value = if adapter.is_array(&input) {
                    match resolve_index(*index, adapter.array_length(&input)) {
                        Some(position) => adapter.index(&input, position),
                        None => adapter.create_null(),
                    }
                } else {
                    adapter.create_null()
                };
                Ok(Evaluated::plain(value))
            }
            Node::Slice {
                source,
                start,
                stop,
                step,
            } => {
                let step = step.unwrap_or(1);
                if step == 0 {
                    debug!(error = %EvaluationError::ZeroSliceStep, "slice rejected");
                    return Err(EvaluationError::ZeroSliceStep);
                }
                let input = source.evaluate(adapter, current)?;
                if !adapter.is_array(&input) {
                    return Ok(Evaluated::plain(adapter.create_null()));
                }
                let elements = adapter.to_list(&input);
                let sliced = slice_positions(elements.len(), *start, *stop, step)
                    .into_iter()
                    .map(|position| elements[position].clone())
                    .collect();
                Ok(Evaluated::plain(adapter.create_array(sliced)))
            }
            Node::FlattenList { source } => {
                let input = source.evaluate(adapter, current)?;
                Ok(Evaluated::plain(
                    adapter.create_array(flatten_elements(adapter, &input)),
                ))
            }
            Node::Pipe { left, right } => {
                let input = left.evaluate(adapter, current)?;
                Ok(Evaluated::plain(right.evaluate(adapter, &input)?))
            }
            Node::SubExpression { left, right } => {
                let input = left.eval(adapter, current)?;
                if !input.projecting {
                    return right.eval(adapter, &input.value);
                }
                if !adapter.is_array(&input.value) {
                    return Ok(input);
                }
                let projected = project(adapter, adapter.to_list(&input.value), right)?;
                Ok(Evaluated::projecting(projected))
            }
            Node::ListProjection { source, body } => {
                let input = source.evaluate(adapter, current)?;
                if !adapter.is_array(&input) {
                    return Ok(Evaluated::projecting(adapter.create_null()));
                }
                let projected = project(adapter, adapter.to_list(&input), body)?;
                Ok(Evaluated::projecting(projected))
            }
            Node::ObjectProjection { source, body } => {
                let input = source.evaluate(adapter, current)?;
                if !adapter.is_object(&input) {
                    return Ok(Evaluated::projecting(adapter.create_null()));
                }
                let projected = project(adapter, adapter.values(&input), body)?;
                Ok(Evaluated::projecting(projected))
            }
            Node::FlattenProjection { source, body } => {
                let input = source.evaluate(adapter, current)?;
                let projected = project(adapter, flatten_elements(adapter, &input), body)?;
                Ok(Evaluated::projecting(projected))
            }
            Node::MultiSelectList { items } => {
                if adapter.is_null(current) {
                    return Ok(Evaluated::plain(adapter.create_null()));
                }
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(item.evaluate(adapter, current)?);
                }
                Ok(Evaluated::plain(adapter.create_array(values)))
            }
            Node::MultiSelectHash { entries } => {
                if adapter.is_null(current) {
                    return Ok(Evaluated::plain(adapter.create_null()));
                }
                let mut values = Vec::with_capacity(entries.len());
                for (key, item) in entries {
                    values.push((key.clone(), item.evaluate(adapter, current)?));
                }
                Ok(Evaluated::plain(adapter.create_object(values)))
            }
            Node::Filter { source, predicate } => {
                let input = source.evaluate(adapter, current)?;
                if !adapter.is_array(&input) {
                    return Ok(Evaluated::projecting(adapter.create_null()));
                }
                let mut kept = Vec::new();
                for element in adapter.to_list(&input) {
                    let test = predicate.evaluate(adapter, &element)?;
                    if adapter.is_truthy(&test) {
                        kept.push(element);
                    }
                }
                Ok(Evaluated::projecting(adapter.create_array(kept)))
            }
            Node::Comparison { op, left, right } => {
                let left = left.evaluate(adapter, current)?;
                let right = right.evaluate(adapter, current)?;
                let value = match compare(adapter, *op, &left, &right) {
                    Some(result) => adapter.create_boolean(result),
                    None => adapter.create_null(),
                };
                Ok(Evaluated::plain(value))
            }
            Node::And { left, right } => {
                let value = left.evaluate(adapter, current)?;
                if !adapter.is_truthy(&value) {
                    return Ok(Evaluated::plain(value));
                }
                Ok(Evaluated::plain(right.evaluate(adapter, current)?))
            }
            Node::Or { left, right } => {
                let value = left.evaluate(adapter, current)?;
                if adapter.is_truthy(&value) {
                    return Ok(Evaluated::plain(value));
                }
                Ok(Evaluated::plain(right.evaluate(adapter, current)?))
            }
            Node::Not { operand } => {
                let value = operand.evaluate(adapter, current)?;
                Ok(Evaluated::plain(adapter.create_boolean(!adapter.is_truthy(&value))))
            }
            Node::FunctionCall { name, args } => Ok(Evaluated::plain(call_function(
                adapter, name, args, current,
            )?)),
            // Only meaningful as a function argument.
            Node::ExpressionRef { .. } => Ok(Evaluated::plain(adapter.create_null())),
        }
    }
}

/// Applies `body` to every element, dropping null results.
fn project<V: Clone>(
    adapter: &dyn Adapter<V>,
    elements: Vec<V>,
    body: &Node,
) -> Result<V, EvaluationError> {
    let mut results = Vec::with_capacity(elements.len());
    for element in &elements {
        let value = body.evaluate(adapter, element)?;
        if !adapter.is_null(&value) {
            results.push(value);
        }
    }
    Ok(adapter.create_array(results))
}

/// Splices array elements one level deep; never recurses further.
fn flatten_elements<V>(adapter: &dyn Adapter<V>, value: &V) -> Vec<V> {
    let mut flattened = Vec::new();
    for element in adapter.to_list(value) {
        if adapter.is_array(&element) {
            flattened.extend(adapter.to_list(&element));
        } else {
            flattened.push(element);
        }
    }
    flattened
}

fn compare<V>(adapter: &dyn Adapter<V>, op: Comparator, left: &V, right: &V) -> Option<bool> {
    match op {
        Comparator::Equal => Some(adapter.equals(left, right)),
        Comparator::NotEqual => Some(!adapter.equals(left, right)),
        Comparator::Less => ordering(adapter, left, right).map(|o| o == ValueOrdering::Less),
        Comparator::LessEqual => ordering(adapter, left, right).map(|o| o != ValueOrdering::Greater),
        Comparator::Greater => ordering(adapter, left, right).map(|o| o == ValueOrdering::Greater),
        Comparator::GreaterEqual => ordering(adapter, left, right).map(|o| o != ValueOrdering::Less),
    }
}

/// Order between two numbers (or two dates); `None` for any other pair.
fn ordering<V>(adapter: &dyn Adapter<V>, left: &V, right: &V) -> Option<ValueOrdering> {
    let kind = adapter.kind_of(left);
    if kind != adapter.kind_of(right) || !matches!(kind, ValueKind::Number | ValueKind::Date) {
        return None;
    }
    match adapter.compare(left, right) {
        ValueOrdering::Incomparable => None,
        ordering => Some(ordering),
    }
}

fn call_function<V: Clone>(
    adapter: &dyn Adapter<V>,
    name: &str,
    arg_nodes: &[Node],
    current: &V,
) -> Result<V, EvaluationError> {
    let mut args = Vec::with_capacity(arg_nodes.len());
    for node in arg_nodes {
        match node {
            Node::ExpressionRef { expression } => args.push(Argument::Expression(&**expression)),
            other => args.push(Argument::Value(other.evaluate(adapter, current)?)),
        }
    }

    let Some(function) = adapter.functions().and_then(|registry| registry.lookup(name)) else {
        debug!(function = name, "unknown function");
        return Err(EvaluationError::UnknownFunction {
            name: name.to_string(),
        });
    };

    if let Err(error) = function.signature().validate(name, adapter, &args) {
        debug!(function = name, %error, "function arguments rejected");
        return Err(error);
    }

    trace!(function = name, args = args.len(), "dispatching function call");
    function.call(adapter, &args)
}

/// Wraps a negative index from the end. `None` when out of range.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let position = if index < 0 { len.checked_add(index)? } else { index };
    if (0..len).contains(&position) {
        usize::try_from(position).ok()
    } else {
        None
    }
}

/// Positions selected by a Python-style slice over `len` elements.
/// `step` must be non-zero.
fn slice_positions(len: usize, start: Option<i64>, stop: Option<i64>, step: i64) -> Vec<usize> {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let start = match start {
        Some(start) => cap_slice_bound(len, start, step),
        None if step < 0 => len - 1,
        None => 0,
    };
    let stop = match stop {
        Some(stop) => cap_slice_bound(len, stop, step),
        None if step < 0 => -1,
        None => len,
    };

    let mut positions = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        positions.push(i as usize);
        match i.checked_add(step) {
            Some(next) => i = next,
            None => break,
        }
    }
    positions
}

fn cap_slice_bound(len: i64, bound: i64, step: i64) -> i64 {
    if bound < 0 {
        let bound = bound.saturating_add(len);
        if bound >= 0 {
            bound
        } else if step < 0 {
            -1
        } else {
            0
        }
    } else if bound >= len {
        if step < 0 {
            len - 1
        } else {
            len
        }
    } else {
        bound
    }
}
