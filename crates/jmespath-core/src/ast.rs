//! AST construction helpers.
//!
//! Builds trees in the shape a JMESPath parser produces: chained steps
//! nest as sub-expressions, and everything to the right of a projection
//! lives in the projection's body.

use crate::node::{Comparator, Literal, Node};
use serde_json::Value;

/// Helper functions for constructing expression trees.
pub struct Ast;

impl Ast {
    /// `@`
    pub fn current() -> Node {
        Node::Current
    }

    pub fn identity() -> Node {
        Node::Identity
    }

    /// `` `value` ``
    pub fn literal(value: Value) -> Node {
        Node::Literal(Literal::new(value))
    }

    /// `'text'`
    pub fn raw_string(text: impl Into<String>) -> Node {
        Node::Literal(Literal::new(Value::String(text.into())))
    }

    /// `name`, looked up on the current value.
    pub fn field(name: impl Into<String>) -> Node {
        Ast::field_of(Node::Current, name)
    }

    pub fn field_of(source: Node, name: impl Into<String>) -> Node {
        Node::Field {
            source: Box::new(source),
            name: name.into(),
        }
    }

    /// `[index]` on the current value.
    pub fn index(index: i64) -> Node {
        Ast::index_of(Node::Current, index)
    }

    pub fn index_of(source: Node, index: i64) -> Node {
        Node::Index {
            source: Box::new(source),
            index,
        }
    }

    /// `[start:stop:step]` on the current value.
    pub fn slice(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Node {
        Ast::slice_of(Node::Current, start, stop, step)
    }

    pub fn slice_of(source: Node, start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Node {
        Node::Slice {
            source: Box::new(source),
            start,
            stop,
            step,
        }
    }

    /// Flattens one level without starting a projection.
    pub fn flatten_list(source: Node) -> Node {
        Node::FlattenList {
            source: Box::new(source),
        }
    }

    /// `source[]`
    pub fn flatten(source: Node) -> Node {
        Ast::flatten_project(source, Node::Current)
    }

    /// `source[].body`
    pub fn flatten_project(source: Node, body: Node) -> Node {
        Node::FlattenProjection {
            source: Box::new(source),
            body: Box::new(body),
        }
    }

    /// `left | right`
    pub fn pipe(left: Node, right: Node) -> Node {
        Node::Pipe {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `left.right`
    pub fn sub(left: Node, right: Node) -> Node {
        Node::SubExpression {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Left-nested chain of sub-expressions: `a.b.c`.
    pub fn chain(steps: Vec<Node>) -> Node {
        let mut steps = steps.into_iter();
        let first = steps.next().unwrap_or(Node::Current);
        steps.fold(first, Ast::sub)
    }

    /// `source[*].body`
    pub fn project(source: Node, body: Node) -> Node {
        Node::ListProjection {
            source: Box::new(source),
            body: Box::new(body),
        }
    }

    /// `source.*.body`
    pub fn project_values(source: Node, body: Node) -> Node {
        Node::ObjectProjection {
            source: Box::new(source),
            body: Box::new(body),
        }
    }

    /// `[a, b, ...]`
    pub fn multi_select_list(items: Vec<Node>) -> Node {
        Node::MultiSelectList { items }
    }

    /// `{key: expr, ...}`
    pub fn multi_select_hash<K: Into<String>>(entries: Vec<(K, Node)>) -> Node {
        Node::MultiSelectHash {
            entries: entries
                .into_iter()
                .map(|(key, node)| (key.into(), node))
                .collect(),
        }
    }

    /// `source[?predicate]`
    pub fn filter(source: Node, predicate: Node) -> Node {
        Node::Filter {
            source: Box::new(source),
            predicate: Box::new(predicate),
        }
    }

    pub fn compare(op: Comparator, left: Node, right: Node) -> Node {
        Node::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `left && right`
    pub fn and(left: Node, right: Node) -> Node {
        Node::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `left || right`
    pub fn or(left: Node, right: Node) -> Node {
        Node::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `!operand`
    pub fn not(operand: Node) -> Node {
        Node::Not {
            operand: Box::new(operand),
        }
    }

    /// `name(args...)`
    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Node {
        Node::FunctionCall {
            name: name.into(),
            args,
        }
    }

    /// `&expression`
    pub fn expression_ref(expression: Node) -> Node {
        Node::ExpressionRef {
            expression: Box::new(expression),
        }
    }
}
