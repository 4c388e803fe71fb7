//! Expression syntax tree.

use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use strum::{Display, EnumDiscriminants, EnumString, IntoStaticStr};

/// One node of an expression tree.
///
/// Nodes own their children exclusively and never hold a value of the
/// document being queried, so a tree can be evaluated through any
/// [`Adapter`](crate::Adapter). Equality and hashing are structural: two
/// trees are equal when they have the same shape, the same node-local
/// constants and pairwise-equal children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumDiscriminants)]
#[strum_discriminants(name(NodeKind), derive(Hash, Display, IntoStaticStr))]
pub enum Node {
    /// `@`
    Current,
    /// Evaluates like `Current`; used as the default root of a tree.
    Identity,
    Literal(Literal),
    Field {
        source: Box<Node>,
        name: String,
    },
    Index {
        source: Box<Node>,
        index: i64,
    },
    Slice {
        source: Box<Node>,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    },
    FlattenList {
        source: Box<Node>,
    },
    /// `left | right`. Stops any projection started on the left.
    Pipe {
        left: Box<Node>,
        right: Box<Node>,
    },
    /// `left.right`. Continues a projection started on the left.
    SubExpression {
        left: Box<Node>,
        right: Box<Node>,
    },
    ListProjection {
        source: Box<Node>,
        body: Box<Node>,
    },
    ObjectProjection {
        source: Box<Node>,
        body: Box<Node>,
    },
    FlattenProjection {
        source: Box<Node>,
        body: Box<Node>,
    },
    MultiSelectList {
        items: Vec<Node>,
    },
    MultiSelectHash {
        entries: Vec<(String, Node)>,
    },
    Filter {
        source: Box<Node>,
        predicate: Box<Node>,
    },
    Comparison {
        op: Comparator,
        left: Box<Node>,
        right: Box<Node>,
    },
    And {
        left: Box<Node>,
        right: Box<Node>,
    },
    Or {
        left: Box<Node>,
        right: Box<Node>,
    },
    Not {
        operand: Box<Node>,
    },
    FunctionCall {
        name: String,
        args: Vec<Node>,
    },
    /// `&expr`, handed to functions unevaluated.
    ExpressionRef {
        expression: Box<Node>,
    },
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        NodeKind::from(self)
    }

    /// Direct children in evaluation order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Current | Node::Identity | Node::Literal(_) => Vec::new(),
            Node::Field { source, .. }
            | Node::Index { source, .. }
            | Node::Slice { source, .. }
            | Node::FlattenList { source } => vec![&**source],
            Node::Pipe { left, right }
            | Node::SubExpression { left, right }
            | Node::Comparison { left, right, .. }
            | Node::And { left, right }
            | Node::Or { left, right } => vec![&**left, &**right],
            Node::ListProjection { source, body }
            | Node::ObjectProjection { source, body }
            | Node::FlattenProjection { source, body } => vec![&**source, &**body],
            Node::Filter { source, predicate } => vec![&**source, &**predicate],
            Node::MultiSelectList { items } => items.iter().collect(),
            Node::MultiSelectHash { entries } => entries.iter().map(|(_, node)| node).collect(),
            Node::Not { operand } => vec![&**operand],
            Node::FunctionCall { args, .. } => args.iter().collect(),
            Node::ExpressionRef { expression } => vec![&**expression],
        }
    }

    /// Height of the tree; a leaf has depth 1. Hosts use this to bound
    /// recursion before evaluating untrusted expressions.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Node::depth)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Current => return write!(f, "@"),
            Node::Literal(literal) => return write!(f, "`{}`", literal),
            _ => {}
        }
        let mut parts = Vec::new();
        match self {
            Node::Field { name, .. } | Node::FunctionCall { name, .. } => {
                parts.push(format!("{:?}", name));
            }
            Node::Index { index, .. } => parts.push(index.to_string()),
            Node::Slice {
                start, stop, step, ..
            } => {
                let part = |p: &Option<i64>| p.map(|n| n.to_string()).unwrap_or_default();
                parts.push(format!("{}:{}:{}", part(start), part(stop), part(step)));
            }
            Node::Comparison { op, .. } => parts.push(op.to_string()),
            _ => {}
        }
        if let Node::MultiSelectHash { entries } = self {
            parts.extend(entries.iter().map(|(key, node)| format!("{:?}: {}", key, node)));
        } else {
            parts.extend(self.children().into_iter().map(Node::to_string));
        }
        write!(f, "{}({})", self.kind(), parts.join(", "))
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Comparator {
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessEqual,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = ">=")]
    GreaterEqual,
}

/// A constant embedded in an expression.
///
/// Held as JSON rather than as a document value so the tree stays
/// independent of any representation; it is converted through
/// [`Adapter::from_json`](crate::Adapter::from_json) when evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal(Value);

impl Literal {
    pub fn new(value: Value) -> Self {
        Literal(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Literal {
    fn from(value: Value) -> Self {
        Literal(value)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Object keys are hashed in sorted order: `Map` equality ignores order.
impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_json(&self.0, state);
    }
}

fn hash_json<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            2u8.hash(state);
            n.to_string().hash(state);
        }
        Value::String(s) => {
            3u8.hash(state);
            s.hash(state);
        }
        Value::Array(items) => {
            4u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_json(item, state);
            }
        }
        Value::Object(map) => {
            5u8.hash(state);
            map.len().hash(state);
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                key.hash(state);
                hash_json(&map[key.as_str()], state);
            }
        }
    }
}
