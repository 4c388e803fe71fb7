use crate::node::NodeKind;
use thiserror::Error;

/// Hard evaluation failures.
///
/// Missing fields, out-of-range indices and kind mismatches outside of
/// function calls are not errors; they evaluate to null. The variants here
/// mean the expression itself is invalid for the function registry in use,
/// and they abort the whole evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("unknown function \"{name}()\"")]
    UnknownFunction { name: String },

    #[error("invalid arity calling \"{name}()\": expected {expected} arguments, got {actual}")]
    InvalidArity {
        name: String,
        expected: String,
        actual: usize,
    },

    #[error("invalid type for argument {position} of \"{name}()\": expected {expected}, got {actual}")]
    InvalidArgumentType {
        name: String,
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("slice step cannot be zero")]
    ZeroSliceStep,

    #[error("\"{name}()\" failed: {message}")]
    FunctionFailed { name: String, message: String },
}

impl EvaluationError {
    /// Error for a function body that cannot produce a value.
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        EvaluationError::FunctionFailed {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The kind of node that raised the error.
    pub fn node_kind(&self) -> NodeKind {
        match self {
            EvaluationError::ZeroSliceStep => NodeKind::Slice,
            _ => NodeKind::FunctionCall,
        }
    }
}
