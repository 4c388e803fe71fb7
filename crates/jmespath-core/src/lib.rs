//! JMESPath evaluation engine.
//!
//! # Overview
//!
//! Expressions are trees of [`Node`]s. A tree never holds document values;
//! it is evaluated through an [`Adapter`] that knows how to inspect and
//! build values of one concrete representation. The same tree can be run
//! over `serde_json::Value` (via [`JsonAdapter`]) or any other document
//! model that implements the trait.
//!
//! Missing fields, out-of-range indices and kind mismatches evaluate to
//! null. Only invalid function calls and zero slice steps are errors.
//!
//! # Example
//!
//! ```
//! use jmespath_core::{Ast, JsonAdapter};
//! use serde_json::json;
//!
//! // people[*].name
//! let expr = Ast::project(Ast::field("people"), Ast::field("name"));
//! let doc = json!({"people": [{"name": "ann"}, {"age": 3}, {"name": "bo"}]});
//!
//! let result = expr.evaluate(&JsonAdapter::new(), &doc).unwrap();
//! assert_eq!(result, json!(["ann", "bo"]));
//! ```

pub mod adapter;
pub mod ast;
pub mod error;
mod eval;
pub mod function;
pub mod kind;
pub mod node;

// Re-export the core public API
pub use adapter::{Adapter, JsonAdapter, ValueOrdering};
pub use ast::Ast;
pub use error::EvaluationError;
pub use function::{Argument, ArgumentType, Function, FunctionRegistry, Signature};
pub use kind::ValueKind;
pub use node::{Comparator, Literal, Node, NodeKind};
