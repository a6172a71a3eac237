//! splat-expr compiles small arithmetic expressions over dataflow nodes into a
//! single composed node.
//!
//! An expression is literal text interleaved with interpolated values. The
//! compiler lexes and parses the text with precedence climbing and lowers
//! each reduction straight onto a [`NodeLibrary`]; there is no AST stage.
//!
//! - Operators `+ - * / %` with the usual precedence, parentheses for grouping
//! - Component access on interpolated values: `{}.x`, `{}.center.z`
//! - Calls `mix/3`, `max/2`, `min/2`, `step/2`, `pow/2`, `sin/1`, `cos/1`,
//!   `fract/1`, `sqrt/1`, and the constant `PI`
//!
//! ```
//! use splat_expr::{Node, ValueType, expr};
//!
//! let t = Node::input("time", ValueType::Float);
//! let pos = Node::input("pos", ValueType::Vec3);
//! let node = expr!("sin( {} * 2 ) + {}.y", t, pos).unwrap();
//! assert_eq!(node.to_string(), "add(sin(mul(time, 2)), pos.y)");
//! ```
#![forbid(unsafe_code)]

mod compiler;
mod expression;
mod foundation;

pub mod graph;
pub mod node;

pub use crate::compiler::{Compiler, compile, expr};
pub use crate::expression::registry::{BinaryOp, Builtin, Constant};
pub use crate::expression::validate::{Rejection, check_node};
pub use crate::foundation::config::CompileOptions;
pub use crate::foundation::error::{ExprError, ExprResult};
pub use crate::graph::eval::{Bindings, EvalError, Value, evaluate};
pub use crate::graph::{Graph, Node, NodeKind};
pub use crate::node::{Arg, NodeLibrary, NodeShape, ValueType};

/// Compiles a `{}` template against the bundled [`Graph`] library.
///
/// Each argument is anything convertible into [`Arg<Node>`]: a [`Node`] or an
/// `f64`.
#[macro_export]
macro_rules! expr {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::expr($template, vec![$($crate::Arg::<$crate::Node>::from($arg)),*])
    };
}
