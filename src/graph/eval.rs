//! Numeric evaluation of [`Node`] graphs on the CPU.
//!
//! Lanes follow shader semantics: operations apply per lane, scalars
//! broadcast, and `%` is floored (`x - y * floor(x / y)`).

use std::collections::BTreeMap;

use crate::expression::registry::{self, BinaryOp, Builtin};
use crate::graph::{Node, NodeKind};
use crate::node::ValueType;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("unbound input '{0}'")]
    Unbound(String),

    #[error("binding '{name}' has {found} lane(s), expected {expected}")]
    Binding {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown literal '{0}'")]
    UnknownLiteral(String),

    #[error("composite '{0}' has no single value; read one of its outputs")]
    Composite(String),

    #[error("lane mismatch: cannot combine {0} and {1} lanes")]
    LaneMismatch(usize, usize),

    #[error("node carries {0} lane(s)")]
    Malformed(usize),

    #[error("{function} takes {expected} argument(s), node has {found}")]
    Arity {
        function: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Evaluated leaf.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Value {
    pub ty: ValueType,
    pub lanes: Vec<f64>,
}

impl Value {
    pub fn scalar(&self) -> Option<f64> {
        match self.lanes.as_slice() {
            [v] => Some(*v),
            _ => None,
        }
    }
}

/// Values for [`NodeKind::Input`] nodes, keyed by input name, and for
/// composite outputs, keyed `composite.channel`.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: BTreeMap<String, Vec<f64>>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, name: impl Into<String>, lanes: impl Into<Vec<f64>>) -> Self {
        self.insert(name, lanes);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, lanes: impl Into<Vec<f64>>) {
        self.values.insert(name.into(), lanes.into());
    }

    fn lookup(&self, name: &str, ty: ValueType) -> Result<Vec<f64>, EvalError> {
        let lanes = self
            .values
            .get(name)
            .ok_or_else(|| EvalError::Unbound(name.to_owned()))?;
        if lanes.len() != ty.dims() {
            return Err(EvalError::Binding {
                name: name.to_owned(),
                expected: ty.dims(),
                found: lanes.len(),
            });
        }
        Ok(lanes.clone())
    }
}

#[tracing::instrument(skip_all, fields(node = %node))]
pub fn evaluate(node: &Node, bindings: &Bindings) -> Result<Value, EvalError> {
    let lanes = eval_lanes(node, bindings)?;
    let ty = ValueType::from_dims(lanes.len()).ok_or(EvalError::Malformed(lanes.len()))?;
    Ok(Value { ty, lanes })
}

fn eval_lanes(node: &Node, bindings: &Bindings) -> Result<Vec<f64>, EvalError> {
    match node.kind() {
        NodeKind::Const { value, .. } => Ok(value.clone()),
        NodeKind::Literal { name, .. } => registry::constant(name)
            .map(|c| vec![c.value()])
            .ok_or_else(|| EvalError::UnknownLiteral(name.clone())),
        NodeKind::Input { name, ty } => bindings.lookup(name, *ty),
        NodeKind::Composite { name, .. } => Err(EvalError::Composite(name.clone())),
        NodeKind::Output {
            source,
            channel,
            ty,
        } => match source.kind() {
            NodeKind::Composite { name, .. } => {
                bindings.lookup(&format!("{name}.{channel}"), *ty)
            }
            _ => Err(EvalError::Unbound(format!("{source}.{channel}"))),
        },
        NodeKind::Component { source, index } => {
            let lanes = eval_lanes(source, bindings)?;
            lanes
                .get(*index)
                .map(|v| vec![*v])
                .ok_or(EvalError::LaneMismatch(lanes.len(), index + 1))
        }
        NodeKind::Binary { op, lhs, rhs, .. } => {
            let args = [eval_lanes(lhs, bindings)?, eval_lanes(rhs, bindings)?];
            lanewise(&args, |x| apply_binary(*op, x[0], x[1]))
        }
        NodeKind::Call { func, args, .. } => {
            if args.len() != func.arity() {
                return Err(EvalError::Arity {
                    function: func.name(),
                    expected: func.arity(),
                    found: args.len(),
                });
            }
            let args = args
                .iter()
                .map(|a| eval_lanes(a, bindings))
                .collect::<Result<Vec<_>, _>>()?;
            lanewise(&args, |x| apply_builtin(*func, x))
        }
    }
}

fn lanewise(args: &[Vec<f64>], f: impl Fn(&[f64]) -> f64) -> Result<Vec<f64>, EvalError> {
    let width = args.iter().map(Vec::len).max().unwrap_or(1);
    for a in args {
        if a.len() != 1 && a.len() != width {
            return Err(EvalError::LaneMismatch(a.len(), width));
        }
    }

    let mut out = Vec::with_capacity(width);
    let mut lane = Vec::with_capacity(args.len());
    for i in 0..width {
        lane.clear();
        lane.extend(args.iter().map(|a| if a.len() == 1 { a[0] } else { a[i] }));
        out.push(f(&lane));
    }
    Ok(out)
}

fn apply_binary(op: BinaryOp, a: f64, b: f64) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a - b * (a / b).floor(),
    }
}

fn apply_builtin(func: Builtin, x: &[f64]) -> f64 {
    match func {
        Builtin::Sin => x[0].sin(),
        Builtin::Cos => x[0].cos(),
        Builtin::Fract => x[0] - x[0].floor(),
        Builtin::Sqrt => x[0].sqrt(),
        Builtin::Max => x[0].max(x[1]),
        Builtin::Min => x[0].min(x[1]),
        Builtin::Step => {
            if x[1] < x[0] {
                0.0
            } else {
                1.0
            }
        }
        Builtin::Pow => x[0].powf(x[1]),
        Builtin::Mix => x[0] * (1.0 - x[2]) + x[1] * x[2],
    }
}
