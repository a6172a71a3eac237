use crate::foundation::error::{ExprError, ExprResult};
use crate::node::{Arg, NodeLibrary, NodeShape, ValueType};

/// Why a value failed the node-shape contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Neither a consistent type tag nor output channels.
    Shapeless,
    /// Composite exposing zero output channels.
    NoOutputs,
}

impl Rejection {
    pub fn reason(self) -> &'static str {
        match self {
            Self::Shapeless => "value exposes neither a typed payload nor output channels",
            Self::NoOutputs => "composite exposes no output channels",
        }
    }
}

/// Checks `node` against the closed set of accepted shapes.
pub fn check_node<L: NodeLibrary>(lib: &L, node: &L::Node) -> Result<NodeShape, Rejection> {
    match lib.shape(node) {
        None => Err(Rejection::Shapeless),
        Some(NodeShape::Composite { outputs }) if outputs.is_empty() => Err(Rejection::NoOutputs),
        Some(shape) => Ok(shape),
    }
}

/// Wraps numbers into `float` constants and validates everything, failing on
/// the first non-conforming argument.
pub(crate) fn validate_args<L: NodeLibrary>(
    lib: &L,
    args: Vec<Arg<L::Node>>,
) -> ExprResult<Vec<L::Node>> {
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            let node = match arg {
                Arg::Number(v) => lib.constant(ValueType::Float, v),
                Arg::Node(n) => n,
            };
            check_node(lib, &node)
                .map_err(|r| ExprError::invalid_value(index, r.reason()))?;
            Ok(node)
        })
        .collect()
}
