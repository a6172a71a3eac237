//! Bundled reference node library.
//!
//! Nodes form an immutable DAG behind `Arc`, so cloning is cheap and sharing
//! across threads is free. `Display` renders the call form used throughout
//! the tests (`add(2, mul(3, 4))`); structural equality compares whole
//! subgraphs.

pub mod eval;

use std::fmt;
use std::sync::Arc;

use crate::expression::registry::{BinaryOp, Builtin};
use crate::node::{Arg, NodeLibrary, NodeShape, ValueType};

#[derive(Clone, PartialEq)]
pub struct Node(Arc<NodeKind>);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Typed constant; `value` holds one entry per lane.
    Const { ty: ValueType, value: Vec<f64> },
    /// Named literal such as `PI`.
    Literal { name: String, ty: ValueType },
    /// Runtime value bound at evaluation time (uniform, attribute).
    Input { name: String, ty: ValueType },
    /// Multi-output node; each channel is read through [`NodeKind::Output`].
    Composite {
        name: String,
        outputs: Vec<(String, ValueType)>,
    },
    Output {
        source: Node,
        channel: String,
        ty: ValueType,
    },
    /// Single lane of a vector leaf.
    Component { source: Node, index: usize },
    Binary {
        op: BinaryOp,
        ty: ValueType,
        lhs: Node,
        rhs: Node,
    },
    Call {
        func: Builtin,
        ty: ValueType,
        args: Vec<Node>,
    },
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self(Arc::new(kind))
    }

    /// Constant with an explicit payload. The payload is not checked here;
    /// [`check_node`](crate::check_node) rejects lane-count mismatches.
    pub fn constant(ty: ValueType, value: impl Into<Vec<f64>>) -> Self {
        Self::new(NodeKind::Const {
            ty,
            value: value.into(),
        })
    }

    pub fn float(v: f64) -> Self {
        Self::constant(ValueType::Float, vec![v])
    }

    pub fn vec2(v: [f64; 2]) -> Self {
        Self::constant(ValueType::Vec2, v)
    }

    pub fn vec3(v: [f64; 3]) -> Self {
        Self::constant(ValueType::Vec3, v)
    }

    pub fn vec4(v: [f64; 4]) -> Self {
        Self::constant(ValueType::Vec4, v)
    }

    pub fn input(name: impl Into<String>, ty: ValueType) -> Self {
        Self::new(NodeKind::Input {
            name: name.into(),
            ty,
        })
    }

    pub fn composite<S: Into<String>>(
        name: impl Into<String>,
        outputs: impl IntoIterator<Item = (S, ValueType)>,
    ) -> Self {
        Self::new(NodeKind::Composite {
            name: name.into(),
            outputs: outputs
                .into_iter()
                .map(|(channel, ty)| (channel.into(), ty))
                .collect(),
        })
    }

    pub fn kind(&self) -> &NodeKind {
        &self.0
    }

    /// Declared type, or `None` for composites.
    pub fn ty(&self) -> Option<ValueType> {
        match self.kind() {
            NodeKind::Const { ty, .. }
            | NodeKind::Literal { ty, .. }
            | NodeKind::Input { ty, .. }
            | NodeKind::Output { ty, .. }
            | NodeKind::Binary { ty, .. }
            | NodeKind::Call { ty, .. } => Some(*ty),
            NodeKind::Component { .. } => Some(ValueType::Float),
            NodeKind::Composite { .. } => None,
        }
    }

    /// True when both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({self})")
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            NodeKind::Const {
                ty: ValueType::Float,
                value,
            } if value.len() == 1 => write!(f, "{}", value[0]),
            NodeKind::Const { ty, value } => {
                write!(f, "{ty}(")?;
                write_list(f, value)?;
                f.write_str(")")
            }
            NodeKind::Literal { name, .. }
            | NodeKind::Input { name, .. }
            | NodeKind::Composite { name, .. } => f.write_str(name),
            NodeKind::Output {
                source, channel, ..
            } => write!(f, "{source}.{channel}"),
            NodeKind::Component { source, index } => {
                let lane = ["x", "y", "z", "w"].get(*index).copied().unwrap_or("?");
                write!(f, "{source}.{lane}")
            }
            NodeKind::Binary { op, lhs, rhs, .. } => write!(f, "{}({lhs}, {rhs})", op.name()),
            NodeKind::Call { func, args, .. } => {
                write!(f, "{}(", func.name())?;
                write_list(f, args)?;
                f.write_str(")")
            }
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl From<Node> for Arg<Node> {
    fn from(n: Node) -> Self {
        Arg::Node(n)
    }
}

impl From<f64> for Arg<Node> {
    fn from(v: f64) -> Self {
        Arg::Number(v)
    }
}

/// The [`NodeLibrary`] over [`Node`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Graph;

impl NodeLibrary for Graph {
    type Node = Node;

    fn constant(&self, ty: ValueType, value: f64) -> Node {
        Node::constant(ty, vec![value; ty.dims()])
    }

    fn literal(&self, name: &str, ty: ValueType) -> Node {
        Node::new(NodeKind::Literal {
            name: name.to_owned(),
            ty,
        })
    }

    fn binary(&self, op: BinaryOp, lhs: Node, rhs: Node) -> Node {
        let ty = widest([&lhs, &rhs]);
        Node::new(NodeKind::Binary { op, ty, lhs, rhs })
    }

    fn call(&self, func: Builtin, args: &[Node]) -> Node {
        // step(edge, x) takes the shape of x.
        let ty = match func {
            Builtin::Step => args
                .last()
                .and_then(Node::ty)
                .unwrap_or(ValueType::Float),
            _ => widest(args),
        };
        Node::new(NodeKind::Call {
            func,
            ty,
            args: args.to_vec(),
        })
    }

    fn component(&self, node: &Node, name: &str) -> Option<Node> {
        match node.kind() {
            NodeKind::Composite { outputs, .. } => outputs
                .iter()
                .find(|(channel, _)| channel == name)
                .map(|(channel, ty)| {
                    Node::new(NodeKind::Output {
                        source: node.clone(),
                        channel: channel.clone(),
                        ty: *ty,
                    })
                }),
            _ => {
                let index = node.ty()?.component_index(name)?;
                Some(Node::new(NodeKind::Component {
                    source: node.clone(),
                    index,
                }))
            }
        }
    }

    fn shape(&self, node: &Node) -> Option<NodeShape> {
        match node.kind() {
            NodeKind::Composite { outputs, .. } => Some(NodeShape::Composite {
                outputs: outputs.iter().map(|(c, _)| c.clone()).collect(),
            }),
            NodeKind::Const { ty, value } if value.len() != ty.dims() => None,
            _ => node.ty().map(|ty| NodeShape::Leaf { ty }),
        }
    }
}

/// Result type of a lane-wise operation: scalars broadcast to the widest operand.
fn widest<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> ValueType {
    nodes
        .into_iter()
        .filter_map(Node::ty)
        .max_by_key(|ty| ty.dims())
        .unwrap_or(ValueType::Float)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_fill_every_lane() {
        assert_eq!(Graph.constant(ValueType::Vec3, 0.5), Node::vec3([0.5; 3]));
        assert_eq!(Graph.constant(ValueType::Float, 2.0).to_string(), "2");
    }

    #[test]
    fn binary_result_broadcasts_to_widest() {
        let v = Node::input("v", ValueType::Vec3);
        let n = Graph.binary(BinaryOp::Mul, Node::float(2.0), v);
        assert_eq!(n.ty(), Some(ValueType::Vec3));
        assert_eq!(n.to_string(), "mul(2, v)");
    }

    #[test]
    fn step_takes_the_shape_of_x() {
        let x = Node::input("x", ValueType::Vec2);
        let n = Graph.call(Builtin::Step, &[Node::float(0.5), x]);
        assert_eq!(n.ty(), Some(ValueType::Vec2));
    }

    #[test]
    fn components_come_from_vectors_and_composites() {
        let v = Node::vec4([1.0, 2.0, 3.0, 4.0]);
        let a = Graph.component(&v, "a").unwrap();
        assert_eq!(a.ty(), Some(ValueType::Float));
        assert_eq!(a.to_string(), "vec4(1, 2, 3, 4).w");
        assert!(Graph.component(&v, "q").is_none());

        let splat = Node::composite("splat", [("rgba", ValueType::Vec4)]);
        let rgba = Graph.component(&splat, "rgba").unwrap();
        assert_eq!(rgba.ty(), Some(ValueType::Vec4));
        assert!(Graph.component(&splat, "center").is_none());
        assert!(Graph.component(&Node::float(1.0), "x").is_none());
    }

    #[test]
    fn shape_reports_leaf_or_composite() {
        assert_eq!(
            Graph.shape(&Node::float(1.0)),
            Some(NodeShape::Leaf {
                ty: ValueType::Float
            })
        );
        assert_eq!(
            Graph.shape(&Node::composite("s", [("a", ValueType::Float)])),
            Some(NodeShape::Composite {
                outputs: vec!["a".to_owned()]
            })
        );
        assert_eq!(
            Graph.shape(&Node::constant(ValueType::Vec2, vec![1.0])),
            None
        );
    }
}
