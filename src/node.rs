//! The contract between the expression compiler and a dataflow node library.
//!
//! The compiler never inspects node internals. It builds leaves, applies
//! primitives, extracts components and asks for a node's structural shape,
//! all through [`NodeLibrary`]. The bundled [`Graph`](crate::graph::Graph)
//! is one implementation; shader back ends provide their own.

use std::fmt;

use crate::expression::registry::{BinaryOp, Builtin};

/// Declared type tag of a leaf node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl ValueType {
    pub fn dims(self) -> usize {
        match self {
            Self::Float => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
        }
    }

    pub fn from_dims(dims: usize) -> Option<Self> {
        match dims {
            1 => Some(Self::Float),
            2 => Some(Self::Vec2),
            3 => Some(Self::Vec3),
            4 => Some(Self::Vec4),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "float" => Some(Self::Float),
            "vec2" => Some(Self::Vec2),
            "vec3" => Some(Self::Vec3),
            "vec4" => Some(Self::Vec4),
            _ => None,
        }
    }

    /// Lane index of a swizzle name (`x y z w` or `r g b a`) within this type.
    pub fn component_index(self, name: &str) -> Option<usize> {
        let idx = match name {
            "x" | "r" => 0,
            "y" | "g" => 1,
            "z" | "b" => 2,
            "w" | "a" => 3,
            _ => return None,
        };
        (self != Self::Float && idx < self.dims()).then_some(idx)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structural shape a node exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeShape {
    /// Single typed value.
    Leaf { ty: ValueType },
    /// Multiple named output channels.
    Composite { outputs: Vec<String> },
}

/// One interpolated value as handed to the compiler.
///
/// Plain numbers are wrapped into `float` constants before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg<N> {
    Number(f64),
    Node(N),
}

/// Primitives the compiler lowers expressions onto.
///
/// Implementations must be pure: every call returns a fresh node and never
/// mutates its inputs.
pub trait NodeLibrary {
    type Node: Clone + fmt::Debug;

    /// Typed constant with every lane set to `value`.
    fn constant(&self, ty: ValueType, value: f64) -> Self::Node;

    /// Named literal resolved by the back end (e.g. `PI`).
    fn literal(&self, name: &str, ty: ValueType) -> Self::Node;

    fn binary(&self, op: BinaryOp, lhs: Self::Node, rhs: Self::Node) -> Self::Node;

    /// `args.len()` always equals `func.arity()`.
    fn call(&self, func: Builtin, args: &[Self::Node]) -> Self::Node;

    /// Named component or output channel, or `None` when absent.
    fn component(&self, node: &Self::Node, name: &str) -> Option<Self::Node>;

    /// `None` when the value exposes neither a type tag with a consistent
    /// payload nor output channels.
    fn shape(&self, node: &Self::Node) -> Option<NodeShape>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swizzles_respect_dimensions() {
        assert_eq!(ValueType::Vec2.component_index("y"), Some(1));
        assert_eq!(ValueType::Vec2.component_index("z"), None);
        assert_eq!(ValueType::Vec4.component_index("a"), Some(3));
        assert_eq!(ValueType::Float.component_index("x"), None);
        assert_eq!(ValueType::Vec3.component_index("q"), None);
    }

    #[test]
    fn type_names_parse_back() {
        for ty in [
            ValueType::Float,
            ValueType::Vec2,
            ValueType::Vec3,
            ValueType::Vec4,
        ] {
            assert_eq!(ValueType::parse(ty.name()), Some(ty));
            assert_eq!(ValueType::from_dims(ty.dims()), Some(ty));
        }
        assert_eq!(ValueType::parse("mat4"), None);
    }
}
