//! Static operator, function and constant tables.
//!
//! Tables are plain `static` slices: built at compile time, read-only, and
//! shared freely across threads. Lookups return `None` for unknown names;
//! the tokenizer turns that into [`ExprError::InvalidToken`](crate::ExprError).

use crate::node::{NodeLibrary, ValueType};

/// Argument separator inside a call. Never binds as an infix operator.
pub const PREC_COMMA: u8 = 0;
pub const PREC_ADDITIVE: u8 = 1;
pub const PREC_MULTIPLICATIVE: u8 = 2;
/// Component access binds tighter than every infix operator.
pub const PREC_PROPERTY: u8 = 3;
/// Calls are paren-delimited and never compared against a floor.
pub const PREC_CALL: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }

    /// Name of the node primitive this operator lowers to.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => PREC_ADDITIVE,
            Self::Mul | Self::Div | Self::Mod => PREC_MULTIPLICATIVE,
        }
    }

    pub(crate) fn compile<L: NodeLibrary>(self, lib: &L, lhs: L::Node, rhs: L::Node) -> L::Node {
        tracing::trace!(op = self.symbol(), "apply operator");
        lib.binary(self, lhs, rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Mix,
    Max,
    Min,
    Sin,
    Cos,
    Fract,
    Sqrt,
    Step,
    Pow,
}

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Self::Mix => "mix",
            Self::Max => "max",
            Self::Min => "min",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Fract => "fract",
            Self::Sqrt => "sqrt",
            Self::Step => "step",
            Self::Pow => "pow",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Self::Sin | Self::Cos | Self::Fract | Self::Sqrt => 1,
            Self::Max | Self::Min | Self::Step | Self::Pow => 2,
            Self::Mix => 3,
        }
    }

    /// `args.len()` must equal [`Builtin::arity`]; the parser checks this.
    pub(crate) fn compile<L: NodeLibrary>(self, lib: &L, args: &[L::Node]) -> L::Node {
        debug_assert_eq!(args.len(), self.arity());
        tracing::trace!(func = self.name(), "apply function");
        lib.call(self, args)
    }
}

/// Zero-argument named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
}

impl Constant {
    pub fn name(self) -> &'static str {
        match self {
            Self::Pi => "PI",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
        }
    }

    pub(crate) fn compile<L: NodeLibrary>(self, lib: &L) -> L::Node {
        lib.literal(self.name(), ValueType::Float)
    }
}

static OPERATORS: &[(&str, BinaryOp)] = &[
    ("+", BinaryOp::Add),
    ("-", BinaryOp::Sub),
    ("*", BinaryOp::Mul),
    ("/", BinaryOp::Div),
    ("%", BinaryOp::Mod),
];

static FUNCTIONS: &[(&str, Builtin)] = &[
    ("mix", Builtin::Mix),
    ("max", Builtin::Max),
    ("min", Builtin::Min),
    ("sin", Builtin::Sin),
    ("cos", Builtin::Cos),
    ("fract", Builtin::Fract),
    ("sqrt", Builtin::Sqrt),
    ("step", Builtin::Step),
    ("pow", Builtin::Pow),
];

static CONSTANTS: &[(&str, Constant)] = &[("PI", Constant::Pi)];

pub fn operator(symbol: &str) -> Option<BinaryOp> {
    lookup(OPERATORS, symbol)
}

pub fn function(name: &str) -> Option<Builtin> {
    lookup(FUNCTIONS, name)
}

pub fn constant(name: &str) -> Option<Constant> {
    lookup(CONSTANTS, name)
}

fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
