/// Convenience result type used across the compiler.
pub type ExprResult<T> = Result<T, ExprError>;

/// Every way a compile call can fail. No partial node is ever returned.
#[derive(thiserror::Error, Debug)]
pub enum ExprError {
    /// Text fragment the tokenizer does not recognize (includes unknown
    /// function names and operator symbols).
    #[error("invalid token '{lexeme}'")]
    InvalidToken { lexeme: String },

    /// A token that cannot start an expression, or that was left over.
    #[error("unexpected token: found {found}")]
    UnexpectedToken { found: String },

    /// An opening `(` without a matching `)`.
    #[error("unclosed parenthesis: expected ')', found {found}")]
    UnclosedParenthesis { found: String },

    #[error("invalid interpolated value at argument {index}: {reason}")]
    InvalidInterpolatedValue { index: usize, reason: String },

    #[error("invalid property access '.{property}': {reason}")]
    InvalidPropertyAccess { property: String, reason: String },

    #[error("arity error: '{function}' expects {expected} argument(s), got {found}")]
    Arity {
        function: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("nesting error: expression nests deeper than {limit}")]
    NestingTooDeep { limit: usize },

    /// Literal segments and interpolated values do not interleave.
    #[error("template error: {segments} literal segment(s) for {args} interpolated value(s)")]
    TemplateMismatch { segments: usize, args: usize },

    #[error("configuration error: {0}")]
    Config(String),

    /// Wrapped lower-level error from IO or serde.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExprError {
    pub fn invalid_token(lexeme: impl Into<String>) -> Self {
        Self::InvalidToken {
            lexeme: lexeme.into(),
        }
    }

    pub fn unexpected(found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            found: found.into(),
        }
    }

    pub fn unclosed(found: impl Into<String>) -> Self {
        Self::UnclosedParenthesis {
            found: found.into(),
        }
    }

    pub fn invalid_value(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidInterpolatedValue {
            index,
            reason: reason.into(),
        }
    }

    pub fn invalid_property(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPropertyAccess {
            property: property.into(),
            reason: reason.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
