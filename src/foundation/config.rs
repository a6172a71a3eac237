use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ExprError, ExprResult};

/// Tunables for a [`Compiler`](crate::Compiler).
///
/// Loadable from JSON; unknown keys are rejected so typos surface early.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Maximum nesting: the top-level expression counts one level, and so
    /// does every parenthesised group and function call inside it.
    pub max_depth: usize,
}

impl CompileOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    pub fn from_json_str(s: &str) -> ExprResult<Self> {
        let opts: Self = serde_json::from_str(s).context("parse compile options JSON")?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_path(path: &Path) -> ExprResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read compile options '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> ExprResult<()> {
        if self.max_depth == 0 {
            return Err(ExprError::config("max_depth must be at least 1"));
        }
        Ok(())
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
