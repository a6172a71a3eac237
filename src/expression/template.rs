//! Reassembles literal segments and interpolated values into one
//! placeholder-annotated string.
//!
//! Argument `i` is written as `${i}`. The marker is glued to the text that
//! follows it so `${2}.y` keeps its field, and preceded by a space so it
//! never fuses with a preceding lexeme. The closing brace keeps a digit
//! typed right after the hole out of the index.

use crate::foundation::error::{ExprError, ExprResult};

pub(crate) const PLACEHOLDER_SIGIL: char = '$';
pub(crate) const INDEX_OPEN: char = '{';
pub(crate) const INDEX_CLOSE: char = '}';

/// Hole marker accepted by [`split_template`].
pub(crate) const HOLE: &str = "{}";

pub(crate) fn assemble<S: AsRef<str>>(segments: &[S], args: usize) -> ExprResult<String> {
    if segments.is_empty() && args == 0 {
        return Ok(String::new());
    }
    if segments.len() != args + 1 {
        return Err(ExprError::TemplateMismatch {
            segments: segments.len(),
            args,
        });
    }

    let mut out = String::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            out.push(' ');
            out.push(PLACEHOLDER_SIGIL);
            out.push(INDEX_OPEN);
            out.push_str(&(i - 1).to_string());
            out.push(INDEX_CLOSE);
        }
        out.push_str(seg.as_ref());
    }
    Ok(out)
}

/// Splits `"{} + {}.x"` into `["", " + ", ".x"]`.
pub(crate) fn split_template(template: &str) -> Vec<&str> {
    template.split(HOLE).collect()
}
