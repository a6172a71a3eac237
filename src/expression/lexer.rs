use crate::expression::registry::{
    self, BinaryOp, Builtin, Constant, PREC_CALL, PREC_COMMA, PREC_PROPERTY,
};
use crate::expression::template::{INDEX_CLOSE, INDEX_OPEN, PLACEHOLDER_SIGIL};
use crate::foundation::error::{ExprError, ExprResult};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    /// Source text as written; the placeholder marker for values.
    pub(crate) text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Operator(BinaryOp),
    Comma,
    Function(Builtin),
    Constant(Constant),
    LParen,
    RParen,
    /// Placeholder for the interpolated value at this index.
    Value(usize),
    Property(String),
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub(crate) fn precedence(&self) -> u8 {
        match &self.kind {
            TokenKind::Operator(op) => op.precedence(),
            TokenKind::Property(_) => PREC_PROPERTY,
            TokenKind::Function(_) => PREC_CALL,
            _ => PREC_COMMA,
        }
    }
}

/// Splits placeholder-annotated text into tokens.
///
/// Parentheses and commas are standalone; every other lexeme must be
/// whitespace-separated (`2 * $0`, not `2*$0`).
pub(crate) fn tokenize(src: &str) -> ExprResult<Vec<Token>> {
    let mut spaced = String::with_capacity(src.len() + 8);
    for c in src.chars() {
        if matches!(c, '(' | ')' | ',') {
            spaced.push(' ');
            spaced.push(c);
            spaced.push(' ');
        } else {
            spaced.push(c);
        }
    }

    let mut out = Vec::new();
    for word in spaced.split_whitespace() {
        lex_word(word, &mut out)?;
    }
    Ok(out)
}

fn lex_word(word: &str, out: &mut Vec<Token>) -> ExprResult<()> {
    let kind = match word {
        "(" => TokenKind::LParen,
        ")" => TokenKind::RParen,
        "," => TokenKind::Comma,
        _ if word.starts_with(PLACEHOLDER_SIGIL) => return lex_placeholder(word, out),
        _ => {
            if let Some(op) = registry::operator(word) {
                TokenKind::Operator(op)
            } else if let Some(c) = registry::constant(word) {
                TokenKind::Constant(c)
            } else if let Some(f) = registry::function(word) {
                TokenKind::Function(f)
            } else if let Some(v) = parse_number(word) {
                TokenKind::Number(v)
            } else {
                return Err(ExprError::invalid_token(word));
            }
        }
    };
    out.push(Token::new(kind, word));
    Ok(())
}

/// `${N}` or `$N`, alone or followed by `.field.field...`, split into a
/// value and property tokens.
///
/// Anything else glued to the marker is an invalid token, and so is a
/// bare `$N` index with a leading zero.
fn lex_placeholder(word: &str, out: &mut Vec<Token>) -> ExprResult<()> {
    let body = &word[PLACEHOLDER_SIGIL.len_utf8()..];
    let (digits, rest) = match body.strip_prefix(INDEX_OPEN) {
        Some(braced) => {
            let close = braced
                .find(INDEX_CLOSE)
                .ok_or_else(|| ExprError::invalid_token(word))?;
            (&braced[..close], &braced[close + INDEX_CLOSE.len_utf8()..])
        }
        None => {
            let end = body
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(body.len());
            let digits = &body[..end];
            if digits.len() > 1 && digits.starts_with('0') {
                return Err(ExprError::invalid_token(word));
            }
            (digits, &body[end..])
        }
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExprError::invalid_token(word));
    }
    let index: usize = digits
        .parse()
        .map_err(|_| ExprError::invalid_token(word))?;

    let marker = &word[..word.len() - rest.len()];
    let mut tokens = vec![Token::new(TokenKind::Value(index), marker)];
    if !rest.is_empty() {
        let fields = rest
            .strip_prefix('.')
            .ok_or_else(|| ExprError::invalid_token(word))?;
        for field in fields.split('.') {
            if !is_ident(field) {
                return Err(ExprError::invalid_token(word));
            }
            tokens.push(Token::new(
                TokenKind::Property(field.to_owned()),
                format!(".{field}"),
            ));
        }
    }
    out.extend(tokens);
    Ok(())
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Decimal literal with optional sign, fraction and exponent. Rejects the
/// `inf`/`nan` spellings `f64::from_str` would otherwise accept.
fn parse_number(s: &str) -> Option<f64> {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let first = unsigned.chars().next()?;
    if !(first.is_ascii_digit() || first == '.') {
        return None;
    }
    if !unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    s.parse().ok()
}
