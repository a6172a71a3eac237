//! Precedence-climbing parser fused with lowering: every reduction calls
//! straight into the [`NodeLibrary`], so no AST is ever built.

use crate::expression::lexer::{Token, TokenKind};
use crate::expression::registry::{Builtin, PREC_COMMA};
use crate::expression::validate::check_node;
use crate::foundation::error::{ExprError, ExprResult};
use crate::node::{NodeLibrary, ValueType};

/// Calls never collect more than this many arguments; a further comma is
/// left for the closing-paren check to reject.
const MAX_CALL_ARGS: usize = 3;

pub(crate) struct Parser<'a, L: NodeLibrary> {
    lib: &'a L,
    tokens: Vec<Token>,
    values: &'a [L::Node],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a, L: NodeLibrary> Parser<'a, L> {
    pub(crate) fn new(
        lib: &'a L,
        tokens: Vec<Token>,
        values: &'a [L::Node],
        max_depth: usize,
    ) -> Self {
        Self {
            lib,
            tokens,
            values,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    /// Parses the whole stream into one node.
    ///
    /// An empty stream is the zero constant. Tokens left over after the
    /// top-level expression are an error.
    pub(crate) fn parse(mut self) -> ExprResult<L::Node> {
        if self.tokens.is_empty() {
            return Ok(self.lib.constant(ValueType::Float, 0.0));
        }
        let node = self.nested(|p| p.parse_expression(PREC_COMMA))?;
        if let Some(tok) = self.peek() {
            return Err(ExprError::unexpected(describe(Some(tok))));
        }
        Ok(node)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.peek().is_some_and(|t| t.kind == *kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_close(&mut self) -> ExprResult<()> {
        if self.consume(&TokenKind::RParen) {
            Ok(())
        } else {
            Err(ExprError::unclosed(describe(self.peek())))
        }
    }

    /// Runs `f` one nesting level deeper. The top-level expression, each
    /// parenthesised group and each call's argument list are one level;
    /// infix operands are not.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ExprResult<T>) -> ExprResult<T> {
        self.depth += 1;
        let result = if self.depth > self.max_depth {
            Err(ExprError::NestingTooDeep {
                limit: self.max_depth,
            })
        } else {
            f(self)
        };
        self.depth -= 1;
        result
    }

    pub(crate) fn parse_expression(&mut self, min_prec: u8) -> ExprResult<L::Node> {
        let tok = self
            .bump()
            .ok_or_else(|| ExprError::unexpected(describe(None)))?;
        let mut lhs = self.parse_prefix(tok)?;

        loop {
            let Some(next) = self.peek() else {
                break;
            };
            match &next.kind {
                // Component access is never gated by `min_prec`.
                TokenKind::Property(name) => {
                    let name = name.clone();
                    self.pos += 1;
                    lhs = self.access(lhs, &name)?;
                }
                TokenKind::Operator(op) if next.precedence() > min_prec => {
                    let op = *op;
                    self.pos += 1;
                    let rhs = self.parse_expression(op.precedence())?;
                    lhs = op.compile(self.lib, lhs, rhs);
                }
                _ => break,
            }
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self, tok: Token) -> ExprResult<L::Node> {
        match tok.kind {
            TokenKind::Number(v) => Ok(self.lib.constant(ValueType::Float, v)),
            TokenKind::Value(index) => self.resolve(index),
            TokenKind::Function(func) => self.parse_call(func),
            TokenKind::Constant(c) => Ok(c.compile(self.lib)),
            TokenKind::LParen => self.nested(|p| {
                let inner = p.parse_expression(PREC_COMMA)?;
                p.expect_close()?;
                Ok(inner)
            }),
            TokenKind::Operator(_)
            | TokenKind::Comma
            | TokenKind::RParen
            | TokenKind::Property(_) => Err(ExprError::unexpected(describe(Some(&tok)))),
        }
    }

    fn parse_call(&mut self, func: Builtin) -> ExprResult<L::Node> {
        if !self.consume(&TokenKind::LParen) {
            return Err(ExprError::unexpected(format!(
                "{} after '{}' (expected '(')",
                describe(self.peek()),
                func.name()
            )));
        }

        let args = self.nested(|p| {
            let mut args = Vec::with_capacity(MAX_CALL_ARGS);
            args.push(p.parse_expression(PREC_COMMA)?);
            while args.len() < MAX_CALL_ARGS && p.consume(&TokenKind::Comma) {
                args.push(p.parse_expression(PREC_COMMA)?);
            }
            p.expect_close()?;
            Ok(args)
        })?;

        if args.len() != func.arity() {
            return Err(ExprError::Arity {
                function: func.name(),
                expected: func.arity(),
                found: args.len(),
            });
        }
        Ok(func.compile(self.lib, &args))
    }

    fn resolve(&self, index: usize) -> ExprResult<L::Node> {
        let node = self.values.get(index).ok_or_else(|| {
            ExprError::invalid_value(index, "no interpolated argument at this position")
        })?;
        check_node(self.lib, node).map_err(|r| ExprError::invalid_value(index, r.reason()))?;
        Ok(node.clone())
    }

    fn access(&self, node: L::Node, property: &str) -> ExprResult<L::Node> {
        check_node(self.lib, &node)
            .map_err(|r| ExprError::invalid_property(property, r.reason()))?;
        self.lib.component(&node, property).ok_or_else(|| {
            ExprError::invalid_property(property, "no such component or output channel")
        })
    }
}

fn describe(tok: Option<&Token>) -> String {
    match tok {
        Some(t) => format!("'{}'", t.text),
        None => "end of input".to_owned(),
    }
}
