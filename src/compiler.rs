use crate::expression::lexer::tokenize;
use crate::expression::parser::Parser;
use crate::expression::template::{assemble, split_template};
use crate::expression::validate::validate_args;
use crate::foundation::config::CompileOptions;
use crate::foundation::error::ExprResult;
use crate::graph::{Graph, Node};
use crate::node::{Arg, NodeLibrary};

/// Compiles expressions onto one [`NodeLibrary`].
///
/// A compiler holds no per-call state; one instance can serve any number of
/// calls, from any number of threads when `L: Sync`.
#[derive(Debug, Clone)]
pub struct Compiler<L> {
    lib: L,
    options: CompileOptions,
}

impl<L: NodeLibrary> Compiler<L> {
    pub fn new(lib: L) -> Self {
        Self {
            lib,
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn library(&self) -> &L {
        &self.lib
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compiles literal `segments` interleaved with `args`
    /// (`segments.len() == args.len() + 1`) into a single node.
    ///
    /// Numbers are wrapped into `float` constants, every argument is
    /// validated up front, and the first failure aborts the call.
    #[tracing::instrument(skip_all, fields(segments = segments.len(), args = args.len()))]
    pub fn compile<S: AsRef<str>>(
        &self,
        segments: &[S],
        args: Vec<Arg<L::Node>>,
    ) -> ExprResult<L::Node> {
        self.options.validate()?;

        let values = validate_args(&self.lib, args)?;
        let src = assemble(segments, values.len())?;
        tracing::debug!(src = %src, "assembled expression");

        let tokens = tokenize(&src)?;
        tracing::debug!(tokens = tokens.len(), "tokenized expression");

        Parser::new(&self.lib, tokens, &values, self.options.max_depth).parse()
    }

    /// Like [`Compiler::compile`], with each `{}` in `template` marking where
    /// the next argument goes: `"{} * 2 + {}.x"`.
    #[tracing::instrument(skip(self, args))]
    pub fn compile_template(
        &self,
        template: &str,
        args: Vec<Arg<L::Node>>,
    ) -> ExprResult<L::Node> {
        self.compile(&split_template(template), args)
    }
}

impl Default for Compiler<Graph> {
    fn default() -> Self {
        Self::new(Graph)
    }
}

/// Compiles onto the bundled [`Graph`] library with default options.
pub fn compile<S: AsRef<str>>(segments: &[S], args: Vec<Arg<Node>>) -> ExprResult<Node> {
    Compiler::new(Graph).compile(segments, args)
}

/// Shorthand for [`compile`] taking a `{}` template; see also [`expr!`](crate::expr!).
pub fn expr(template: &str, args: Vec<Arg<Node>>) -> ExprResult<Node> {
    Compiler::new(Graph).compile_template(template, args)
}
