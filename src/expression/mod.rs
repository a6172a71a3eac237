pub(crate) mod lexer;
pub(crate) mod parser;
pub mod registry;
pub(crate) mod template;
pub mod validate;
