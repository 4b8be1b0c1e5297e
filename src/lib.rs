/// The lexer takes the source input, mapping it into a sequence of tokens.
pub mod lexer;

/// The parser takes a sequence of tokens, mapping it into a typed AST. Names
/// are resolved and types are checked while each node is built.
pub mod parser;

/// The code generator lowers a typed AST to C, against the accelerator
/// elements runtime.
pub mod codegen;

/// Runs the whole pipeline over a source file.
pub mod driver;

pub mod ast;
pub mod builtins;
pub mod error;
pub mod eval;
pub mod source;
pub mod symbols;
pub mod token;
pub mod types;

pub mod util {
    pub mod fmt;
    pub mod intern;
    #[cfg(test)]
    pub(crate) mod test_utils;
}

pub use driver::compile;
