use crate::{ast::Program, error::Error, symbols::Env, token::Spanned};

pub mod c;
pub mod runtime;

#[cfg(test)]
mod tests;

/// Lowers a parsed program to a C translation unit for the standard runtime.
pub fn generate(program: &Program, env: &Env<'_>) -> Result<String, Spanned<Error>> {
    c::Generator::<runtime::AccRuntime>::new(env).generate(program)
}
