use tracing::{debug, info_span};

use crate::{
    builtins::Builtins,
    codegen,
    error::{CompileError, Error},
    lexer::{self, SUGGESTED_TOKENS_CAPACITY},
    parser,
    source::SourceFile,
    symbols::Env,
    token::{Spanned, Token},
    util::fmt::tree,
};

/// Compiles a lattice source file into a C translation unit.
///
/// Every compilation starts from a fresh environment, so the same input
/// always produces the same output or the same error.
pub fn compile(source: &SourceFile, builtins: &Builtins) -> Result<String, CompileError> {
    let _span = info_span!("compile", file = source.name()).entered();
    let mut env = Env::new(builtins);
    let tokens = &mut Vec::with_capacity(SUGGESTED_TOKENS_CAPACITY);

    let code = parser::parse_program(source.text(), tokens, &mut env)
        .and_then(|program| {
            debug!(
                statements = program.statements.len(),
                symbols = env.symbols.len(),
                "parsed"
            );
            codegen::generate(&program, &env)
        })
        .map_err(|error| report(source, &env, &error))?;
    Ok(code)
}

/// Parses the source file and prints its typed tree.
pub fn dump_ast(source: &SourceFile, builtins: &Builtins) -> Result<String, CompileError> {
    let mut env = Env::new(builtins);
    let tokens = &mut Vec::with_capacity(SUGGESTED_TOKENS_CAPACITY);
    match parser::parse_program(source.text(), tokens, &mut env) {
        Ok(program) => Ok(tree::print_program_string(&env.idents, &program)),
        Err(error) => Err(report(source, &env, &error)),
    }
}

/// Lexes the source file and prints one token per line, trivia included.
pub fn dump_tokens(source: &SourceFile) -> Result<String, CompileError> {
    let mut tokens: Vec<Token> = Vec::with_capacity(SUGGESTED_TOKENS_CAPACITY);
    if let Err(error) = lexer::lex(source.text(), &mut tokens) {
        // Lex errors never name an identifier.
        let builtins = Builtins::new(&[]);
        return Err(report(source, &Env::new(&builtins), &error));
    }
    let mut buf = Vec::with_capacity(tokens.len() * 32);
    tree::print_tokens(&mut buf, source.text(), &tokens).expect("writing to a Vec can't fail");
    Ok(String::from_utf8(buf).expect("token dump is valid UTF-8"))
}

fn report(source: &SourceFile, env: &Env<'_>, error: &Spanned<Error>) -> CompileError {
    let error = CompileError::new(source, &env.idents, error);
    debug!(kind = %error.kind, span = %error.span, "compilation failed");
    error
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{error::ErrorKind, token::Location};

    fn compile_str(text: &str) -> Result<String, CompileError> {
        compile(&SourceFile::new("test.ll", text), &Builtins::standard())
    }

    #[test]
    fn wraps_statements_in_main() {
        let code = compile_str("let x: int = 2;\nprintln(x);\n").unwrap();
        assert!(code.starts_with("#include <stdio.h>\n"));
        assert!(code.contains("int main(void) {\n\tint x = 2;\n\tprintf(\"%d\\n\", x);\n"));
        assert!(code.ends_with("\treturn 0;\n}\n"));
    }

    #[test]
    fn deterministic() {
        let src = "let d: Drift = Drift(L = 1);\nlet l: Line = Line(4 * d);\n";
        assert_eq!(compile_str(src), compile_str(src));
    }

    #[test]
    fn undefined_variable_location() {
        let error = compile_str("let a: int = 1;\nlet b: int = a + c;\n").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Name);
        assert_eq!(error.loc, Location { line: 2, col: 18 });
        assert_eq!(
            error.to_string(),
            "test.ll:2:18: name error: undefined variable `c`"
        );
    }

    #[test]
    fn undefined_function_location() {
        let error = compile_str("\n  Foo(1);").unwrap_err();
        assert_eq!(error.to_string(), "test.ll:2:3: name error: undefined function `Foo`");
    }

    #[test]
    fn unknown_type_is_a_type_error() {
        let error = compile_str("let y: bogus = 1;").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Type);
        assert_eq!(error.to_string(), "test.ll:1:8: type error: unknown type `bogus`");
    }

    #[test]
    fn codegen_errors_are_reported() {
        let error = compile_str("Line(2.5);").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Codegen);
        assert_eq!(error.loc, Location { line: 1, col: 6 });
    }

    #[test]
    fn lex_errors_are_reported() {
        let error = compile_str("let s: int = 1;\nprintln(\"open);\n").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Lex);
        assert_eq!(error.loc, Location { line: 2, col: 9 });
    }

    #[test]
    fn ast_dump() {
        let source = SourceFile::new("t.ll", "let n: int = 1 + 2;");
        let tree = dump_ast(&source, &Builtins::standard()).unwrap();
        assert_eq!(
            tree,
            indoc! {"
                let n: int %: Int (initialized)
                  binary Add (13..18 %: Int)
                    int 1 (13..14 %: Int)
                    int 2 (17..18 %: Int)
            "}
        );
    }

    #[test]
    fn token_dump() {
        let source = SourceFile::new("t.ll", "let x");
        let dump = dump_tokens(&source).unwrap();
        assert_eq!(
            dump,
            indoc! {r#"
                1:1     Let         "let"
                1:5     Identifier  "x"
                1:6     Eof         ""
            "#}
        );
    }
}
