use std::io::Write;

use crate::{ast::*, token::Token, types::ValueType, util::intern::Interner};

const INDENT_WIDTH: usize = 2;

pub fn print_program_string(idents: &Interner, program: &Program) -> String {
    let mut buf = Vec::with_capacity(1024);
    print_program(&mut buf, idents, program).expect("writing to a Vec can't fail");
    String::from_utf8(buf).expect("tree is valid UTF-8")
}

pub fn print_expr_string(idents: &Interner, expr: &Expr) -> String {
    let mut buf = Vec::with_capacity(512);
    print_expr(&mut buf, idents, 0, expr).expect("writing to a Vec can't fail");
    String::from_utf8(buf).expect("tree is valid UTF-8")
}

pub fn print_program(
    w: &mut impl Write,
    idents: &Interner,
    program: &Program,
) -> std::io::Result<()> {
    for stmt in &program.statements {
        match stmt {
            Stmt::Let(binding) => print_binding(w, idents, 0, binding)?,
            Stmt::Expr(expr) => print_expr(w, idents, 0, expr)?,
        }
    }
    Ok(())
}

fn print_binding(
    w: &mut impl Write,
    idents: &Interner,
    i: usize,
    binding: &Binding,
) -> std::io::Result<()> {
    sp(w, i)?;
    write!(
        w,
        "let {}: {}{}",
        idents.get(binding.name.name),
        idents.get(binding.ty.ident.name),
        TypeInfo(binding.ty.resolved),
    )?;
    if let Some(ref initializer) = binding.initializer {
        writeln!(w, " (initialized)")?;
        print_expr(w, idents, i + 1, initializer)?;
    } else {
        writeln!(w)?;
    }
    Ok(())
}

pub fn print_expr(
    w: &mut impl Write,
    idents: &Interner,
    i: usize,
    expr: &Expr,
) -> std::io::Result<()> {
    sp(w, i)?;
    let info = TypeInfo(expr.ty);
    let span = expr.span;
    match &expr.kind {
        ExprKind::Int(val) => {
            writeln!(w, "int {val} ({span}{info})")?;
        }
        ExprKind::Float(raw) => {
            writeln!(w, "float {raw} ({span}{info})")?;
        }
        ExprKind::String(val) => {
            writeln!(w, "string {val:?} ({span}{info})")?;
        }
        ExprKind::Variable { ident, .. } => {
            writeln!(w, "ident {} ({span}{info})", idents.get(ident.name))?;
        }
        ExprKind::Binary { op, lhs, rhs } => {
            writeln!(w, "binary {op:?} ({span}{info})")?;
            print_expr(w, idents, i + 1, lhs)?;
            print_expr(w, idents, i + 1, rhs)?;
        }
        ExprKind::Call {
            name, args, named, ..
        } => {
            writeln!(w, "call {} ({span}{info})", idents.get(name.name))?;
            if !args.is_empty() {
                sp(w, i + 1)?;
                writeln!(w, "arguments")?;
                for arg in args {
                    print_expr(w, idents, i + 2, arg)?;
                }
            }
            for arg in named {
                sp(w, i + 1)?;
                writeln!(w, "named {}", idents.get(arg.name.name))?;
                print_expr(w, idents, i + 2, &arg.value)?;
            }
        }
    }
    Ok(())
}

/// Prints one line per token: location, kind and source text.
pub fn print_tokens(w: &mut impl Write, src: &str, tokens: &[Token]) -> std::io::Result<()> {
    for token in tokens {
        let loc = token.loc().to_string();
        let kind = format!("{:?}", token.kind);
        let text = token.span().substr(src);
        writeln!(w, "{loc:<8}{kind:<12}{text:?}")?;
    }
    Ok(())
}

fn sp(w: &mut impl Write, i: usize) -> std::io::Result<()> {
    write!(w, "{:width$}", "", width = i * INDENT_WIDTH)
}

struct TypeInfo(ValueType);

impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, " %: {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::lexer;

    #[test]
    fn token_dump() {
        let src = "let q: Quad;\n// done";
        let tokens = lexer::lex_in_new(src).unwrap();
        let mut buf = Vec::new();
        print_tokens(&mut buf, src, &tokens).unwrap();
        let expected = indoc! {r#"
            1:1     Let         "let"
            1:5     Identifier  "q"
            1:6     Colon       ":"
            1:8     Identifier  "Quad"
            1:12    Semicolon   ";"
            2:1     Comment     "// done"
            2:8     Eof         ""
        "#};
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }
}
