//! Renders compilation errors as miette diagnostics, pointing into the
//! source text.

// Fields are read by the derive macros.
#![allow(unused_assignments)]

use lattice::{
    error::{CompileError, ErrorKind},
    source::SourceFile,
};
use miette::{Diagnostic, NamedSource, SourceSpan};

#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(latticec::compile))]
pub struct CompileDiagnostic {
    pub kind: ErrorKind,
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("{label}")]
    pub span: SourceSpan,
    pub label: String,
}

impl CompileDiagnostic {
    pub fn new(error: &CompileError, source: &SourceFile) -> Self {
        CompileDiagnostic {
            kind: error.kind,
            message: format!("{}: {}", error.kind, error.message),
            src: NamedSource::new(source.name(), source.text().to_owned()),
            span: (error.span.lo, error.span.len as usize).into(),
            label: format!("at {}:{}", error.file, error.loc),
        }
    }
}

#[cfg(test)]
mod tests {
    use lattice::{builtins::Builtins, compile};

    use super::*;

    #[test]
    fn from_undefined_variable() {
        let source = SourceFile::new("ring.ll", "let l: Line = Line(cell);");
        let error = compile(&source, &Builtins::standard()).unwrap_err();
        let diag = CompileDiagnostic::new(&error, &source);

        assert_eq!(diag.kind, ErrorKind::Name);
        assert_eq!(diag.message, "name error: undefined variable `cell`");
        assert_eq!(diag.span.offset(), 19);
        assert_eq!(diag.span.len(), 4);
        assert_eq!(diag.label, "at ring.ll:1:20");
    }

    #[test]
    fn from_error_at_end_of_input() {
        let source = SourceFile::new("ring.ll", "let x: int = 1");
        let error = compile(&source, &Builtins::standard()).unwrap_err();
        let diag = CompileDiagnostic::new(&error, &source);

        assert_eq!(diag.kind, ErrorKind::Syntax);
        assert_eq!(diag.span.offset(), 14);
        assert_eq!(diag.span.len(), 0);
    }
}
