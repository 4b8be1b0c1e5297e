use std::fmt;

use crate::{
    ast::BinaryOperator,
    source::SourceFile,
    token::{Location, Span, Spanned, TokenKind},
    types::ValueType,
    util::{
        fmt::{Context, Show},
        intern::{Interned, Interner},
    },
};

/// Every error the compiler can raise. All of them are fatal: the first one
/// aborts the compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    UnexpectedChar(char),
    UnclosedString,

    Unexpected {
        actual: TokenKind,
        expected: TokenKind,
    },
    UnexpectedTokenInExpr {
        token: TokenKind,
    },
    ParseInt,
    ParseFloat,

    UndefinedVariable(Interned),
    UndefinedFunction(Interned),

    UnknownType(Interned),
    IllegalOperands {
        op: BinaryOperator,
        lhs: ValueType,
        rhs: ValueType,
    },
    Mismatch {
        declared: ValueType,
        actual: ValueType,
    },
    TooManyArguments {
        function: &'static str,
        expected: usize,
        actual: usize,
    },
    UnknownParameter {
        function: &'static str,
        param: Interned,
    },
    DuplicateArgument {
        function: &'static str,
        param: &'static str,
    },
    ArgumentType {
        function: &'static str,
        param: &'static str,
        expected: ValueType,
        actual: ValueType,
    },
    NamedArgumentToVariadic {
        function: &'static str,
    },
    MissingArgument {
        function: &'static str,
        param: &'static str,
    },

    Unprintable(ValueType),
    NotConstant,
    DivisionByZero,
    Overflow,
    InvalidLineArgument(ValueType),
    TooManyRepetitions {
        count: i64,
        limit: u64,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use Error::*;
        match self {
            UnexpectedChar(_) | UnclosedString => ErrorKind::Lex,
            Unexpected { .. } | UnexpectedTokenInExpr { .. } | ParseInt | ParseFloat => {
                ErrorKind::Syntax
            }
            UndefinedVariable(_) | UndefinedFunction(_) => ErrorKind::Name,
            UnknownType(_)
            | IllegalOperands { .. }
            | Mismatch { .. }
            | TooManyArguments { .. }
            | UnknownParameter { .. }
            | DuplicateArgument { .. }
            | ArgumentType { .. }
            | NamedArgumentToVariadic { .. }
            | MissingArgument { .. } => ErrorKind::Type,
            Unprintable(_)
            | NotConstant
            | DivisionByZero
            | Overflow
            | InvalidLineArgument(_)
            | TooManyRepetitions { .. } => ErrorKind::Codegen,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Syntax,
    Name,
    Type,
    Codegen,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Lex => "lex error",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Name => "name error",
            ErrorKind::Type => "type error",
            ErrorKind::Codegen => "codegen error",
        };
        f.write_str(name)
    }
}

/// A positioned, rendered compilation error, as reported to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileError {
    pub kind: ErrorKind,
    pub file: String,
    pub loc: Location,
    pub span: Span,
    pub message: String,
}

impl CompileError {
    pub fn new(source: &SourceFile, idents: &Interner, error: &Spanned<Error>) -> Self {
        let ctx = Context {
            ident_interner: idents,
        };
        let message = error.display(&ctx).to_string();
        CompileError {
            kind: error.inner.kind(),
            file: source.name().to_owned(),
            loc: source.location(error.span.lo),
            span: error.span,
            message,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let CompileError {
            kind,
            file,
            loc,
            message,
            ..
        } = self;
        write!(f, "{file}:{loc}: {kind}: {message}")
    }
}

impl std::error::Error for CompileError {}
