// program   ::= statement*
// statement ::= 'let' ID ':' TYPE ['=' expr] ';'
//             | expr ';'
//             | ';'
// expr      ::= expr '+' expr
//             | expr '-' expr
//             | expr '*' expr
//             | expr '/' expr
//             | '-' expr
//             | '(' expr ')'
//             | ID '(' [arg (',' arg)*] ')'
//             | ID
//             | integer
//             | float
//             | string
// arg       ::= ID '=' expr
//             | expr

// Precedence
//
// - (prefix)
// * /
// + -

use crate::{
    builtins::Builtin,
    symbols::SymbolId,
    token::Span,
    types::ValueType,
    util::intern::Interned,
};

#[derive(Debug, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, PartialEq)]
pub enum Stmt {
    Let(Binding),
    Expr(Expr),
}

/// A `let` declaration. Without an initializer it only declares the name.
#[derive(Debug, PartialEq)]
pub struct Binding {
    pub name: Ident,
    pub ty: TypeName,
    pub symbol: SymbolId,
    pub initializer: Option<Expr>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: Interned,
    pub span: Span,
}

/// A type name as written, with the type it resolved to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeName {
    pub ident: Ident,
    pub resolved: ValueType,
}

#[derive(Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub ty: ValueType,
}

#[derive(Debug, PartialEq)]
pub enum ExprKind {
    Int(i64),
    /// The literal text, which is already valid C.
    Float(Box<str>),
    /// Contents between the quotes.
    String(Box<str>),
    Variable {
        ident: Ident,
        symbol: SymbolId,
    },
    Binary {
        op: BinaryOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        name: Ident,
        builtin: &'static Builtin,
        args: Vec<Expr>,
        named: Vec<NamedArg>,
    },
}

/// A `param = value` call argument, already bound to its parameter.
#[derive(Debug, PartialEq)]
pub struct NamedArg {
    pub name: Ident,
    pub param: usize,
    pub value: Expr,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
        }
    }
}
