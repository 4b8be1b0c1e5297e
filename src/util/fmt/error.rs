use crate::{error::Error, token::Spanned, util::fmt::Show};

impl Show for Spanned<Error> {
    fn show(&self, f: &mut std::fmt::Formatter<'_>, ctx: &super::Context<'_>) -> std::fmt::Result {
        let i = ctx.ident_interner;
        let Spanned { span, inner: error } = self;

        if f.alternate() {
            write!(f, "{span}: ")?;
        }

        use Error::*;
        match error {
            UnexpectedChar(c) => write!(f, "unexpected character `{}`", c.escape_debug()),
            UnclosedString => write!(f, "unclosed string literal"),
            Unexpected { actual, expected } => {
                write!(f, "expected {expected:?}, but got {actual:?}")
            }
            UnexpectedTokenInExpr { token } => {
                write!(f, "unexpected token {token:?} in expression")
            }
            ParseInt => write!(f, "integer literal out of range"),
            ParseFloat => write!(f, "float literal out of range"),
            UndefinedVariable(name) => {
                let name = i.get(name);
                write!(f, "undefined variable `{name}`")
            }
            UndefinedFunction(name) => {
                let name = i.get(name);
                write!(f, "undefined function `{name}`")
            }
            UnknownType(name) => {
                let name = i.get(name);
                write!(f, "unknown type `{name}`")
            }
            IllegalOperands { op, lhs, rhs } => {
                let op = op.as_str();
                write!(f, "cannot apply `{op}` to {lhs} and {rhs}")
            }
            Mismatch { declared, actual } => write!(
                f,
                "mismatched types: declared {declared}, but initializer is {actual}"
            ),
            TooManyArguments {
                function,
                expected,
                actual,
            } => write!(
                f,
                "{function} takes {expected} arguments, but {actual} were given"
            ),
            UnknownParameter { function, param } => {
                let param = i.get(param);
                write!(f, "{function} has no parameter `{param}`")
            }
            DuplicateArgument { function, param } => {
                write!(f, "parameter `{param}` of {function} is given more than once")
            }
            ArgumentType {
                function,
                param,
                expected,
                actual,
            } => write!(
                f,
                "parameter `{param}` of {function} expects {expected}, but got {actual}"
            ),
            NamedArgumentToVariadic { function } => {
                write!(f, "{function} does not take named arguments")
            }
            MissingArgument { function, param } => {
                write!(f, "missing required parameter `{param}` of {function}")
            }
            Unprintable(ty) => write!(f, "don't know how to print a value of type {ty}"),
            NotConstant => write!(
                f,
                "repetition count is not a compile-time integer constant"
            ),
            DivisionByZero => write!(f, "division by zero in constant expression"),
            Overflow => write!(f, "integer overflow in constant expression"),
            InvalidLineArgument(ty) => {
                write!(f, "Line arguments must be Element or Line, but got {ty}")
            }
            TooManyRepetitions { count, limit } => {
                write!(f, "repetition count {count} exceeds the limit of {limit}")
            }
        }
    }
}
