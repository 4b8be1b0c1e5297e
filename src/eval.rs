//! Compile-time evaluation of integer expressions, used for repetition counts.

use crate::{
    ast::{BinaryOperator, Expr, ExprKind},
    error::Error,
    symbols::SymbolTable,
    token::Spanned,
};

/// Folds an expression built from integer literals and constant `int`
/// bindings combined with `+ - * /`. Division truncates toward zero.
///
/// Every intermediate value must fit the C `int` the bindings are emitted as.
pub fn fold_int(expr: &Expr, symbols: &SymbolTable) -> Result<i64, Spanned<Error>> {
    match &expr.kind {
        ExprKind::Int(value) => {
            c_int(Some(*value)).ok_or_else(|| expr.span.wrap(Error::Overflow))
        }
        ExprKind::Variable { symbol, .. } => symbols
            .get(*symbol)
            .constant
            .ok_or_else(|| expr.span.wrap(Error::NotConstant)),
        ExprKind::Binary { op, lhs, rhs } => {
            let lhs = fold_int(lhs, symbols)?;
            let rhs = fold_int(rhs, symbols)?;
            let value = match op {
                BinaryOperator::Add => lhs.checked_add(rhs),
                BinaryOperator::Sub => lhs.checked_sub(rhs),
                BinaryOperator::Mul => lhs.checked_mul(rhs),
                BinaryOperator::Div if rhs == 0 => {
                    return Err(expr.span.wrap(Error::DivisionByZero));
                }
                BinaryOperator::Div => lhs.checked_div(rhs),
            };
            c_int(value).ok_or_else(|| expr.span.wrap(Error::Overflow))
        }
        ExprKind::Float(_) | ExprKind::String(_) | ExprKind::Call { .. } => {
            Err(expr.span.wrap(Error::NotConstant))
        }
    }
}

fn c_int(value: Option<i64>) -> Option<i64> {
    value.filter(|value| i32::try_from(*value).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builtins::Builtins, parser, symbols::Env, token::Span};

    fn fold(prelude: &str, expr: &str) -> Result<i64, Error> {
        let builtins = Builtins::standard();
        let mut env = Env::new(&builtins);
        parser::parse_program(prelude, &mut Vec::new(), &mut env).unwrap();
        let expr = parser::parse_expr(expr, &mut Vec::new(), &mut env).unwrap();
        fold_int(&expr, &env.symbols).map_err(|e| e.inner)
    }

    #[test]
    fn folds_arithmetic() {
        assert_eq!(fold("", "1 + 2 * 3"), Ok(7));
        assert_eq!(fold("", "(1 + 2) * 3"), Ok(9));
        assert_eq!(fold("", "7 / 2"), Ok(3));
        assert_eq!(fold("", "-7 / 2"), Ok(-3));
        assert_eq!(fold("", "10 - 4 - 3"), Ok(3));
        assert_eq!(fold("", "-(2 + 1)"), Ok(-3));
    }

    #[test]
    fn folds_constant_bindings() {
        let prelude = "let n: int = 4; let m: int = n * 2 - 1;";
        assert_eq!(fold(prelude, "m"), Ok(7));
        assert_eq!(fold(prelude, "n + m"), Ok(11));
    }

    #[test]
    fn rejects_non_constants() {
        assert_eq!(fold("let f: float = 2;", "f"), Err(Error::NotConstant));
        assert_eq!(fold("let n: int;", "n"), Err(Error::NotConstant));
        assert_eq!(fold("", "2.0 * 3"), Err(Error::NotConstant));
        // A binding whose initializer can't be folded isn't constant either.
        assert_eq!(fold("let n: int = 1 / 0;", "n"), Err(Error::NotConstant));
    }

    #[test]
    fn arithmetic_errors() {
        assert_eq!(fold("", "3 / (1 - 1)"), Err(Error::DivisionByZero));
        assert_eq!(
            fold("", "9223372036854775807 + 1"),
            Err(Error::Overflow)
        );
        assert_eq!(fold("", "2147483647"), Ok(2_147_483_647));
        assert_eq!(fold("", "-2147483647 - 1"), Ok(-2_147_483_648));
        assert_eq!(fold("", "2147483647 + 1"), Err(Error::Overflow));
        assert_eq!(fold("", "3000000000"), Err(Error::Overflow));
        assert_eq!(fold("", "65536 * 65536 / 65536"), Err(Error::Overflow));
        assert_eq!(
            fold("let n: int = 3000000000;", "n"),
            Err(Error::NotConstant)
        );

        let builtins = Builtins::standard();
        let mut env = Env::new(&builtins);
        let expr = parser::parse_expr("2 * 3 / 0", &mut Vec::new(), &mut env).unwrap();
        let err = fold_int(&expr, &env.symbols).unwrap_err();
        assert_eq!(err.span, Span::new_of_bounds(0..9));
    }
}
