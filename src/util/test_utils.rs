use crate::{
    builtins::Builtins,
    codegen::{self, runtime::Runtime},
    parser,
    symbols::Env,
    token::Spanned,
    util::{
        self,
        fmt::{tree, Show},
        intern::Interner,
    },
};

pub fn format_errors<E>(i: &Interner, e: &[Spanned<E>]) -> Vec<String>
where
    Spanned<E>: Show,
{
    let ctx = util::fmt::Context { ident_interner: i };
    e.iter().map(|e| format!("{:#}", e.display(&ctx))).collect()
}

/// Each variant contains the input.
pub enum Test {
    ParserProgram(&'static str),
    ParserExpr(&'static str),
    CodegenProgram(&'static str),
}

pub enum Assertion {
    TreeOk(&'static str),
    CodeOk(&'static str),
    ExpectedErrors(&'static [&'static str]),
}

/// Runs the phases the test asks for, returning the printed result (a tree or
/// the statements of `main`) and the formatted errors.
#[track_caller]
pub fn run_pipeline(test: Test) -> (String, Vec<String>) {
    let tokens_buf = &mut Vec::with_capacity(1024);
    let builtins = Builtins::standard();
    let mut env = Env::new(&builtins);

    match test {
        Test::ParserProgram(input) => match parser::parse_program(input, tokens_buf, &mut env) {
            Ok(prog) => (tree::print_program_string(&env.idents, &prog), vec![]),
            Err(error) => (String::new(), format_errors(&env.idents, &[error])),
        },
        Test::ParserExpr(input) => match parser::parse_expr(input, tokens_buf, &mut env) {
            Ok(expr) => (tree::print_expr_string(&env.idents, &expr), vec![]),
            Err(error) => (String::new(), format_errors(&env.idents, &[error])),
        },
        Test::CodegenProgram(input) => {
            let generated = parser::parse_program(input, tokens_buf, &mut env)
                .and_then(|prog| codegen::generate(&prog, &env));
            match generated {
                Ok(code) => (main_body(&code), vec![]),
                Err(error) => (String::new(), format_errors(&env.idents, &[error])),
            }
        }
    }
}

/// Strips the translation unit wrapper and the statement indentation.
#[track_caller]
pub fn main_body(code: &str) -> String {
    type R = codegen::runtime::AccRuntime;
    let body = code
        .strip_prefix(R::PROLOGUE)
        .and_then(|c| c.strip_suffix(R::EPILOGUE))
        .expect("generated code has the standard wrapper");
    body.lines()
        .map(|line| line.strip_prefix('\t').unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[track_caller]
pub fn run_assertion(assertion: Assertion, formatted_actual: &str, formatted_errors: &[String]) {
    match assertion {
        Assertion::TreeOk(expected) | Assertion::CodeOk(expected) => {
            let expected_errors: &[&str] = &[];
            ::pretty_assertions::assert_eq!(formatted_errors, expected_errors);
            ::pretty_assertions::assert_eq!(formatted_actual.trim(), expected.trim());
        }
        Assertion::ExpectedErrors(expected_errors) => {
            ::pretty_assertions::assert_eq!(formatted_errors, expected_errors);
        }
    }
}

macro_rules! tree_tests {
    (
        use $test_kind:ident;

        $(
            fn $test_name:ident() {
                let $source_kind:ident = $source:literal;
                $($assertions_tt:tt)*
            }
        )*
    ) => {
        $(
            #[test]
            fn $test_name() {
                let test: crate::util::test_utils::Test = tree_tests!(
                    @@get_test($test_kind, $source_kind),
                    ::indoc::indoc! { $source }
                );
                let (formatted_actual, formatted_errors) =
                    crate::util::test_utils::run_pipeline(test);
                let ctx = (&formatted_actual, &formatted_errors);
                tree_tests!(@@expand_assertions, ctx, [$($assertions_tt)*]);
            }
        )*
    };

    (@@expand_assertions, $ctx:expr, []) => {};
    (@@expand_assertions, $ctx:expr, [
        let $assertion:ident = $assertion_expected:expr;
        $($rest_assertions_tt:tt)*
    ]) => {
        crate::util::test_utils::run_assertion(
            tree_tests!(@@assertion, $assertion, $assertion_expected),
            $ctx.0,
            $ctx.1,
        );
        tree_tests!(@@expand_assertions, $ctx, [$($rest_assertions_tt)*]);
    };

    (@@assertion, tree_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::TreeOk(::indoc::indoc! { $expected })
    };
    (@@assertion, code_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::CodeOk(::indoc::indoc! { $expected })
    };
    (@@assertion, expected_errors, $expected:expr) => {
        crate::util::test_utils::Assertion::ExpectedErrors($expected)
    };

    (@@get_test(parser, program), $source:expr) => {
        crate::util::test_utils::Test::ParserProgram($source)
    };
    (@@get_test(parser, expr), $source:expr) => {
        crate::util::test_utils::Test::ParserExpr($source)
    };
    (@@get_test(codegen, program), $source:expr) => {
        crate::util::test_utils::Test::CodegenProgram($source)
    };
}
pub(crate) use tree_tests;
