use std::{
    collections::{HashMap, HashSet},
    fmt::{self, Write},
    format_args as f,
    marker::PhantomData,
};

use tracing::{debug, trace};

use crate::{
    ast::{BinaryOperator, Binding, Expr, ExprKind, NamedArg, Program, Stmt},
    builtins::{Builtin, Lowering},
    codegen::runtime::Runtime,
    error::Error,
    eval,
    symbols::{Env, SymbolId},
    token::{Span, Spanned},
    types::ValueType,
};

type Result<T = (), E = Spanned<Error>> = std::result::Result<T, E>;

const DEFAULT_CODE_CAPACITY: usize = 4 * 1024; // 4 KiB

/// Largest repetition count `Line(...)` unrolls.
pub const MAX_REPETITIONS: u64 = 1024;

pub struct Generator<'env, 'b, R> {
    code: String,
    env: &'env Env<'b>,
    /// C identifier of each declared variable.
    idents: HashMap<SymbolId, String>,
    emitted: HashSet<String>,
    _runtime: PhantomData<R>,
}

impl<'env, 'b, R> Generator<'env, 'b, R>
where
    R: Runtime,
{
    pub fn new(env: &'env Env<'b>) -> Generator<'env, 'b, R> {
        Generator {
            code: String::with_capacity(DEFAULT_CODE_CAPACITY),
            env,
            idents: HashMap::new(),
            emitted: HashSet::new(),
            _runtime: PhantomData,
        }
    }

    pub fn generate(mut self, program: &Program) -> Result<String> {
        self.emit(R::PROLOGUE);
        for (index, stmt) in program.statements.iter().enumerate() {
            self.emit('\t');
            match stmt {
                Stmt::Let(binding) => self.g_binding(binding)?,
                Stmt::Expr(expr) => self.g_expr(expr)?,
            }
            self.emit(";\n");
            trace!(index, "lowered statement");
        }
        self.emit(R::EPILOGUE);
        debug!(bytes = self.code.len(), "generated C");
        Ok(self.code)
    }

    fn g_binding(&mut self, binding: &Binding) -> Result {
        let ctype = binding.ty.resolved.c_name();
        let ident = self.declare_ident(binding.symbol);
        self.emit(f!("{ctype} {ident}"));
        if let Some(init) = &binding.initializer {
            self.emit(" = ");
            self.g_expr(init)?;
        }
        Ok(())
    }

    fn g_expr(&mut self, e: &Expr) -> Result {
        match &e.kind {
            ExprKind::Int(int) => self.emit(int),
            ExprKind::Float(raw) => self.emit(raw),
            ExprKind::String(s) => self.emit(f!("\"{}\"", s.replace('\\', "\\\\"))),
            ExprKind::Variable { symbol, .. } => {
                let ident = self.c_ident(*symbol).to_owned();
                self.emit(ident);
            }
            ExprKind::Binary { op, lhs, rhs } => self.g_binary(*op, lhs, rhs)?,
            ExprKind::Call {
                builtin,
                args,
                named,
                ..
            } => match builtin.lowering {
                Lowering::Println => self.g_println(args)?,
                Lowering::Line => self.g_line(args)?,
                Lowering::Constructor(function) => {
                    self.g_constructor(builtin, function, e.span, args, named)?;
                }
            },
        }
        Ok(())
    }

    /// Numbers use the C operators; elements and lines go through the
    /// runtime's line algebra.
    fn g_binary(&mut self, op: BinaryOperator, lhs: &Expr, rhs: &Expr) -> Result {
        use BinaryOperator::*;
        use Operand::*;
        use ValueType::*;

        if lhs.ty.is_numeric() && rhs.ty.is_numeric() {
            self.emit('(');
            self.g_expr(lhs)?;
            self.emit(f!(" {} ", op.as_str()));
            self.g_expr(rhs)?;
            self.emit(')');
            return Ok(());
        }

        let (function, args) = match (op, lhs.ty, rhs.ty) {
            (Add, Element, Element) => (R::CONCATENATE, [Plain(lhs), Plain(rhs)]),
            (Add, Line, Element) => (R::APPEND_ELEMENT, [Plain(lhs), Plain(rhs)]),
            (Add, Element, Line) => (R::PREPEND_ELEMENT, [Plain(lhs), Plain(rhs)]),
            (Add, Line, Line) => (R::APPEND_LINE, [Plain(lhs), Plain(rhs)]),

            (Sub, Element, Line) => (R::APPEND_REVERSED_TO_ELEMENT, [Plain(lhs), Plain(rhs)]),
            (Sub, Line, Line) => (R::APPEND_REVERSED_TO_LINE, [Plain(lhs), Plain(rhs)]),
            (Sub, Element, Element) => (R::CONCATENATE, [Plain(lhs), Reversed(rhs)]),
            (Sub, Line, Element) => (R::APPEND_ELEMENT, [Plain(lhs), Reversed(rhs)]),

            (Mul, Int, Line) => (R::REPEAT_LINE, [Plain(rhs), Plain(lhs)]),
            (Mul, Line, Int) => (R::REPEAT_LINE, [Plain(lhs), Plain(rhs)]),
            (Mul, Int, Element) => (R::REPEAT_ELEMENT, [Plain(rhs), Plain(lhs)]),
            (Mul, Element, Int) => (R::REPEAT_ELEMENT, [Plain(lhs), Plain(rhs)]),

            (op, lhs, rhs) => unreachable!("operands {lhs} {op:?} {rhs} were checked when parsing"),
        };

        self.emit(f!("{function}("));
        for (i, arg) in args.into_iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            match arg {
                Plain(e) => self.g_expr(e)?,
                Reversed(e) => {
                    self.emit(f!("{}(", R::REVERSE_ELEMENT));
                    self.g_expr(e)?;
                    self.emit(')');
                }
            }
        }
        self.emit(')');
        Ok(())
    }

    fn g_println(&mut self, args: &[Expr]) -> Result {
        let mut format = String::with_capacity(args.len() * 3);
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                format.push(' ');
            }
            format.push_str(match arg.ty {
                ValueType::Int => "%d",
                ValueType::Float => "%f",
                ValueType::String => "%s",
                other => return Err(arg.span.wrap(Error::Unprintable(other))),
            });
        }

        self.emit(f!("{}(\"{format}\\n\"", R::PRINT));
        for arg in args {
            self.emit(", ");
            self.g_expr(arg)?;
        }
        self.emit(')');
        Ok(())
    }

    /// Each argument becomes a tagged `(tag, value)` pair. Repetitions with a
    /// constant count are unrolled, reversing the operand if the count is
    /// negative. Counts are at most [`MAX_REPETITIONS`] in magnitude.
    fn g_line(&mut self, args: &[Expr]) -> Result {
        self.emit(f!("{}(", R::CREATE_LINE));
        for arg in args {
            if let Some((count_expr, operand)) = Self::repetition(arg) {
                let count = eval::fold_int(count_expr, &self.env.symbols)?;
                if count.unsigned_abs() > MAX_REPETITIONS {
                    let error = Error::TooManyRepetitions {
                        count,
                        limit: MAX_REPETITIONS,
                    };
                    return Err(count_expr.span.wrap(error));
                }
                let tag = Self::line_tag(operand)?;
                let value = self.capture(|this| this.g_expr(operand))?;
                let value = if count < 0 {
                    let reverse = if operand.ty == ValueType::Line {
                        R::REVERSE_LINE
                    } else {
                        R::REVERSE_ELEMENT
                    };
                    format!("{reverse}({value})")
                } else {
                    value
                };
                for _ in 0..count.unsigned_abs() {
                    self.emit(f!("{tag}, {value}, "));
                }
            } else {
                let tag = Self::line_tag(arg)?;
                self.emit(f!("{tag}, "));
                self.g_expr(arg)?;
                self.emit(", ");
            }
        }
        self.emit(f!("{})", R::END_OF_ARGS));
        Ok(())
    }

    /// Splits `n * x` or `x * n`, where `x` is an element or a line, into the
    /// count and the repeated operand.
    fn repetition(e: &Expr) -> Option<(&Expr, &Expr)> {
        let ExprKind::Binary {
            op: BinaryOperator::Mul,
            lhs,
            rhs,
        } = &e.kind
        else {
            return None;
        };
        match (lhs.ty, rhs.ty) {
            (ValueType::Int, ty) if ty.is_beamline() => Some((&**lhs, &**rhs)),
            (ty, ValueType::Int) if ty.is_beamline() => Some((&**rhs, &**lhs)),
            _ => None,
        }
    }

    fn line_tag(e: &Expr) -> Result<&'static str> {
        match e.ty {
            ValueType::Element => Ok(R::ARG_ELEMENT),
            ValueType::Line => Ok(R::ARG_LINE),
            other => Err(e.span.wrap(Error::InvalidLineArgument(other))),
        }
    }

    /// Calls the runtime constructor with every parameter in order. Omitted
    /// optional parameters are `0.0`.
    fn g_constructor(
        &mut self,
        builtin: &Builtin,
        function: &str,
        span: Span,
        args: &[Expr],
        named: &[NamedArg],
    ) -> Result {
        let params = builtin.params();
        let mut values: Vec<Option<&Expr>> = vec![None; params.len()];
        for (slot, arg) in values.iter_mut().zip(args) {
            *slot = Some(arg);
        }
        for arg in named {
            values[arg.param] = Some(&arg.value);
        }

        self.emit(f!("{function}("));
        for (i, (param, value)) in params.iter().zip(values).enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            match value {
                Some(value) => self.g_expr(value)?,
                None if param.required => {
                    let error = Error::MissingArgument {
                        function: builtin.name,
                        param: param.name,
                    };
                    return Err(span.wrap(error));
                }
                None => self.emit("0.0"),
            }
        }
        self.emit(')');
        Ok(())
    }
}

// Utility functions.
impl<R> Generator<'_, '_, R>
where
    R: Runtime,
{
    fn emit(&mut self, code: impl fmt::Display) {
        self.code
            .write_fmt(f!("{code}"))
            .expect("code emit should be infallible");
    }

    /// Runs `f`, returning what it emitted instead of appending it.
    fn capture(&mut self, f: impl FnOnce(&mut Self) -> Result) -> Result<String> {
        let outer = std::mem::take(&mut self.code);
        let result = f(self);
        let captured = std::mem::replace(&mut self.code, outer);
        result.map(|()| captured)
    }

    /// Picks the C identifier of a declaration. Names that clash with C or the
    /// runtime get a prefix. A name already emitted gets the first free
    /// numeric suffix, counting from the number of earlier declarations.
    fn declare_ident(&mut self, id: SymbolId) -> String {
        let symbol = self.env.symbols.get(id);
        let name = self.env.idents.get(symbol.name);
        let base = if R::RESERVED.contains(name) {
            format!("{}{name}", R::RESERVED_PREFIX)
        } else {
            name.to_owned()
        };

        let mut ident = base.clone();
        let mut suffix = symbol.shadowed.max(1);
        while self.emitted.contains(&ident) {
            ident = format!("{base}__{suffix}");
            suffix += 1;
        }
        self.emitted.insert(ident.clone());
        self.idents.insert(id, ident.clone());
        ident
    }

    /// The C identifier of a declared variable.
    fn c_ident(&self, id: SymbolId) -> &str {
        self.idents
            .get(&id)
            .map(String::as_str)
            .expect("variables are declared before use")
    }
}

enum Operand<'e> {
    Plain(&'e Expr),
    /// An element passed through the runtime's reversal.
    Reversed(&'e Expr),
}
