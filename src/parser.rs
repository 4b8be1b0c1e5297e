use tracing::{debug, trace};

use crate::{
    ast::{BinaryOperator, Binding, Expr, ExprKind, Ident, NamedArg, Program, Stmt, TypeName},
    builtins::Builtin,
    error::Error,
    eval,
    lexer::{self, extract},
    symbols::Env,
    token::{Span, Spanned, Token, TokenKind},
    types::{self, ValueType},
};

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Lexes and parses a whole program. Names are resolved and every expression
/// is typed as it is built; declarations are recorded in `env`.
pub fn parse_program(src: &str, tokens: &mut Vec<Token>, env: &mut Env<'_>) -> Result<Program> {
    parse(src, tokens, env, Parser::parse_program)
}

/// Lexes and parses a single expression against the symbols already in `env`.
pub fn parse_expr(src: &str, tokens: &mut Vec<Token>, env: &mut Env<'_>) -> Result<Expr> {
    parse(src, tokens, env, |p| {
        let expr = p.parse_expr()?;
        p.consume(TokenKind::Eof)?;
        Ok(expr)
    })
}

fn parse<'src, 'tok, 'env, 'b, T>(
    src: &'src str,
    tokens: &'tok mut Vec<Token>,
    env: &'env mut Env<'b>,
    f: impl for<'a> FnOnce(&'a mut Parser<'src, 'tok, 'env, 'b>) -> Result<T>,
) -> Result<T> {
    assert!(tokens.is_empty());
    lexer::lex(src, tokens)?;
    debug!(tokens = tokens.len(), "lexed");
    let mut p = Parser::new(src, tokens, env);
    f(&mut p)
}

struct Parser<'src, 'tok, 'env, 'b> {
    src: &'src str,
    tokens: &'tok [Token],
    env: &'env mut Env<'b>,
    cursor: usize,
}

impl Parser<'_, '_, '_, '_> {
    fn parse_program(&mut self) -> Result<Program> {
        let mut statements = Vec::with_capacity(32);
        while !self.is(TokenKind::Eof) {
            if self.take(TokenKind::Semicolon) {
                continue;
            }
            let stmt = self.parse_stmt()?;
            trace!(index = statements.len(), "parsed statement");
            statements.push(stmt);
        }
        self.consume(TokenKind::Eof)?;
        debug!(
            statements = statements.len(),
            symbols = self.env.symbols.len(),
            "parsed program"
        );
        Ok(Program { statements })
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        if self.is(TokenKind::Let) {
            return self.parse_let().map(Stmt::Let);
        }
        let expr = self.parse_expr()?;
        self.consume(TokenKind::Semicolon)?;
        Ok(Stmt::Expr(expr))
    }

    fn parse_let(&mut self) -> Result<Binding> {
        self.consume(TokenKind::Let)?;
        let name = self.parse_ident()?;
        self.consume(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let mut initializer = self.parse_initializer()?;
        self.consume(TokenKind::Semicolon)?;

        let declared = ty.resolved;
        let mut constant = None;
        if let Some(init) = &mut initializer {
            if !declared.accepts(init.ty) {
                let error = Error::Mismatch {
                    declared,
                    actual: init.ty,
                };
                return Err(init.span.wrap(error));
            }
            // The declared type wins.
            init.ty = declared;
            if declared == ValueType::Int {
                constant = eval::fold_int(init, &self.env.symbols).ok();
            }
        }

        // Declared after the initializer, which still sees any previous
        // binding of the same name.
        let symbol = self.env.symbols.declare(name.name, declared, constant);
        Ok(Binding {
            name,
            ty,
            symbol,
            initializer,
        })
    }

    fn parse_initializer(&mut self) -> Result<Option<Expr>> {
        if !self.take(TokenKind::Assign) {
            return Ok(None);
        }
        let expr = self.parse_expr()?;
        Ok(Some(expr))
    }

    fn parse_type(&mut self) -> Result<TypeName> {
        let ident = self.parse_ident()?;
        let name = self.env.idents.get(ident.name);
        let Some(resolved) = types::resolve_type_name(name, self.env.builtins) else {
            return Err(ident.span.wrap(Error::UnknownType(ident.name)));
        };
        Ok(TypeName { ident, resolved })
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        let token = self.consume(TokenKind::Identifier)?;
        Ok(self.ident(token))
    }

    fn ident(&mut self, token: Token) -> Ident {
        Ident {
            name: self.env.idents.intern(extract::ident(token, self.src)),
            span: token.span(),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr> {
        let lhs_token = self.advance();
        let mut lhs = self.parse_nud(lhs_token)?;

        loop {
            let op_token = self.peek();
            let Some((lbp, rbp)) = Self::infix_binding_power(op_token.kind) else {
                break;
            };
            if lbp < min_bp {
                break;
            }
            self.advance(); // Operator
            lhs = self.parse_led(op_token, lhs, rbp)?;
        }

        Ok(lhs)
    }

    /// nud: Parses tokens that start an expression
    /// (prefix minus, literals, grouping, variables and calls)
    fn parse_nud(&mut self, token: Token) -> Result<Expr> {
        let span = token.span();
        let (kind, ty) = match token.kind {
            TokenKind::Identifier if self.is(TokenKind::LParen) => {
                let name = self.ident(token);
                return self.parse_call(name);
            }
            TokenKind::Identifier => {
                let ident = self.ident(token);
                let Some(symbol) = self.env.symbols.lookup(ident.name) else {
                    return Err(span.wrap(Error::UndefinedVariable(ident.name)));
                };
                let ty = self.env.symbols.get(symbol).ty;
                (ExprKind::Variable { ident, symbol }, ty)
            }
            TokenKind::Int => {
                let Ok(parsed) = extract::int(token, self.src) else {
                    return Err(span.wrap(Error::ParseInt));
                };
                (ExprKind::Int(parsed), ValueType::Int)
            }
            TokenKind::Float => match extract::float(token, self.src) {
                Ok(parsed) if parsed.is_finite() => {
                    let raw = Box::from(span.substr(self.src));
                    (ExprKind::Float(raw), ValueType::Float)
                }
                _ => return Err(span.wrap(Error::ParseFloat)),
            },
            TokenKind::String => (
                ExprKind::String(extract::string(token, self.src)),
                ValueType::String,
            ),

            // Grouping: ( expr )
            TokenKind::LParen => {
                let mut expr = self.parse_expr()?;
                let end = self.consume(TokenKind::RParen)?;
                expr.span = span.to(end.span());
                return Ok(expr);
            }

            // Negation: - expr, lowered to (-1) * expr
            TokenKind::Minus => {
                let rbp = Self::prefix_binding_power(token.kind);
                let operand = self.parse_expr_bp(rbp)?;
                let minus_one = Expr {
                    kind: ExprKind::Int(-1),
                    span,
                    ty: ValueType::Int,
                };
                return Self::binary(BinaryOperator::Mul, span, minus_one, operand);
            }

            other => return Err(span.wrap(Error::UnexpectedTokenInExpr { token: other })),
        };

        Ok(Expr { kind, span, ty })
    }

    /// led: Parses the binary operators that follow a left-hand-side
    /// expression.
    fn parse_led(&mut self, op_token: Token, lhs: Expr, rbp: u8) -> Result<Expr> {
        let op = match op_token.kind {
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Minus => BinaryOperator::Sub,
            TokenKind::Star => BinaryOperator::Mul,
            TokenKind::Slash => BinaryOperator::Div,
            other => {
                let error = Error::UnexpectedTokenInExpr { token: other };
                return Err(op_token.span().wrap(error));
            }
        };
        // Parse right operand with correct precedence
        let rhs = self.parse_expr_bp(rbp)?;
        Self::binary(op, op_token.span(), lhs, rhs)
    }

    /// Builds a typed binary node. Illegal operand types are reported at the
    /// operator.
    fn binary(op: BinaryOperator, op_span: Span, lhs: Expr, rhs: Expr) -> Result<Expr> {
        let Some(ty) = types::binary_result(op, lhs.ty, rhs.ty) else {
            let error = Error::IllegalOperands {
                op,
                lhs: lhs.ty,
                rhs: rhs.ty,
            };
            return Err(op_span.wrap(error));
        };
        Ok(Expr {
            span: lhs.span.to(rhs.span),
            kind: ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
        })
    }

    /// Call: ID ( [arg [, arg]*] ), where each arg is `expr` or `ID = expr`.
    fn parse_call(&mut self, name: Ident) -> Result<Expr> {
        let builtin = {
            let text = self.env.idents.get(name.name);
            let Some(builtin) = self.env.builtins.get(text) else {
                return Err(name.span.wrap(Error::UndefinedFunction(name.name)));
            };
            builtin
        };

        self.consume(TokenKind::LParen)?;
        let mut args = Vec::new();
        let mut named = Vec::new();
        if !self.is(TokenKind::RParen) {
            loop {
                if self.is(TokenKind::Identifier) && self.peek_second().kind == TokenKind::Assign {
                    let param = self.parse_ident()?;
                    self.consume(TokenKind::Assign)?;
                    let value = self.parse_expr()?;
                    named.push((param, value));
                } else {
                    args.push(self.parse_expr()?);
                }
                if !self.take(TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self.consume(TokenKind::RParen)?;

        let named = self.bind_arguments(builtin, &args, named)?;
        Ok(Expr {
            kind: ExprKind::Call {
                name,
                builtin,
                args,
                named,
            },
            span: name.span.to(end.span()),
            ty: builtin.return_ty,
        })
    }

    /// Checks the arguments of a call against the builtin's signature and
    /// binds named arguments to parameter indexes.
    fn bind_arguments(
        &self,
        builtin: &'static Builtin,
        args: &[Expr],
        named: Vec<(Ident, Expr)>,
    ) -> Result<Vec<NamedArg>> {
        let function = builtin.name;
        if builtin.is_variadic() {
            if let Some((name, _)) = named.first() {
                return Err(name.span.wrap(Error::NamedArgumentToVariadic { function }));
            }
            return Ok(Vec::new());
        }

        let params = builtin.params();
        if let Some(extra) = args.get(params.len()) {
            let error = Error::TooManyArguments {
                function,
                expected: params.len(),
                actual: args.len(),
            };
            return Err(extra.span.wrap(error));
        }

        let check = |param: usize, value: &Expr| {
            let param = &params[param];
            if param.ty.accepts(value.ty) {
                Ok(())
            } else {
                let error = Error::ArgumentType {
                    function,
                    param: param.name,
                    expected: param.ty,
                    actual: value.ty,
                };
                Err(value.span.wrap(error))
            }
        };

        let mut bound = vec![false; params.len()];
        for (i, arg) in args.iter().enumerate() {
            check(i, arg)?;
            bound[i] = true;
        }

        let mut bound_named = Vec::with_capacity(named.len());
        for (name, value) in named {
            let text = self.env.idents.get(name.name);
            let Some(param) = builtin.param_index(text) else {
                let error = Error::UnknownParameter {
                    function,
                    param: name.name,
                };
                return Err(name.span.wrap(error));
            };
            if bound[param] {
                let error = Error::DuplicateArgument {
                    function,
                    param: params[param].name,
                };
                return Err(name.span.wrap(error));
            }
            check(param, &value)?;
            bound[param] = true;
            bound_named.push(NamedArg { name, param, value });
        }
        Ok(bound_named)
    }

    fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8)> {
        let bp = match kind {
            // Addition/Subtraction (left-associative)
            TokenKind::Plus | TokenKind::Minus => (1, 2),

            // Multiplication/Division (left-associative)
            TokenKind::Star | TokenKind::Slash => (3, 4),

            _ => return None,
        };
        Some(bp)
    }

    /// Only `-` is a prefix operator. It binds tighter than any infix one.
    fn prefix_binding_power(kind: TokenKind) -> u8 {
        debug_assert_eq!(kind, TokenKind::Minus);
        5
    }
}

impl Parser<'_, '_, '_, '_> {
    fn new<'src, 'tok, 'env, 'b>(
        src: &'src str,
        tokens: &'tok [Token],
        env: &'env mut Env<'b>,
    ) -> Parser<'src, 'tok, 'env, 'b> {
        let mut p = Parser {
            src,
            tokens,
            env,
            cursor: 0,
        };
        p.setup();
        p
    }

    /// Setups the parser, skipping any trivia if necessary.
    fn setup(&mut self) {
        while self.peek().kind.is_trivia() {
            self.cursor += 1;
        }
    }

    /// Returns the current token. The buffer always ends with
    /// [`TokenKind::Eof`], which is returned once the input is exhausted.
    #[inline]
    fn peek(&self) -> Token {
        self.token_at(self.cursor)
    }

    /// Returns the first non-trivia token after the current one.
    fn peek_second(&self) -> Token {
        let mut i = self.cursor + 1;
        while self.token_at(i).kind.is_trivia() {
            i += 1;
        }
        self.token_at(i)
    }

    fn token_at(&self, i: usize) -> Token {
        let last = self.tokens.len() - 1;
        self.tokens[i.min(last)]
    }

    /// Returns the current token and advances. Skips any trivia.
    fn advance(&mut self) -> Token {
        let c = self.peek(); // Before any advancement
        if c.is_eof() {
            return c;
        }
        while {
            self.cursor += 1;
            self.peek().kind.is_trivia()
        } {}
        c
    }

    /// Checks whether the current token matches the given one.
    fn is(&self, expect: TokenKind) -> bool {
        self.peek().kind == expect
    }

    /// Advances if the current token matches the provided one, returning true.
    /// If not, returns false and doesn't advance.
    fn take(&mut self, expect: TokenKind) -> bool {
        if self.is(expect) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advances if the current token matches the provided one, returning it.
    /// If not, fails with an error at the current token.
    fn consume(&mut self, expect: TokenKind) -> Result<Token> {
        let c = self.peek();
        if self.is(expect) {
            self.advance();
            Ok(c)
        } else {
            Err(c.span().wrap(Error::Unexpected {
                actual: c.kind,
                expected: expect,
            }))
        }
    }
}
