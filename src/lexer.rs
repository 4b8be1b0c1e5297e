use std::{
    iter::Peekable,
    num::{ParseFloatError, ParseIntError},
};

use crate::{
    error::Error,
    token::{Location, Span, Spanned, Token, TokenKind, KEYWORDS},
};

pub const SUGGESTED_TOKENS_CAPACITY: usize = 8_192;

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Lexes the provided string, producing the tokens into the provided buffer.
/// The last token is always [`TokenKind::Eof`].
pub fn lex(src: &str, tokens: &mut Vec<Token>) -> Result<()> {
    Lexer::new(src, tokens).lex()
}

/// A convenience function that allocates a new buffer per lexed input and
/// returns it.
pub fn lex_in_new(src: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(SUGGESTED_TOKENS_CAPACITY);
    lex(src, &mut tokens)?;
    Ok(tokens)
}

struct Lexer<'src, 'tok> {
    src: &'src str,
    iter: Peekable<std::str::Chars<'src>>,
    cursor: usize,
    loc: Location,
    current_lo: usize,
    current_loc: Location,
    tokens: &'tok mut Vec<Token>,
}

impl Lexer<'_, '_> {
    /// Scans the source string until the input is exhausted.
    fn lex(mut self) -> Result<()> {
        assert_eq!(self.tokens.len(), 0, "must pass clean tokens buffer");
        loop {
            let Some(next) = self.scan_token_kind()? else {
                continue;
            };
            self.produce(next);
            if next == TokenKind::Eof {
                break Ok(());
            }
        }
    }

    /// Scans the token starting at the current character. Whitespace produces
    /// no token.
    fn scan_token_kind(&mut self) -> Result<Option<TokenKind>> {
        use TokenKind::*;
        let kind = match self.mark_advance() {
            // A NUL read without advancing means the input is exhausted.
            '\0' if self.cursor == self.current_lo => Eof,
            '+' => Plus,
            '-' => Minus,
            '*' => Star,
            '/' => match self.peek() {
                '/' => self.inline_comment(),
                _ => Slash,
            },
            '=' => Assign,
            '(' => LParen,
            ')' => RParen,
            ';' => Semicolon,
            ':' => Colon,
            ',' => Comma,
            '.' if self.peek().is_ascii_digit() => self.number(true),
            '.' => Dot,
            '"' => self.string()?,
            c if c.is_ascii_alphabetic() => self.identifier_or_keyword(),
            c if c.is_ascii_digit() => self.number(false),
            c if c.is_whitespace() => {
                self.whitespace();
                return Ok(None);
            }
            c => return Err(self.span().wrap(Error::UnexpectedChar(c))),
        };
        Ok(Some(kind))
    }

    /// Strings have no escapes and may not span lines.
    fn string(&mut self) -> Result<TokenKind> {
        loop {
            match self.peek() {
                '"' => {
                    self.advance();
                    return Ok(TokenKind::String);
                }
                '\n' => return Err(self.span().wrap(Error::UnclosedString)),
                '\0' if self.is_at_end() => return Err(self.span().wrap(Error::UnclosedString)),
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn identifier_or_keyword(&mut self) -> TokenKind {
        let valid_identifier_suffix = |c: char| c.is_ascii_alphanumeric() || c == '_';

        while valid_identifier_suffix(self.peek()) {
            self.advance();
        }
        let lower = self.substr().to_ascii_lowercase();
        KEYWORDS
            .get(lower.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier)
    }

    /// Lexes `digits ['.' digits] [exponent]`, or `'.' digits [exponent]` if
    /// `fraction` is set (the dot is already consumed). Only all-digit
    /// literals are integers.
    fn number(&mut self, mut fraction: bool) -> TokenKind {
        self.digits();
        if !fraction && self.peek() == '.' {
            self.advance();
            self.digits();
            fraction = true;
        }

        let mut rest = self.src[self.cursor..].chars();
        let exponent = match (rest.next(), rest.next(), rest.next()) {
            (Some('e' | 'E'), Some(d), _) if d.is_ascii_digit() => 1,
            (Some('e' | 'E'), Some('+' | '-'), Some(d)) if d.is_ascii_digit() => 2,
            _ => 0,
        };
        for _ in 0..exponent {
            self.advance();
        }
        if exponent > 0 {
            self.digits();
        }

        if fraction || exponent > 0 {
            TokenKind::Float
        } else {
            TokenKind::Int
        }
    }

    fn digits(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
    }

    fn whitespace(&mut self) {
        while self.peek().is_whitespace() {
            self.advance();
        }
    }

    fn inline_comment(&mut self) -> TokenKind {
        assert_eq!(self.advance(), '/');
        while !(self.peek() == '\n' || self.is_at_end()) {
            self.advance();
        }
        TokenKind::Comment
    }
}

impl Lexer<'_, '_> {
    /// Constructs a new lexer with the default state.
    fn new<'src, 'tok>(src: &'src str, tokens: &'tok mut Vec<Token>) -> Lexer<'src, 'tok> {
        Lexer {
            src,
            iter: src.chars().peekable(),
            cursor: 0,
            loc: Location::START,
            current_lo: 0,
            current_loc: Location::START,
            tokens,
        }
    }

    /// Starts a new token "mark" and advances the iterator.
    fn mark_advance(&mut self) -> char {
        self.current_lo = self.cursor;
        self.current_loc = self.loc;
        self.advance()
    }

    /// Returns the next character and advances the iterator, keeping track of
    /// the line and column.
    fn advance(&mut self) -> char {
        let Some(c) = self.iter.next() else {
            return '\0';
        };
        self.cursor += c.len_utf8();
        if c == '\n' {
            self.loc.line += 1;
            self.loc.col = 1;
        } else {
            self.loc.col += 1;
        }
        c
    }

    /// Returns the next character without advancing the iterator.
    fn peek(&mut self) -> char {
        self.iter.peek().copied().unwrap_or('\0')
    }

    fn is_at_end(&self) -> bool {
        self.cursor == self.src.len()
    }

    /// Returns the current span.
    fn span(&self) -> Span {
        Span::new_of_bounds(self.current_lo..self.cursor)
    }

    /// Returns the substring of the current marked bounds.
    fn substr(&self) -> &str {
        self.span().substr(self.src)
    }

    /// Produces a token using the marked bounds.
    fn produce(&mut self, kind: TokenKind) {
        let token = Token::new(kind, self.span(), self.current_loc);
        self.tokens.push(token);
    }
}

pub mod extract {
    use super::*;

    pub fn int(token: Token, src: &str) -> Result<i64, ParseIntError> {
        debug_assert_eq!(token.kind, TokenKind::Int);
        token.span().substr(src).parse()
    }

    pub fn float(token: Token, src: &str) -> Result<f64, ParseFloatError> {
        debug_assert_eq!(token.kind, TokenKind::Float);
        token.span().substr(src).parse()
    }

    pub fn ident(token: Token, src: &str) -> &str {
        debug_assert!(matches!(token.kind, TokenKind::Identifier));
        token.span().substr(src)
    }

    pub fn string(token: Token, src: &str) -> Box<str> {
        debug_assert_eq!(token.kind, TokenKind::String);
        Box::from(token.span().offset(1, -1).substr(src))
    }
}
