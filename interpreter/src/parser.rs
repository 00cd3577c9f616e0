use std::{
    fmt::Display,
    ops::{Deref, RangeInclusive},
    str::Chars,
};

use num::BigInt;

use crate::value::{Expr, Number};

/// Deepest nesting of parentheses, signs and exponents the parser accepts.
pub const MAX_NESTING: usize = 200;
/// Longest token stream the parser accepts.
pub const MAX_TOKENS: usize = 1000;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl Operator {
    /// Single character operators. `**` is recognised by the tokenizer.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '%' => Some(Operator::Rem),
            _ => None,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Add => write!(f, "+"),
            Operator::Sub => write!(f, "-"),
            Operator::Mul => write!(f, "*"),
            Operator::Div => write!(f, "/"),
            Operator::Rem => write!(f, "%"),
            Operator::Pow => write!(f, "**"),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum TokenKind {
    Number(Number),
    Operator(Operator),
    Ctrl(char),
}

#[derive(Debug)]
pub struct Token {
    kind: TokenKind,
    span: RangeInclusive<usize>,
}

impl Deref for Token {
    type Target = TokenKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl From<Number> for TokenKind {
    fn from(num: Number) -> Self {
        TokenKind::Number(num)
    }
}

impl From<Operator> for TokenKind {
    fn from(op: Operator) -> Self {
        TokenKind::Operator(op)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Syntax {
    InvalidNumber,
    UnexpectedChar(char),
}

impl Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Syntax::InvalidNumber => write!(f, "invalid number"),
            Syntax::UnexpectedChar(c) => write!(f, "unexpected character '{c}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error<T> {
    pub err: T,
    pub span: RangeInclusive<usize>,
}

impl<T> Error<T> {
    pub fn new(err: T, span: RangeInclusive<usize>) -> Self {
        Error { err, span }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Error<U> {
        Error {
            err: f(self.err),
            span: self.span,
        }
    }
}

impl<T: Display> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at position {}", self.err, self.span.start() + 1)
    }
}

pub struct TextParser<'a> {
    pos: usize,
    start_pos: usize,
    current: Option<char>,
    iter: Chars<'a>,
    tokens: Vec<Token>,
    errors: Vec<Error<Syntax>>,
}

impl<'a> TextParser<'a> {
    pub fn new(s: &'a str) -> Self {
        let mut iter = s.chars();
        let next = iter.next();
        TextParser {
            pos: 0,
            start_pos: 0,
            current: next,
            iter,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn start(&mut self) {
        self.start_pos = self.pos;
    }

    // `pos` is the index of `current`, or the input length once exhausted.
    fn next(&mut self) -> Option<char> {
        if self.current.is_some() {
            self.pos += 1;
        }
        self.current = self.iter.next();
        self.current
    }

    fn span(&self) -> RangeInclusive<usize> {
        self.start_pos..=self.pos.saturating_sub(1).max(self.start_pos)
    }

    fn token(&mut self, token: impl Into<TokenKind>) {
        let span = self.span();
        self.tokens.push(Token {
            kind: token.into(),
            span,
        });
    }

    fn error(&mut self, kind: Syntax) {
        let span = self.span();
        self.errors.push(Error { err: kind, span });
    }

    fn take_digits(&mut self, text: &mut String) -> bool {
        let mut any = false;
        while let Some(c) = self.current.filter(char::is_ascii_digit) {
            text.push(c);
            any = true;
            self.next();
        }
        any
    }

    fn parse_number(&mut self) {
        let mut text = String::new();
        let mut float = false;
        let mut digits = self.take_digits(&mut text);
        if self.current == Some('.') {
            float = true;
            text.push('.');
            self.next();
            digits |= self.take_digits(&mut text);
        }
        if !digits {
            self.error(Syntax::InvalidNumber);
            return;
        }
        if let Some(e @ ('e' | 'E')) = self.current {
            float = true;
            text.push(e);
            if let Some(sign @ ('+' | '-')) = self.next() {
                text.push(sign);
                self.next();
            }
            if !self.take_digits(&mut text) {
                self.error(Syntax::InvalidNumber);
                return;
            }
        }
        let number = if float {
            text.parse::<f64>().ok().map(Number::Float)
        } else {
            text.parse::<BigInt>().ok().map(Number::Int)
        };
        match number {
            Some(number) => self.token(number),
            None => self.error(Syntax::InvalidNumber),
        }
    }

    fn parse_raw(&mut self) {
        while let Some(current) = self.current {
            if current.is_whitespace() {
                self.next();
                continue;
            }
            self.start();
            if current.is_ascii_digit() || current == '.' {
                self.parse_number();
            } else if let Some(op) = Operator::from_char(current) {
                if op == Operator::Mul && self.next() == Some('*') {
                    self.next();
                    self.token(Operator::Pow);
                } else {
                    if op != Operator::Mul {
                        self.next();
                    }
                    self.token(op);
                }
            } else if current == '(' || current == ')' {
                self.next();
                self.token(TokenKind::Ctrl(current));
            } else {
                self.next();
                self.error(Syntax::UnexpectedChar(current));
            }
        }
    }

    pub fn parse(mut self) -> Result<Vec<Token>, Vec<Error<Syntax>>> {
        self.parse_raw();
        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Parse {
    ExpectedToken(char),
    ExpectedValue,
    UnexpectedToken,
    TooDeep,
    TooLong,
}

impl Display for Parse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Parse::ExpectedToken(c) => write!(f, "expected '{c}'"),
            Parse::ExpectedValue => write!(f, "expected a number or '('"),
            Parse::UnexpectedToken => write!(f, "unexpected token"),
            Parse::TooDeep => write!(f, "nested more than {MAX_NESTING} levels deep"),
            Parse::TooLong => write!(f, "longer than {MAX_TOKENS} tokens"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Full {
    Syntax(Syntax),
    Parse(Parse),
}

impl Display for Full {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Full::Syntax(err) => err.fmt(f),
            Full::Parse(err) => err.fmt(f),
        }
    }
}

/// Recursive descent over the token stream.
///
/// ```text
/// sum     := product (('+' | '-') product)*
/// product := unary (('*' | '/' | '%') unary)*
/// unary   := ('-' | '+') unary | power
/// power   := value ('**' unary)?
/// value   := number | '(' sum ')'
/// ```
///
/// Every recursive step goes through [`TokenParser::nested`], so the depth of
/// the call stack (and of the resulting tree) stays bounded.
#[derive(Debug)]
pub struct TokenParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> TokenParser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) {
        self.pos += 1;
    }

    fn error(&self, kind: Parse) -> Error<Parse> {
        let span = match self.current() {
            Some(token) => token.span.clone(),
            None => {
                let end = self.tokens.last().map(|t| *t.span.end() + 1).unwrap_or(0);
                end..=end
            }
        };
        Error::new(kind, span)
    }

    fn eat_operator(&mut self, ops: &[Operator]) -> Option<Operator> {
        match self.current().map(|token| &token.kind) {
            Some(TokenKind::Operator(op)) if ops.contains(op) => {
                let op = *op;
                self.next();
                Some(op)
            }
            _ => None,
        }
    }

    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Expr, Error<Parse>>,
    ) -> Result<Expr, Error<Parse>> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(Parse::TooDeep));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_sum(&mut self) -> Result<Expr, Error<Parse>> {
        let mut lhs = self.parse_product()?;
        while let Some(op) = self.eat_operator(&[Operator::Add, Operator::Sub]) {
            let rhs = self.parse_product()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_product(&mut self) -> Result<Expr, Error<Parse>> {
        let mut lhs = self.parse_unary()?;
        while let Some(op) = self.eat_operator(&[Operator::Mul, Operator::Div, Operator::Rem]) {
            let rhs = self.parse_unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, Error<Parse>> {
        match self.eat_operator(&[Operator::Sub, Operator::Add]) {
            Some(Operator::Sub) => Ok(Expr::neg(self.nested(Self::parse_unary)?)),
            Some(_) => self.nested(Self::parse_unary),
            None => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, Error<Parse>> {
        let base = self.parse_value()?;
        if self.eat_operator(&[Operator::Pow]).is_some() {
            let exponent = self.nested(Self::parse_unary)?;
            return Ok(Expr::binary(Operator::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_value(&mut self) -> Result<Expr, Error<Parse>> {
        match self.current().map(|token| &token.kind) {
            Some(TokenKind::Number(num)) => {
                let expr = Expr::from(num.clone());
                self.next();
                Ok(expr)
            }
            Some(TokenKind::Ctrl('(')) => {
                self.next();
                let inner = self.nested(Self::parse_sum)?;
                match self.current().map(|token| &token.kind) {
                    Some(TokenKind::Ctrl(')')) => {
                        self.next();
                        Ok(inner)
                    }
                    _ => Err(self.error(Parse::ExpectedToken(')'))),
                }
            }
            _ => Err(self.error(Parse::ExpectedValue)),
        }
    }

    pub fn parse(mut self) -> Result<Expr, Error<Parse>> {
        if let Some(token) = self.tokens.get(MAX_TOKENS) {
            return Err(Error::new(Parse::TooLong, token.span.clone()));
        }
        let expr = self.parse_sum()?;
        if self.current().is_some() {
            return Err(self.error(Parse::UnexpectedToken));
        }
        Ok(expr)
    }
}

pub fn parse_expr(string: &str) -> Result<Expr, Vec<Error<Full>>> {
    let tokens = TextParser::new(string).parse().map_err(|e| {
        e.into_iter()
            .map(|e| e.map(Full::Syntax))
            .collect::<Vec<_>>()
    })?;
    TokenParser::new(&tokens)
        .parse()
        .map_err(|e| vec![e.map(Full::Parse)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(s: &str) -> Number {
        parse_expr(s).unwrap().evaluate().unwrap()
    }

    #[test]
    fn simple_statements() {
        assert_eq!(calc("2 + 3 * 4"), Number::from(14));
        assert_eq!(calc("(2 + 3) * 4"), Number::from(20));
        assert_eq!(calc("10 - 4 - 3"), Number::from(3));
        assert_eq!(calc("2 ** 3 ** 2"), Number::from(512));
        assert_eq!(calc("-2 ** 2"), Number::from(-4));
        assert_eq!(calc("2 ** -1"), Number::Float(0.5));
        assert_eq!(calc("7 % 3 * 2"), Number::from(2));
        assert_eq!(calc("1 / 4"), Number::Float(0.25));
        assert_eq!(calc("2--3"), Number::from(5));
        assert_eq!(calc("+.5 + 1e1"), Number::Float(10.5));
        assert_eq!(calc("2.5e-1"), Number::Float(0.25));
    }

    #[test]
    fn tokens() {
        let tokens = TextParser::new("1.5**(2)").parse().unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| (**t).clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Number(Number::Float(1.5)),
                TokenKind::Operator(Operator::Pow),
                TokenKind::Ctrl('('),
                TokenKind::Number(Number::from(2)),
                TokenKind::Ctrl(')'),
            ]
        );
        assert_eq!(tokens[1].span, 3..=4);
    }

    #[test]
    fn syntax_errors() {
        let err = parse_expr("2 + x").unwrap_err();
        assert_eq!(err[0].err, Full::Syntax(Syntax::UnexpectedChar('x')));
        assert_eq!(err[0].to_string(), "unexpected character 'x' at position 5");

        let err = parse_expr("1e").unwrap_err();
        assert_eq!(err[0].err, Full::Syntax(Syntax::InvalidNumber));
    }

    #[test]
    fn parse_errors() {
        let err = parse_expr("(1 + 2").unwrap_err();
        assert_eq!(err[0].err, Full::Parse(Parse::ExpectedToken(')')));

        let err = parse_expr("3 +").unwrap_err();
        assert_eq!(err[0].err, Full::Parse(Parse::ExpectedValue));

        let err = parse_expr("3 4").unwrap_err();
        assert_eq!(err[0].err, Full::Parse(Parse::UnexpectedToken));

        let err = parse_expr("()").unwrap_err();
        assert_eq!(err[0].err, Full::Parse(Parse::ExpectedValue));
    }

    fn wrapped(open: &str, levels: usize, close: &str) -> String {
        format!("{}1{}", open.repeat(levels), close.repeat(levels))
    }

    #[test]
    fn nesting_limit() {
        assert_eq!(calc(&wrapped("(", 150, ")")), Number::from(1));
        assert_eq!(calc(&wrapped("-", 150, "")), Number::from(1));

        let err = parse_expr(&wrapped("(", 300, ")")).unwrap_err();
        assert_eq!(err[0].err, Full::Parse(Parse::TooDeep));
        assert_eq!(*err[0].span.start(), MAX_NESTING + 1);

        let err = parse_expr(&wrapped("2 ** -", 300, "")).unwrap_err();
        assert_eq!(err[0].err, Full::Parse(Parse::TooDeep));
    }

    #[test]
    fn length_limit() {
        let sum = vec!["1"; 400].join(" + ");
        assert_eq!(calc(&sum), Number::from(400));

        let sum = vec!["1"; 600].join(" + ");
        let err = parse_expr(&sum).unwrap_err();
        assert_eq!(err[0].err, Full::Parse(Parse::TooLong));

        let err = parse_expr(&wrapped("(", 100_000, ")")).unwrap_err();
        assert_eq!(err[0].err, Full::Parse(Parse::TooLong));
        let err = parse_expr(&wrapped("-", 60_000, "")).unwrap_err();
        assert_eq!(err[0].err, Full::Parse(Parse::TooLong));
    }
}
