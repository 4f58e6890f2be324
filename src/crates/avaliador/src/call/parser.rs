//! Lexer and recursive-descent parser for call expressions.
//!
//! Accepted grammar:
//!
//! ```text
//! call    := IDENT '(' [arg (',' arg)* [',']] ')'
//! arg     := literal | IDENT '=' literal
//! literal := ['+' | '-'] (INT | FLOAT) | STRING | '[' [literal (',' literal)* [',']] ']'
//! ```
//!
//! Anything else (attribute access, nested calls, bare identifiers,
//! arithmetic, tuples, trailing text) is rejected with [`CallError::Parse`].

use super::value::Value;
use super::CallError;

/// A parsed call: function name plus literal arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub function: String,
    pub args: Vec<Value>,
    /// Keyword arguments in source order.
    pub kwargs: Vec<(String, Value)>,
}

impl CallExpression {
    pub fn kwarg(&self, name: &str) -> Option<&Value> {
        self.kwargs.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Equals,
    Dot,
    Plus,
    Minus,
    /// `*`, `/`, `%` and friends; only lexed to report arithmetic clearly.
    Operator(char),
    LBrace,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("identifier '{}'", name),
            Token::Int(i) => format!("number {}", i),
            Token::Float(x) => format!("number {}", x),
            Token::Str(_) => "string literal".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Equals => "'='".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Operator(c) => format!("'{}'", c),
            Token::LBrace => "'{'".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    position: usize,
}

fn parse_error(position: usize, message: impl Into<String>) -> CallError {
    CallError::Parse {
        position,
        message: message.into(),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Spanned>, CallError> {
        let mut tokens = Vec::new();

        while let Some(&(position, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
                continue;
            }

            let token = match c {
                '(' => self.single(Token::LParen),
                ')' => self.single(Token::RParen),
                '[' => self.single(Token::LBracket),
                ']' => self.single(Token::RBracket),
                ',' => self.single(Token::Comma),
                '=' => self.single(Token::Equals),
                '.' if !self.next_is_digit(position) => self.single(Token::Dot),
                '+' => self.single(Token::Plus),
                '-' => self.single(Token::Minus),
                '{' => self.single(Token::LBrace),
                '*' | '/' | '%' | '@' | '&' | '|' | '^' | '~' | '<' | '>' => {
                    self.single(Token::Operator(c))
                }
                '\'' | '"' => self.string(position, c)?,
                c if c.is_ascii_digit() || c == '.' => self.number(position)?,
                c if is_ident_start(c) => self.ident(position),
                other => {
                    return Err(parse_error(
                        position,
                        format!("unexpected character '{}'", other),
                    ))
                }
            };

            tokens.push(Spanned { token, position });
        }

        Ok(tokens)
    }

    fn single(&mut self, token: Token) -> Token {
        self.chars.next();
        token
    }

    fn next_is_digit(&self, position: usize) -> bool {
        self.source[position + 1..]
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_digit())
    }

    fn ident(&mut self, start: usize) -> Token {
        let mut end = start;
        while let Some(&(i, c)) = self.chars.peek() {
            if !is_ident_continue(c) {
                break;
            }
            end = i + c.len_utf8();
            self.chars.next();
        }
        Token::Ident(self.source[start..end].to_string())
    }

    fn number(&mut self, start: usize) -> Result<Token, CallError> {
        let mut end = start;
        let mut is_float = false;
        let mut prev = '\0';

        while let Some(&(i, c)) = self.chars.peek() {
            let accepted = c.is_ascii_digit()
                || c == '_'
                || (c == '.' && !is_float)
                || matches!(c, 'e' | 'E')
                || (matches!(c, '+' | '-') && matches!(prev, 'e' | 'E'));
            if !accepted {
                break;
            }
            if matches!(c, '.' | 'e' | 'E') {
                is_float = true;
            }
            prev = c;
            end = i + c.len_utf8();
            self.chars.next();
        }

        let raw = &self.source[start..end];
        let cleaned: String = raw.chars().filter(|&c| c != '_').collect();

        if let Some(&(i, c)) = self.chars.peek() {
            if is_ident_start(c) {
                return Err(parse_error(i, format!("invalid number literal '{}{}'", raw, c)));
            }
        }

        if is_float {
            cleaned
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| parse_error(start, format!("invalid number literal '{}'", raw)))
        } else {
            cleaned
                .parse::<i64>()
                .map(Token::Int)
                .map_err(|_| parse_error(start, format!("integer literal '{}' out of range", raw)))
        }
    }

    fn string(&mut self, start: usize, quote: char) -> Result<Token, CallError> {
        self.chars.next();
        let mut value = String::new();

        loop {
            let Some((_, c)) = self.chars.next() else {
                return Err(parse_error(start, "unterminated string literal"));
            };

            if c == quote {
                return Ok(Token::Str(value));
            }

            if c == '\\' {
                let Some((i, escaped)) = self.chars.next() else {
                    return Err(parse_error(start, "unterminated string literal"));
                };
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '0' => value.push('\0'),
                    '\\' | '\'' | '"' => value.push(escaped),
                    '\n' => {}
                    other => {
                        return Err(parse_error(i, format!("unsupported escape '\\{}'", other)));
                    }
                }
                continue;
            }

            if c == '\n' {
                return Err(parse_error(start, "unterminated string literal"));
            }

            value.push(c);
        }
    }
}

/// Deepest list nesting accepted in an argument literal.
pub const MAX_LIST_DEPTH: usize = 32;

struct Parser {
    tokens: Vec<Spanned>,
    index: usize,
    end: usize,
    /// Open `[` brackets around the literal being parsed
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|s| &s.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.index + offset).map(|s| &s.token)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.index)
            .map_or(self.end, |s| s.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).map(|s| s.token.clone());
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token, context: &str) -> Result<(), CallError> {
        let position = self.position();
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(parse_error(
                position,
                format!("expected {} {}, found {}", expected.describe(), context, token.describe()),
            )),
            None => Err(parse_error(
                position,
                format!("expected {} {}, found end of input", expected.describe(), context),
            )),
        }
    }

    fn call(&mut self) -> Result<CallExpression, CallError> {
        let position = self.position();
        let function = match self.advance() {
            Some(Token::Ident(name)) => name,
            Some(other) => {
                return Err(parse_error(
                    position,
                    format!("expected a function name, found {}", other.describe()),
                ))
            }
            None => return Err(parse_error(position, "empty input")),
        };

        if self.peek() == Some(&Token::Dot) {
            return Err(parse_error(
                self.position(),
                "attribute access is not allowed; only bare function names can be called",
            ));
        }

        self.expect(Token::LParen, "after function name")?;

        let mut args = Vec::new();
        let mut kwargs: Vec<(String, Value)> = Vec::new();

        while self.peek() != Some(&Token::RParen) {
            let arg_position = self.position();
            let is_keyword = matches!(
                (self.peek(), self.peek_at(1)),
                (Some(Token::Ident(_)), Some(Token::Equals))
            );

            if is_keyword {
                let Some(Token::Ident(name)) = self.advance() else {
                    return Err(parse_error(arg_position, "expected keyword name"));
                };
                self.advance();
                if kwargs.iter().any(|(k, _)| *k == name) {
                    return Err(parse_error(
                        arg_position,
                        format!("keyword argument '{}' repeated", name),
                    ));
                }
                let value = self.literal()?;
                kwargs.push((name, value));
            } else {
                if !kwargs.is_empty() {
                    return Err(parse_error(
                        arg_position,
                        "positional argument follows keyword argument",
                    ));
                }
                args.push(self.literal()?);
            }

            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                }
                Some(Token::RParen) => {}
                Some(Token::Plus | Token::Minus | Token::Operator(_)) => {
                    return Err(parse_error(self.position(), "arithmetic is not allowed in arguments"));
                }
                Some(other) => {
                    let message = format!("expected ',' or ')' after argument, found {}", other.describe());
                    return Err(parse_error(self.position(), message));
                }
                None => {
                    return Err(parse_error(self.position(), "unclosed argument list"));
                }
            }
        }

        self.expect(Token::RParen, "to close the argument list")?;

        if let Some(token) = self.peek() {
            let message = format!("unexpected {} after call expression", token.describe());
            return Err(parse_error(self.position(), message));
        }

        Ok(CallExpression {
            function,
            args,
            kwargs,
        })
    }

    fn literal(&mut self) -> Result<Value, CallError> {
        let position = self.position();
        match self.advance() {
            Some(Token::Int(i)) => Ok(Value::Int(i)),
            Some(Token::Float(x)) => Ok(Value::Float(x)),
            Some(Token::Str(s)) => Ok(Value::Str(s)),
            Some(sign @ (Token::Plus | Token::Minus)) => {
                let negate = sign == Token::Minus;
                match self.advance() {
                    Some(Token::Int(i)) => Ok(Value::Int(if negate { -i } else { i })),
                    Some(Token::Float(x)) => Ok(Value::Float(if negate { -x } else { x })),
                    _ => Err(parse_error(position, "a sign must be followed by a number")),
                }
            }
            Some(Token::LBracket) => {
                if self.depth >= MAX_LIST_DEPTH {
                    return Err(parse_error(position, "list nesting too deep"));
                }
                self.depth += 1;
                let items = self.list_items()?;
                self.depth -= 1;
                Ok(Value::List(items))
            }
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) || self.peek() == Some(&Token::Dot) {
                    Err(parse_error(position, format!("nested expression '{}' is not allowed", name)))
                } else {
                    Err(parse_error(
                        position,
                        format!("identifier '{}' is not a literal", name),
                    ))
                }
            }
            Some(Token::LParen) => Err(parse_error(position, "tuples and parenthesized expressions are not allowed")),
            Some(Token::LBrace) => Err(parse_error(position, "dict and set literals are not allowed")),
            Some(other) => Err(parse_error(
                position,
                format!("expected a literal, found {}", other.describe()),
            )),
            None => Err(parse_error(position, "expected a literal, found end of input")),
        }
    }

    /// Items of a list literal whose `[` was just consumed, up to and
    /// including the closing `]`.
    fn list_items(&mut self) -> Result<Vec<Value>, CallError> {
        let mut items = Vec::new();
        while self.peek() != Some(&Token::RBracket) {
            items.push(self.literal()?);
            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                }
                Some(Token::RBracket) => {}
                Some(Token::Plus | Token::Minus | Token::Operator(_)) => {
                    return Err(parse_error(self.position(), "arithmetic is not allowed in arguments"));
                }
                _ => {
                    return Err(parse_error(self.position(), "expected ',' or ']' in list literal"));
                }
            }
        }
        self.advance();
        Ok(items)
    }
}

/// Parse `text` as exactly one call expression with literal arguments.
///
/// Surrounding whitespace is ignored; anything else outside the call is an
/// error.
pub fn parse_call(text: &str) -> Result<CallExpression, CallError> {
    let tokens = Lexer::new(text).tokenize()?;
    let mut parser = Parser {
        tokens,
        index: 0,
        end: text.len(),
        depth: 0,
    };
    parser.call()
}
