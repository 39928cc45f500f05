//! Pull based lexer. Tokens are scanned on demand, one at a time.

mod token;
pub use token::Token;

use nom::IResult;
use nom::bytes::complete::take_while;
use nom::character::complete::{satisfy, anychar};
use nom::combinator::recognize;
use nom::sequence::pair;
use crate::config::{IntValue, DoubleValue};
use crate::frontend::ast::Position;
use crate::shared::types::Type;

type Scan<'a, O = &'a str> = IResult<&'a str, O>;

// whitespace (' ', \t, \n, \v, \f, \r)

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

fn whitespace(i: &str) -> Scan<'_> {
    take_while(is_whitespace)(i)
}

// word ([A-Za-z][A-Za-z0-9]*)

fn word(i: &str) -> Scan<'_> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic()),
        take_while(|c: char| c.is_ascii_alphanumeric())
    ))(i)
}

// number ([0-9][0-9.]*)

fn number(i: &str) -> Scan<'_> {
    recognize(pair(
        satisfy(|c| c.is_ascii_digit()),
        take_while(|c: char| c.is_ascii_digit() || c == '.')
    ))(i)
}

/// Converts a run of decimal digits, wrapping around on overflow.
pub(crate) fn int_value(digits: &str) -> IntValue {
    digits.bytes().fold(0 as IntValue, |acc, digit| acc.wrapping_mul(10).wrapping_add((digit - b'0') as IntValue))
}

/// Converts the longest prefix of a number run that contains at most one `.`.
pub(crate) fn double_value(text: &str) -> DoubleValue {
    let end = match text.find('.') {
        Some(dot) => text[dot + 1..].find('.').map_or(text.len(), |second| dot + 1 + second),
        None => text.len(),
    };
    // number runs start with a digit so the prefix is always valid
    text[..end].parse().unwrap_or(0.0)
}

/// Scans tokens from a source string.
pub struct Lexer<'a> {
    source      : &'a str,
    remaining   : &'a str,
    position    : usize,
    last_type   : Option<Type>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of the given source.
    pub fn new(source: &'a str) -> Self {
        Lexer { source, remaining: source, position: 0, last_type: None }
    }

    /// Scans and returns the next token. At the end of the input `Token::Eof` is returned, repeatedly.
    pub fn next_token(self: &mut Self) -> Token {
        if let Ok((remaining, _)) = whitespace(self.remaining) {
            self.remaining = remaining;
        }
        self.position = self.offset();
        if let Ok((remaining, text)) = word(self.remaining) {
            self.remaining = remaining;
            return match Token::from_keyword(text) {
                Some(Token::Type(ty)) => {
                    self.last_type = Some(ty);
                    Token::Type(ty)
                }
                Some(token) => token,
                None => Token::Identifier(text.to_string()),
            };
        }
        if let Ok((remaining, text)) = number(self.remaining) {
            self.remaining = remaining;
            return if text.contains('.') {
                Token::Double(double_value(text))
            } else {
                Token::Int(int_value(text))
            };
        }
        match anychar::<_, nom::error::Error<&str>>(self.remaining) {
            Ok((remaining, c)) => {
                self.remaining = remaining;
                Token::Char(c)
            }
            Err(_) => Token::Eof,
        }
    }

    /// Position of the most recently scanned token.
    pub fn position(self: &Self) -> Position {
        Position(self.position)
    }

    /// The type denoted by the most recently scanned type keyword.
    pub fn last_type(self: &Self) -> Option<Type> {
        self.last_type
    }

    /// Scans the entire source. The returned tokens end with `Token::Eof`.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Self::tokenize_positioned(source).into_iter().map(|(token, _)| token).collect()
    }

    /// Scans the entire source, pairing each token with its position.
    pub fn tokenize_positioned(source: &str) -> Vec<(Token, Position)> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token == Token::Eof;
            tokens.push((token, lexer.position()));
            if done {
                return tokens;
            }
        }
    }

    fn offset(self: &Self) -> usize {
        self.source.len() - self.remaining.len()
    }
}
