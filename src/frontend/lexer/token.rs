use crate::prelude::*;
use crate::config::{IntValue, DoubleValue};
use crate::shared::types::Type;

/// A single lexical token. Identifiers and literals carry their payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Eof,
    /// One of the type keywords `int`, `double`, `Int`, `Double`.
    Type(Type),
    Extern,
    Return,
    If,
    Else,
    While,
    Identifier(String),
    Int(IntValue),
    Double(DoubleValue),
    /// Any other single character, returned verbatim.
    Char(char),
}

impl Token {
    /// Returns whether the token is the given punctuation character.
    pub fn is_char(self: &Self, c: char) -> bool {
        *self == Token::Char(c)
    }
    /// Returns the reserved word or type keyword token for the given word, if any.
    pub(crate) fn from_keyword(word: &str) -> Option<Token> {
        if let Some(ty) = Type::from_keyword(word) {
            return Some(Token::Type(ty));
        }
        match word {
            "extern"    => Some(Token::Extern),
            "return"    => Some(Token::Return),
            "if"        => Some(Token::If),
            "else"      => Some(Token::Else),
            "while"     => Some(Token::While),
            _           => None,
        }
    }
}

impl Display for Token {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof              => write!(f, "end of input"),
            Token::Type(ty)         => write!(f, "type '{}'", ty),
            Token::Extern           => write!(f, "'extern'"),
            Token::Return           => write!(f, "'return'"),
            Token::If               => write!(f, "'if'"),
            Token::Else             => write!(f, "'else'"),
            Token::While            => write!(f, "'while'"),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::Int(value)       => write!(f, "integer {}", value),
            Token::Double(value)    => write!(f, "double {:?}", value),
            Token::Char(c)          => write!(f, "'{}'", c.escape_default()),
        }
    }
}
