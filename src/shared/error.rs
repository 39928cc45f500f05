use crate::frontend::ast::Position;
use crate::frontend::parser::error::ParseError;
use crate::compiler::error::CompileError;

/// An error generated during parsing or lowering.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    ParseError(#[from] ParseError),
    #[error(transparent)]
    CompileError(#[from] CompileError),
}

impl Error {
    /// Compute 1-based line/column number in string.
    pub fn loc(self: &Self, input: &str) -> (u32, u32) {
        self.position().loc(input)
    }
    /// Byte offset the error refers to.
    pub fn position(self: &Self) -> Position {
        match self {
            Self::ParseError(e) => e.position(),
            Self::CompileError(e) => e.position(),
        }
    }
    pub fn as_parse_error(self: &Self) -> Option<&ParseError> {
        match self {
            Self::ParseError(e) => Some(e),
            _ => None,
        }
    }
    pub fn as_compile_error(self: &Self) -> Option<&CompileError> {
        match self {
            Self::CompileError(e) => Some(e),
            _ => None,
        }
    }
}

/// Receives the errors of abandoned top-level items.
pub trait Diagnostics {
    fn report(self: &mut Self, error: Error);
}

impl Diagnostics for Vec<Error> {
    fn report(self: &mut Self, error: Error) {
        self.push(error);
    }
}
