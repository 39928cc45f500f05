use crate::frontend::ast::Position;

/// Represents the various possible parser error-kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("Expected type declaration")]
    ExpectedType,
    #[error("Expected function name in prototype")]
    ExpectedFunctionName,
    #[error("Expected '(' in prototype")]
    ExpectedParamsOpen,
    #[error("Expected param type in prototype")]
    ExpectedParamType,
    #[error("Expected param name in prototype")]
    ExpectedParamName,
    #[error("Expected ')' in prototype")]
    ExpectedParamsClose,
    #[error("Expected ';' in global declaration")]
    ExpectedExternTerminator,
    #[error("Expected '{{' in function")]
    ExpectedFunctionBody,
    #[error("Expected '{{' to open block")]
    ExpectedBlock,
    #[error("Expected '(' after '{0}'")]
    ExpectedConditionOpen(&'static str),
    #[error("Expected ')' after condition")]
    ExpectedConditionClose,
    #[error("Expected statement")]
    ExpectedStatement,
    #[error("Expected ';' after statement")]
    ExpectedTerminator,
    #[error("Expected identifier in declaration")]
    ExpectedIdentifier,
    #[error("Expected '=' in simple statement")]
    ExpectedAssignment,
    #[error("Expected ')'")]
    ExpectedGroupClose,
    #[error("Expected a factor")]
    ExpectedFactor,
    #[error("Expected ')' in callee")]
    ExpectedArgumentsClose,
    #[error("Invalid input")]
    InvalidInput,
}

/// An error reported by the parser (e.g. syntax error).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind}, found {found}")]
pub struct ParseError {
    kind: ParseErrorKind,
    position: Position,
    found: String,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, position: Position, found: String) -> ParseError {
        Self { kind, position, found }
    }
    /// Compute 1-based line/column number in string.
    pub fn loc(self: &Self, input: &str) -> (u32, u32) {
        self.position.loc(input)
    }
    /// The kind of the error.
    pub fn kind(self: &Self) -> &ParseErrorKind {
        &self.kind
    }
    /// Byte offset of the offending token.
    pub fn position(self: &Self) -> Position {
        self.position
    }
    /// Description of the token that was found instead of the expected one.
    pub fn found(self: &Self) -> &str {
        &self.found
    }
}

pub type ParseResult<T = ()> = Result<T, ParseError>;
