use crate::frontend::ast::{Positioned, Position};
use crate::shared::types::Type;
use crate::compiler::ValueType;

/// Represents the various possible compiler error-kinds.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CompileErrorKind {
    #[error("Redeclared variable '{0}'")]
    Redeclared(String),
    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("Unknown function '{0}'")]
    UnknownFunction(String),
    #[error("Incorrect number of arguments for '{name}': expected {expected}, got {given}")]
    ArgumentCount { name: String, expected: usize, given: usize },
    #[error("Incompatible pointer cast from {from} to {to}")]
    IncompatiblePointer { from: ValueType, to: Type },
    #[error("Function '{0}' is already defined")]
    FunctionRedefined(String),
    #[error("Prototype of '{0}' conflicts with a previous declaration")]
    ConflictingPrototype(String),
    #[error("Internal compiler error: {0}")]
    Internal(String),
}

/// An error reported by the compiler.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct CompileError {
    kind: CompileErrorKind,
    position: Position,
}

impl CompileError {
    pub(crate) fn new(item: &dyn Positioned, kind: CompileErrorKind) -> CompileError {
        Self { kind, position: item.position() }
    }
    /// Compute 1-based line/column number in string.
    pub fn loc(self: &Self, input: &str) -> (u32, u32) {
        self.position.loc(input)
    }
    /// The kind of the error.
    pub fn kind(self: &Self) -> &CompileErrorKind {
        &self.kind
    }
    /// Byte offset of the offending AST node.
    pub fn position(self: &Self) -> Position {
        self.position
    }
}

pub type CompileResult<T = ()> = Result<T, CompileError>;

/// Trait to convert an Option to a Result compatible with CompileResult
pub(super) trait OptionToCompileError<T> {
    fn ice_msg(self: Self, message: &str) -> CompileResult<T>;
    fn ice(self: Self) -> CompileResult<T>;
}

impl<T> OptionToCompileError<T> for Option<T> {
    fn ice_msg(self: Self, message: &str) -> CompileResult<T> {
        if let Some(result) = self {
            Ok(result)
        } else {
            #[cfg(feature="ice_panics")]
            panic!("Internal compiler error: {}", message);
            #[cfg(not(feature="ice_panics"))]
            Err(CompileError {
                kind: CompileErrorKind::Internal(message.to_string()),
                position: Position(0),
            })
        }
    }
    fn ice(self: Self) -> CompileResult<T> {
        self.ice_msg("Expectation failed.")
    }
}
