//! Instruction-construction interface targeted by the compiler, and a recording implementation of it.
//!
//! The compiler lowers the AST exclusively through the [Backend] trait. It never inspects the values
//! it receives from the backend; they are opaque handles that are passed back into later calls.

#[macro_use]
mod macros;
pub mod ir;
mod writer;

use crate::prelude::*;
use crate::config::{IntValue, DoubleValue};
use crate::shared::types::{Primitive, Type};

pub use writer::Writer;

/// Arithmetic operations. The operand type is passed along separately.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arithmetic {
    Add,
    Sub,
    Mul,
}

/// Comparison predicates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// Less than. Integers compare unsigned, doubles unordered.
    Lt,
    /// Not equal, used to test branch conditions against zero.
    Ne,
}

/// Value conversions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cast {
    /// Unsigned int to double.
    IntToDouble,
    /// Double to unsigned int.
    DoubleToInt,
    /// Zero extends a comparison result to int.
    BoolToInt,
}

impl Display for Arithmetic {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arithmetic::Add => write!(f, "add"),
            Arithmetic::Sub => write!(f, "sub"),
            Arithmetic::Mul => write!(f, "mul"),
        }
    }
}

impl Display for Predicate {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Lt => write!(f, "lt"),
            Predicate::Ne => write!(f, "ne"),
        }
    }
}

impl Display for Cast {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cast::IntToDouble => write!(f, "uitofp"),
            Cast::DoubleToInt => write!(f, "fptoui"),
            Cast::BoolToInt => write!(f, "zext"),
        }
    }
}

/// Builds typed, block structured instructions.
///
/// Instructions are appended at the end of the current insertion block, set via `position_at_end`.
pub trait Backend {
    /// A value or storage handle.
    type Value: Copy + Debug;
    /// A basic block.
    type Block: Copy + Debug + PartialEq;
    /// A declared function.
    type Function: Copy + Debug;

    // values

    fn const_int(self: &mut Self, value: IntValue) -> Self::Value;
    fn const_double(self: &mut Self, value: DoubleValue) -> Self::Value;
    /// Loads a value of the given type from a storage handle.
    fn build_load(self: &mut Self, ty: Primitive, ptr: Self::Value) -> Self::Value;
    /// Stores a value into a storage handle.
    fn build_store(self: &mut Self, value: Self::Value, ptr: Self::Value);
    fn build_arithmetic(self: &mut Self, op: Arithmetic, ty: Primitive, left: Self::Value, right: Self::Value) -> Self::Value;
    /// Compares two values of the given type, producing a boolean.
    fn build_compare(self: &mut Self, predicate: Predicate, ty: Primitive, left: Self::Value, right: Self::Value) -> Self::Value;
    fn build_cast(self: &mut Self, cast: Cast, value: Self::Value) -> Self::Value;

    // storage

    /// Allocates stack storage for a value of the given type within the current function.
    fn build_stack_alloc(self: &mut Self, ty: Primitive, name: &str) -> Self::Value;
    /// Allocates heap storage for a value of the given type.
    fn build_heap_alloc(self: &mut Self, ty: Primitive, name: &str) -> Self::Value;
    /// Releases heap storage.
    fn build_heap_free(self: &mut Self, ptr: Self::Value);

    // control flow

    /// Appends a new, empty block to the given function. The name is a label hint.
    fn append_block(self: &mut Self, function: Self::Function, name: &str) -> Self::Block;
    fn build_branch(self: &mut Self, target: Self::Block);
    fn build_cond_branch(self: &mut Self, cond: Self::Value, then_block: Self::Block, else_block: Self::Block);
    fn build_return(self: &mut Self, value: Self::Value);
    fn build_unreachable(self: &mut Self);
    /// The current insertion block.
    fn insert_block(self: &Self) -> Option<Self::Block>;
    /// Moves the insertion point to the end of the given block.
    fn position_at_end(self: &mut Self, block: Self::Block);
    /// Whether the current insertion block already ends with a terminator.
    fn is_terminated(self: &Self) -> bool;

    // functions

    /// Declares a function without body.
    fn declare_function(self: &mut Self, name: &str, params: &[Type], ret: Type) -> Self::Function;
    /// Looks up a previously declared function.
    fn get_function(self: &Self, name: &str) -> Option<Self::Function>;
    /// Returns the value of the parameter at the given index.
    fn function_param(self: &mut Self, function: Self::Function, index: usize) -> Self::Value;
    fn build_call(self: &mut Self, function: Self::Function, args: &[Self::Value]) -> Self::Value;
    /// Erases a function including its partially built body.
    fn discard_function(self: &mut Self, function: Self::Function);
    /// Erases the partially built body of a function, keeping its declaration.
    fn clear_body(self: &mut Self, function: Self::Function);

    /// Attaches a trace comment to the instruction stream.
    fn comment(self: &mut Self, _text: &str) { }
}
