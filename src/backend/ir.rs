//! Recorded instruction stream: modules of functions made of labelled blocks of instructions.

use crate::prelude::*;
use crate::config::{IntValue, DoubleValue};
use crate::shared::types::{Primitive, Type};
use crate::shared::typed_ids::{Reg, FunctionId, BlockId};
use crate::backend::{Arithmetic, Predicate, Cast};

/// An instruction operand.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value {
    /// Result of a previous instruction.
    Reg(Reg),
    Int(IntValue),
    Double(DoubleValue),
    /// Function parameter by index.
    Arg(u32),
}

impl Display for Value {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Reg(reg) => write!(f, "{}", reg),
            Value::Int(value) => write!(f, "{}", value),
            Value::Double(value) => write!(f, "{:?}", value),
            Value::Arg(index) => write!(f, "%arg{}", index),
        }
    }
}

/// Call arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Values(pub Vec<Value>);

impl Display for Values {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Branch target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label(pub String);

impl Display for Label {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Reference to a block of a function recorded by the writer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockRef {
    pub function: FunctionId,
    pub block   : BlockId,
}

impl_instructions! {
    /// Trace comment.
    Comment { text: String } => "; {text}",
    StackAlloc { dst: Reg, ty: Primitive, name: String } => "{dst} = alloca {ty} ; {name}",
    HeapAlloc { dst: Reg, ty: Primitive, name: String } => "{dst} = malloc {ty} ; {name}",
    HeapFree { ptr: Value } => "free {ptr}",
    Load { dst: Reg, ty: Primitive, ptr: Value } => "{dst} = load {ty}, {ptr}",
    Store { value: Value, ptr: Value } => "store {value}, {ptr}",
    Arithmetic { dst: Reg, op: Arithmetic, ty: Primitive, left: Value, right: Value } => "{dst} = {op} {ty} {left}, {right}",
    Compare { dst: Reg, predicate: Predicate, ty: Primitive, left: Value, right: Value } => "{dst} = cmp {predicate} {ty} {left}, {right}",
    Cast { dst: Reg, cast: Cast, value: Value } => "{dst} = {cast} {value}",
    Call { dst: Reg, callee: String, args: Values } => "{dst} = call {callee}({args})",
    [ terminator ]
    Branch { target: Label } => "br {target}",
    [ terminator ]
    CondBranch { cond: Value, then_target: Label, else_target: Label } => "br {cond}, {then_target}, {else_target}",
    [ terminator ]
    Return { value: Value } => "ret {value}",
    [ terminator ]
    Unreachable { } => "unreachable",
}

impl Instruction {
    /// The register defined by this instruction, if any.
    pub fn dst(self: &Self) -> Option<Reg> {
        match self {
            Instruction::StackAlloc { dst, .. }
            | Instruction::HeapAlloc { dst, .. }
            | Instruction::Load { dst, .. }
            | Instruction::Arithmetic { dst, .. }
            | Instruction::Compare { dst, .. }
            | Instruction::Cast { dst, .. }
            | Instruction::Call { dst, .. } => Some(*dst),
            _ => None,
        }
    }
}

/// A labelled sequence of instructions.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub(crate) label        : String,
    pub(crate) instructions : Vec<Instruction>,
}

impl Block {
    pub(crate) fn new(label: String) -> Self {
        Block { label, instructions: Vec::new() }
    }
    pub fn label(self: &Self) -> &str {
        &self.label
    }
    pub fn instructions(self: &Self) -> &[Instruction] {
        &self.instructions
    }
    /// Whether the last instruction is a terminator.
    pub fn is_terminated(self: &Self) -> bool {
        self.instructions.iter().rev().find(|instruction| !instruction.is_comment()).map_or(false, |instruction| instruction.is_terminator())
    }
}

impl Display for Block {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for instruction in &self.instructions {
            writeln!(f, "    {}", instruction)?;
        }
        Ok(())
    }
}

/// A declared function and, if defined, its body.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub(crate) name     : String,
    pub(crate) params   : Vec<Type>,
    pub(crate) ret      : Type,
    pub(crate) blocks   : Vec<Block>,
    pub(crate) registers: usize,
}

impl Function {
    pub fn name(self: &Self) -> &str {
        &self.name
    }
    pub fn params(self: &Self) -> &[Type] {
        &self.params
    }
    pub fn ret(self: &Self) -> Type {
        self.ret
    }
    pub fn blocks(self: &Self) -> &[Block] {
        &self.blocks
    }
    /// Returns the block with the given label.
    pub fn block(self: &Self, label: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.label == label)
    }
    /// Whether the function has no body.
    pub fn is_declaration(self: &Self) -> bool {
        self.blocks.is_empty()
    }
    /// Returns an iterator over the instructions of all blocks in order.
    pub fn instructions(self: &Self) -> impl Iterator<Item = &Instruction> {
        self.blocks.iter().flat_map(|block| block.instructions.iter())
    }
    /// Returns the instruction defining the given register.
    pub fn definition(self: &Self, reg: Reg) -> Option<&Instruction> {
        self.instructions().find(|instruction| instruction.dst() == Some(reg))
    }
}

impl Display for Function {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_declaration() { "declare" } else { "define" };
        write!(f, "{} {} {}(", keyword, self.ret, self.name)?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")?;
        if self.is_declaration() {
            return writeln!(f);
        }
        writeln!(f, " {{")?;
        for block in &self.blocks {
            write!(f, "{}", block)?;
        }
        writeln!(f, "}}")
    }
}

/// All functions recorded by a writer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Module {
    pub(crate) functions: Vec<Function>,
}

impl Module {
    pub fn functions(self: &Self) -> &[Function] {
        &self.functions
    }
    /// Returns the function with the given name.
    pub fn function(self: &Self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name == name)
    }
}

impl Display for Module {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, function) in self.functions.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", function)?;
        }
        Ok(())
    }
}
