//! AST datastructures and their pretty-printer.
//!
//! Node positions are byte offsets into the source and do not take part in equality: two trees that
//! differ only in where their nodes were found compare equal.

use crate::prelude::*;
use crate::config::{IntValue, DoubleValue};
use crate::shared::{types::Type, compute_position};

/// Byte offset of the first token of a node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(pub usize);

impl Position {
    /// Compute 1-based line/column number in string.
    pub fn loc(self: &Self, input: &str) -> (u32, u32) {
        compute_position(input, self.0)
    }
}

/// An item that knows where it was found in the source.
pub trait Positioned {
    fn position(self: &Self) -> Position;
}

macro_rules! impl_positioned {
    ($( $name:ident ),+) => {
        $(
            impl Positioned for $name {
                fn position(self: &Self) -> Position {
                    self.position
                }
            }
        )+
    }
}

/// Implements equality over the listed fields, leaving out the position.
macro_rules! impl_structural_eq {
    ($name:ident { $( $field:ident ),* }) => {
        impl PartialEq for $name {
            fn eq(self: &Self, other: &Self) -> bool {
                true $( && self.$field == other.$field )*
            }
        }
    }
}

/// A top-level unit.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    Extern(Prototype),
    Function(Function),
}

impl Positioned for Item {
    fn position(self: &Self) -> Position {
        match self {
            Item::Extern(prototype) => prototype.position,
            Item::Function(function) => function.position,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Prototype {
    pub position: Position,
    pub name    : String,
    pub params  : Vec<Param>,
    pub ret     : Type,
}

impl_structural_eq!(Prototype { name, params, ret });

impl Prototype {
    /// Returns the parameter types in declaration order.
    pub fn param_types(self: &Self) -> Vec<Type> {
        self.params.iter().map(|param| param.ty).collect()
    }
    /// Whether the other prototype has the same parameter and return types.
    pub fn same_signature(self: &Self, other: &Prototype) -> bool {
        self.ret == other.ret && self.params.len() == other.params.len() && self.params.iter().zip(other.params.iter()).all(|(a, b)| a.ty == b.ty)
    }
}

#[derive(Clone, Debug)]
pub struct Param {
    pub position: Position,
    pub name    : String,
    pub ty      : Type,
}

impl_structural_eq!(Param { name, ty });

#[derive(Clone, Debug)]
pub struct Function {
    pub position    : Position,
    pub prototype   : Prototype,
    pub body        : Block,
}

impl_structural_eq!(Function { prototype, body });

#[derive(Clone, Debug)]
pub struct Block {
    pub position    : Position,
    pub statements  : Vec<Statement>,
}

impl_structural_eq!(Block { statements });

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Declaration(Declaration),
    Assignment(Assignment),
    Return(Return),
    IfElse(IfElse),
    While(While),
    Block(Block),
}

impl Positioned for Statement {
    fn position(self: &Self) -> Position {
        match self {
            Statement::Declaration(declaration) => declaration.position,
            Statement::Assignment(assignment)   => assignment.position,
            Statement::Return(ret)              => ret.position,
            Statement::IfElse(if_else)          => if_else.position,
            Statement::While(while_loop)        => while_loop.position,
            Statement::Block(block)             => block.position,
        }
    }
}

/// Declares one or more variables of the same type.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub position: Position,
    pub ty      : Type,
    pub names   : Vec<String>,
}

impl_structural_eq!(Declaration { ty, names });

#[derive(Clone, Debug)]
pub struct Assignment {
    pub position: Position,
    pub target  : String,
    pub expr    : Expression,
}

impl_structural_eq!(Assignment { target, expr });

#[derive(Clone, Debug)]
pub struct Return {
    pub position: Position,
    pub expr    : Expression,
}

impl_structural_eq!(Return { expr });

#[derive(Clone, Debug)]
pub struct IfElse {
    pub position    : Position,
    pub cond        : Expression,
    pub if_block    : Block,
    pub else_block  : Block,
}

impl_structural_eq!(IfElse { cond, if_block, else_block });

#[derive(Clone, Debug)]
pub struct While {
    pub position: Position,
    pub cond    : Expression,
    pub block   : Block,
}

impl_structural_eq!(While { cond, block });

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    IntLiteral(IntLiteral),
    DoubleLiteral(DoubleLiteral),
    Variable(Variable),
    BinaryOp(Box<BinaryOp>),
    Call(Call),
}

impl Expression {
    pub fn as_variable(self: &Self) -> Option<&Variable> {
        match self {
            Expression::Variable(variable) => Some(variable),
            _ => None,
        }
    }
    pub fn as_binary_op(self: &Self) -> Option<&BinaryOp> {
        match self {
            Expression::BinaryOp(binary_op) => Some(binary_op),
            _ => None,
        }
    }
    pub fn as_call(self: &Self) -> Option<&Call> {
        match self {
            Expression::Call(call) => Some(call),
            _ => None,
        }
    }
}

impl Positioned for Expression {
    fn position(self: &Self) -> Position {
        match self {
            Expression::IntLiteral(literal)     => literal.position,
            Expression::DoubleLiteral(literal)  => literal.position,
            Expression::Variable(variable)      => variable.position,
            Expression::BinaryOp(binary_op)     => binary_op.position,
            Expression::Call(call)              => call.position,
        }
    }
}

#[derive(Clone, Debug)]
pub struct IntLiteral {
    pub position: Position,
    pub value   : IntValue,
}

impl_structural_eq!(IntLiteral { value });

#[derive(Clone, Debug)]
pub struct DoubleLiteral {
    pub position: Position,
    pub value   : DoubleValue,
}

impl_structural_eq!(DoubleLiteral { value });

#[derive(Clone, Debug)]
pub struct Variable {
    pub position: Position,
    pub name    : String,
}

impl_structural_eq!(Variable { name });

#[derive(Clone, Debug)]
pub struct BinaryOp {
    pub position: Position,
    pub op      : BinaryOperator,
    pub left    : Expression,
    pub right   : Expression,
}

impl_structural_eq!(BinaryOp { op, left, right });

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Less,
}

impl BinaryOperator {
    /// Returns the operator spelled by the given punctuation character.
    pub fn from_char(op: char) -> Option<Self> {
        match op {
            '+' => Some(BinaryOperator::Add),
            '-' => Some(BinaryOperator::Sub),
            '*' => Some(BinaryOperator::Mul),
            '<' => Some(BinaryOperator::Less),
            _   => None,
        }
    }
    pub fn as_char(self: Self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Sub => '-',
            BinaryOperator::Mul => '*',
            BinaryOperator::Less => '<',
        }
    }
}

#[derive(Clone, Debug)]
pub struct Call {
    pub position: Position,
    pub callee  : String,
    pub args    : Vec<Expression>,
}

impl_structural_eq!(Call { callee, args });

impl_positioned!(Prototype, Param, Function, Block, Declaration, Assignment, Return, IfElse, While, IntLiteral, DoubleLiteral, Variable, BinaryOp, Call);

// pretty printing. The output is valid source and parses back into an equal tree.

const INDENT: &str = "    ";

fn write_indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &Block, depth: usize) -> fmt::Result {
    writeln!(f, "{{")?;
    for statement in &block.statements {
        write_statement(f, statement, depth + 1)?;
    }
    write_indent(f, depth)?;
    write!(f, "}}")
}

fn write_statement(f: &mut fmt::Formatter<'_>, statement: &Statement, depth: usize) -> fmt::Result {
    write_indent(f, depth)?;
    match statement {
        Statement::Declaration(declaration) => write!(f, "{}", declaration)?,
        Statement::Assignment(assignment) => write!(f, "{}", assignment)?,
        Statement::Return(ret) => write!(f, "{}", ret)?,
        Statement::IfElse(if_else) => {
            write!(f, "if ({}) ", if_else.cond)?;
            write_block(f, &if_else.if_block, depth)?;
            write!(f, " else ")?;
            write_block(f, &if_else.else_block, depth)?;
        }
        Statement::While(while_loop) => {
            write!(f, "while ({}) ", while_loop.cond)?;
            write_block(f, &while_loop.block, depth)?;
        }
        Statement::Block(block) => write_block(f, block, depth)?,
    }
    writeln!(f)
}

impl Display for Item {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Extern(prototype) => write!(f, "extern {};", prototype),
            Item::Function(function) => write!(f, "{}", function),
        }
    }
}

impl Display for Prototype {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.ret, self.name)?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

impl Display for Param {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

impl Display for Function {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.prototype)?;
        write_block(f, &self.body, 0)
    }
}

impl Display for Block {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_block(f, self, 0)
    }
}

impl Display for Statement {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

impl Display for Declaration {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {};", self.ty, self.names.join(", "))
    }
}

impl Display for Assignment {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {};", self.target, self.expr)
    }
}

impl Display for Return {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "return {};", self.expr)
    }
}

impl Display for IfElse {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if ({}) {} else {}", self.cond, self.if_block, self.else_block)
    }
}

impl Display for While {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "while ({}) {}", self.cond, self.block)
    }
}

impl Display for Expression {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::IntLiteral(literal) => write!(f, "{}", literal),
            Expression::DoubleLiteral(literal) => write!(f, "{}", literal),
            Expression::Variable(variable) => write!(f, "{}", variable.name),
            Expression::BinaryOp(binary_op) => write!(f, "{}", binary_op),
            Expression::Call(call) => write!(f, "{}", call),
        }
    }
}

impl Display for IntLiteral {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // literals wrap on overflow, print the bit pattern so that it lexes back to the same value
        write!(f, "{}", self.value as u32)
    }
}

impl Display for DoubleLiteral {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_infinite() {
            // literals too large for a double lex as infinity, any such digit run lexes back to it
            return write!(f, "1{}.0", "0".repeat(DoubleValue::MAX_10_EXP as usize + 1));
        }
        let digits = format!("{}", self.value);
        if digits.contains('.') {
            write!(f, "{}", digits)
        } else {
            write!(f, "{}.0", digits)
        }
    }
}

impl Display for BinaryOp {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn operand(f: &mut fmt::Formatter<'_>, expression: &Expression) -> fmt::Result {
            match expression {
                Expression::BinaryOp(_) => write!(f, "({})", expression),
                _ => write!(f, "{}", expression),
            }
        }
        operand(f, &self.left)?;
        write!(f, " {} ", self.op.as_char())?;
        operand(f, &self.right)
    }
}

impl Display for Call {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.callee)?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}
