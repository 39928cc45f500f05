//! Backend that records the instruction stream.

use crate::config::{IntValue, DoubleValue};
use crate::shared::types::{Primitive, Type};
use crate::shared::typed_ids::{Reg, FunctionId, BlockId};
use crate::backend::{Backend, Arithmetic, Predicate, Cast, ir::{self, Value, Values, Label, BlockRef, Instruction}};

/// Records instructions into an [ir::Module].
#[derive(Debug, Default)]
pub struct Writer {
    /// Recorded functions. Discarded functions leave an empty slot so that ids stay valid.
    functions   : Vec<Option<ir::Function>>,
    /// Current insertion block.
    position    : Option<BlockRef>,
}

impl Writer {
    /// Creates a new writer instance.
    pub fn new() -> Self {
        Writer {
            functions   : Vec::new(),
            position    : None,
        }
    }
    /// Returns the recorded function with the given name.
    pub fn function(self: &Self, name: &str) -> Option<&ir::Function> {
        self.functions.iter().flatten().find(|function| function.name == name)
    }
    /// Converts the writer into the recorded module.
    pub fn into_module(self: Self) -> ir::Module {
        ir::Module { functions: self.functions.into_iter().flatten().collect() }
    }
    fn function_mut(self: &mut Self, function_id: FunctionId) -> Option<&mut ir::Function> {
        self.functions.get_mut(function_id.into_usize()).and_then(|function| function.as_mut())
    }
    fn current_block(self: &Self) -> Option<&ir::Block> {
        let BlockRef { function, block } = self.position?;
        self.functions.get(function.into_usize())?.as_ref()?.blocks.get(block.into_usize())
    }
    fn label(self: &Self, target: BlockRef) -> Label {
        let label = self.functions.get(target.function.into_usize())
            .and_then(|function| function.as_ref())
            .and_then(|function| function.blocks.get(target.block.into_usize()))
            .map_or_else(String::new, |block| block.label.clone());
        Label(label)
    }
    /// Allocates a new register in the current function.
    fn next_reg(self: &mut Self) -> Reg {
        let function_id = self.position.map(|position| position.function);
        match function_id.and_then(|function_id| self.function_mut(function_id)) {
            Some(function) => {
                let reg = Reg::new(function.registers);
                function.registers += 1;
                reg
            }
            None => Reg::new(0),
        }
    }
    /// Appends an instruction to the current insertion block.
    fn push(self: &mut Self, instruction: Instruction) {
        debug_assert!(self.position.is_some(), "No insertion block");
        if let Some(BlockRef { function, block }) = self.position {
            if let Some(block) = self.function_mut(function).and_then(|function| function.blocks.get_mut(block.into_usize())) {
                block.instructions.push(instruction);
            }
        }
    }
    /// Appends an instruction defining a new register and returns the register as a value.
    fn push_reg(self: &mut Self, instruction: impl FnOnce(Reg) -> Instruction) -> Value {
        let dst = self.next_reg();
        self.push(instruction(dst));
        Value::Reg(dst)
    }
}

impl Backend for Writer {
    type Value = Value;
    type Block = BlockRef;
    type Function = FunctionId;

    fn const_int(self: &mut Self, value: IntValue) -> Value {
        Value::Int(value)
    }
    fn const_double(self: &mut Self, value: DoubleValue) -> Value {
        Value::Double(value)
    }
    fn build_load(self: &mut Self, ty: Primitive, ptr: Value) -> Value {
        self.push_reg(|dst| Instruction::Load { dst, ty, ptr })
    }
    fn build_store(self: &mut Self, value: Value, ptr: Value) {
        self.push(Instruction::Store { value, ptr });
    }
    fn build_arithmetic(self: &mut Self, op: Arithmetic, ty: Primitive, left: Value, right: Value) -> Value {
        self.push_reg(|dst| Instruction::Arithmetic { dst, op, ty, left, right })
    }
    fn build_compare(self: &mut Self, predicate: Predicate, ty: Primitive, left: Value, right: Value) -> Value {
        self.push_reg(|dst| Instruction::Compare { dst, predicate, ty, left, right })
    }
    fn build_cast(self: &mut Self, cast: Cast, value: Value) -> Value {
        self.push_reg(|dst| Instruction::Cast { dst, cast, value })
    }
    fn build_stack_alloc(self: &mut Self, ty: Primitive, name: &str) -> Value {
        self.push_reg(|dst| Instruction::StackAlloc { dst, ty, name: name.to_string() })
    }
    fn build_heap_alloc(self: &mut Self, ty: Primitive, name: &str) -> Value {
        self.push_reg(|dst| Instruction::HeapAlloc { dst, ty, name: name.to_string() })
    }
    fn build_heap_free(self: &mut Self, ptr: Value) {
        self.push(Instruction::HeapFree { ptr });
    }
    fn append_block(self: &mut Self, function_id: FunctionId, name: &str) -> BlockRef {
        let function = match self.function_mut(function_id) {
            Some(function) => function,
            None => return BlockRef { function: function_id, block: BlockId::new(0) },
        };
        // labels are unique per function: then, then1, then2, ...
        let mut label = name.to_string();
        let mut counter = 0;
        while function.blocks.iter().any(|block| block.label == label) {
            counter += 1;
            label = format!("{}{}", name, counter);
        }
        let block = BlockId::new(function.blocks.len());
        function.blocks.push(ir::Block::new(label));
        BlockRef { function: function_id, block }
    }
    fn build_branch(self: &mut Self, target: BlockRef) {
        let target = self.label(target);
        self.push(Instruction::Branch { target });
    }
    fn build_cond_branch(self: &mut Self, cond: Value, then_block: BlockRef, else_block: BlockRef) {
        let then_target = self.label(then_block);
        let else_target = self.label(else_block);
        self.push(Instruction::CondBranch { cond, then_target, else_target });
    }
    fn build_return(self: &mut Self, value: Value) {
        self.push(Instruction::Return { value });
    }
    fn build_unreachable(self: &mut Self) {
        self.push(Instruction::Unreachable { });
    }
    fn insert_block(self: &Self) -> Option<BlockRef> {
        self.position
    }
    fn position_at_end(self: &mut Self, block: BlockRef) {
        self.position = Some(block);
    }
    fn is_terminated(self: &Self) -> bool {
        self.current_block().map_or(false, |block| block.is_terminated())
    }
    fn declare_function(self: &mut Self, name: &str, params: &[Type], ret: Type) -> FunctionId {
        let function_id = FunctionId::new(self.functions.len());
        self.functions.push(Some(ir::Function {
            name        : name.to_string(),
            params      : params.to_vec(),
            ret         : ret,
            blocks      : Vec::new(),
            registers   : 0,
        }));
        function_id
    }
    fn get_function(self: &Self, name: &str) -> Option<FunctionId> {
        self.functions.iter().position(|function| function.as_ref().map_or(false, |function| function.name == name)).map(FunctionId::new)
    }
    fn function_param(self: &mut Self, _function: FunctionId, index: usize) -> Value {
        Value::Arg(index as u32)
    }
    fn build_call(self: &mut Self, function_id: FunctionId, args: &[Value]) -> Value {
        let callee = self.functions.get(function_id.into_usize())
            .and_then(|function| function.as_ref())
            .map_or_else(String::new, |function| function.name.clone());
        self.push_reg(|dst| Instruction::Call { dst, callee, args: Values(args.to_vec()) })
    }
    fn discard_function(self: &mut Self, function_id: FunctionId) {
        if let Some(slot) = self.functions.get_mut(function_id.into_usize()) {
            *slot = None;
        }
        if self.position.map_or(false, |position| position.function == function_id) {
            self.position = None;
        }
    }
    fn clear_body(self: &mut Self, function_id: FunctionId) {
        if let Some(function) = self.function_mut(function_id) {
            function.blocks.clear();
            function.registers = 0;
        }
        if self.position.map_or(false, |position| position.function == function_id) {
            self.position = None;
        }
    }
    fn comment(self: &mut Self, text: &str) {
        if self.position.is_some() {
            self.push(Instruction::Comment { text: text.to_string() });
        }
    }
}
