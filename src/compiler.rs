//! Lowers the AST into typed, block structured instructions through a [Backend].

#[macro_use] mod macros;
pub mod error;
mod scopes;
mod registry;
mod util;

use crate::prelude::*;
use crate::config;
use crate::shared::{types::{Primitive, Type}, error::Diagnostics};
use crate::frontend::{ast::{self, Positioned}, parser::ParsedProgram};
use crate::backend::{Backend, Arithmetic, Predicate};
use scopes::{Local, ScopeFrames};
use registry::Registry;
use error::{CompileError, CompileErrorKind, CompileResult, OptionToCompileError};

/// Type of a lowered value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Double,
    /// Result of a comparison.
    Bool,
    /// Pointer to a heap cell of the given primitive.
    Pointer(Primitive),
}

impl From<Primitive> for ValueType {
    fn from(primitive: Primitive) -> ValueType {
        match primitive {
            Primitive::Int => ValueType::Int,
            Primitive::Double => ValueType::Double,
        }
    }
}

impl From<Type> for ValueType {
    fn from(ty: Type) -> ValueType {
        if ty.is_pointer() {
            ValueType::Pointer(ty.primitive())
        } else {
            ty.primitive().into()
        }
    }
}

impl Display for ValueType {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int => write!(f, "int"),
            ValueType::Double => write!(f, "double"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Pointer(primitive) => write!(f, "{}", Type::pointer_to(*primitive)),
        }
    }
}

/// A backend value along with its type.
#[derive(Copy, Clone, Debug)]
pub struct Typed<V> {
    pub value   : V,
    pub ty      : ValueType,
}

/// The function currently being lowered.
struct CurrentFunction<F> {
    handle  : F,
    ret     : Type,
}

/// Lowering context. Lowers items one at a time; prototypes persist across items.
pub struct Compiler<'b, B> where B: Backend {
    /// Backend receiving the instructions.
    backend     : &'b mut B,
    /// Prototypes and defined functions by name.
    registry    : Registry,
    /// Scope frames of the current function.
    scopes      : ScopeFrames<B::Value>,
    /// Function currently being lowered.
    current     : Option<CurrentFunction<B::Function>>,
    /// Heap cells returned by calls within the current statement, owned until the statement ends.
    temporaries : Vec<B::Value>,
}

/// Lowers a parsed program, reporting every failed item to the given sink.
///
/// A failed item is abandoned and lowering continues with the next one.
/// ```
/// use minic::{parser, compiler, backend::Writer, Error};
///
/// let program = parser::parse("
///     int add(int a, int b) { return a + b; }
///     int main() { int c; c = add(2, 3); return c; }
/// ").unwrap();
/// let mut writer = Writer::new();
/// let mut errors: Vec<Error> = Vec::new();
/// compiler::compile(&program, &mut writer, &mut errors);
/// assert!(errors.is_empty());
/// ```
pub fn compile<B>(program: &ParsedProgram, backend: &mut B, diagnostics: &mut impl Diagnostics) where B: Backend {
    let mut compiler = Compiler::new(backend);
    for item in program {
        if let Err(error) = compiler.compile_item(item) {
            diagnostics.report(error.into());
        }
    }
}

impl<'b, B> Compiler<'b, B> where B: Backend {

    /// Creates a lowering context writing to the given backend.
    pub fn new(backend: &'b mut B) -> Self {
        Compiler {
            backend     : backend,
            registry    : Registry::new(),
            scopes      : ScopeFrames::new(),
            current     : None,
            temporaries : Vec::new(),
        }
    }

    /// Lowers a top-level item.
    pub fn compile_item(self: &mut Self, item: &ast::Item) -> CompileResult {
        match item {
            ast::Item::Extern(prototype) => self.compile_extern(prototype),
            ast::Item::Function(function) => self.compile_function(function).map(|_| ()),
        }
    }

    /// Registers an extern prototype. The backend declaration is created on first use.
    pub fn compile_extern(self: &mut Self, prototype: &ast::Prototype) -> CompileResult {
        self.registry.register(prototype).map_err(|kind| CompileError::new(prototype, kind))
    }

    /// Lowers a function definition. On failure the partially built function is discarded.
    pub fn compile_function(self: &mut Self, function: &ast::Function) -> CompileResult<B::Function> {
        let prototype = &function.prototype;
        if self.registry.is_defined(&prototype.name) {
            return Err(CompileError::new(prototype, CompileErrorKind::FunctionRedefined(prototype.name.clone())));
        }
        self.registry.register(prototype).map_err(|kind| CompileError::new(prototype, kind))?;
        let declared = self.backend.get_function(&prototype.name).is_some();
        let handle = self.function_handle(prototype, &prototype.name)?;
        self.current = Some(CurrentFunction { handle, ret: prototype.ret });
        self.scopes.clear();
        self.temporaries.clear();
        let result = self.compile_function_body(function, handle);
        self.current = None;
        self.scopes.clear();
        self.temporaries.clear();
        match result {
            Ok(()) => {
                self.registry.set_defined(&prototype.name);
                Ok(handle)
            }
            Err(error) => {
                // earlier callers may refer to an existing declaration
                if declared {
                    self.backend.clear_body(handle);
                } else {
                    self.backend.discard_function(handle);
                }
                Err(error)
            }
        }
    }

    /// Returns the backend function for the given name, declaring it from its prototype if necessary.
    fn function_handle(self: &mut Self, item: &dyn Positioned, name: &str) -> CompileResult<B::Function> {
        if let Some(handle) = self.backend.get_function(name) {
            return Ok(handle);
        }
        let prototype = self.registry.get(name).ok_or_else(|| CompileError::new(item, CompileErrorKind::UnknownFunction(name.to_string())))?;
        let params = prototype.param_types();
        let ret = prototype.ret;
        Ok(self.backend.declare_function(name, &params, ret))
    }

    fn compile_function_body(self: &mut Self, function: &ast::Function, handle: B::Function) -> CompileResult {
        let prototype = &function.prototype;
        let entry = self.backend.append_block(handle, config::ENTRY_LABEL);
        self.backend.position_at_end(entry);
        comment!(self, "function {}", prototype);
        self.scopes.push();
        for (index, param) in prototype.params.iter().enumerate() {
            let value = self.backend.function_param(handle, index);
            let storage = if param.ty.is_pointer() {
                value
            } else {
                let storage = self.backend.build_stack_alloc(param.ty.primitive(), &param.name);
                self.backend.build_store(value, storage);
                storage
            };
            self.scopes.declare(&param.name, Local { storage, ty: param.ty, heap: false }).map_err(|kind| CompileError::new(param, kind))?;
        }
        self.compile_statements(&function.body.statements)?;
        // falling off the end
        if !self.backend.is_terminated() {
            let frame = self.scopes.pop().ice()?;
            self.release(frame.heap_handles());
            if prototype.ret.is_pointer() {
                self.backend.build_unreachable();
            } else {
                let zero = self.zero(prototype.ret.primitive());
                self.backend.build_return(zero);
            }
        }
        Ok(())
    }

    // statements

    /// Lowers statements in order. Statements following a return are unreachable and not lowered.
    fn compile_statements(self: &mut Self, statements: &[ast::Statement]) -> CompileResult {
        for (index, statement) in statements.iter().enumerate() {
            if self.backend.is_terminated() {
                comment!(self, "{} unreachable statements", statements.len() - index);
                break;
            }
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    fn compile_statement(self: &mut Self, statement: &ast::Statement) -> CompileResult {
        use ast::Statement as S;
        match statement {
            S::Declaration(declaration) => self.compile_declaration(declaration),
            S::Assignment(assignment) => self.compile_assignment(assignment),
            S::Return(ret) => self.compile_return(ret),
            S::IfElse(if_else) => self.compile_if_else(if_else),
            S::While(while_loop) => self.compile_while(while_loop),
            S::Block(block) => self.compile_block(block),
        }
    }

    /// Lowers a nested block into its own scope.
    fn compile_block(self: &mut Self, block: &ast::Block) -> CompileResult {
        self.scopes.push();
        self.compile_statements(&block.statements)?;
        let frame = self.scopes.pop().ice()?;
        if !self.backend.is_terminated() {
            let handles = frame.heap_handles();
            if !handles.is_empty() {
                comment!(self, "release {} heap cells", handles.len());
            }
            self.release(handles);
        }
        Ok(())
    }

    /// Allocates storage for each declared name.
    fn compile_declaration(self: &mut Self, item: &ast::Declaration) -> CompileResult {
        comment!(self, "{}", item);
        for name in &item.names {
            if self.scopes.is_declared(name) {
                return Err(CompileError::new(item, CompileErrorKind::Redeclared(name.clone())));
            }
            let primitive = item.ty.primitive();
            let (storage, heap) = if item.ty.is_pointer() {
                (self.backend.build_heap_alloc(primitive, name), true)
            } else {
                (self.backend.build_stack_alloc(primitive, name), false)
            };
            self.scopes.declare(name, Local { storage, ty: item.ty, heap }).map_err(|kind| CompileError::new(item, kind))?;
        }
        Ok(())
    }

    /// Stores into a variable. Pointer variables receive the pointee value of another pointer of the same type.
    fn compile_assignment(self: &mut Self, item: &ast::Assignment) -> CompileResult {
        comment!(self, "{}", item);
        let target = self.scopes.resolve(&item.target).map_err(|kind| CompileError::new(item, kind))?;
        let typed = self.compile_expression(&item.expr)?;
        let value = self.coerce_to_type(item, typed, target.ty)?;
        let value = if target.ty.is_pointer() {
            self.backend.build_load(target.ty.primitive(), value)
        } else {
            value
        };
        self.backend.build_store(value, target.storage);
        self.release_temporaries();
        Ok(())
    }

    /// Returns from the current function, releasing every heap cell except the one being returned.
    ///
    /// A pointer result is always a heap cell owned by the caller.
    fn compile_return(self: &mut Self, item: &ast::Return) -> CompileResult {
        comment!(self, "{}", item);
        let ret = self.current.as_ref().map(|current| current.ret).ice_msg("Return outside of function")?;
        let exempt = item.expr.as_variable()
            .and_then(|variable| self.scopes.lookup(&variable.name))
            .filter(|(_, local)| local.heap)
            .map(|(index, _)| index);
        let typed = self.compile_expression(&item.expr)?;
        let mut value = self.coerce_to_type(item, typed, ret)?;
        if ret.is_pointer() {
            if item.expr.as_call().is_some() {
                // the returned cell moves on to our caller
                self.temporaries.pop();
            } else if exempt.is_none() {
                // the caller owns the result, so borrowed pointers are returned as a copy
                value = self.copy_to_heap(ret.primitive(), value);
            }
        }
        self.release_temporaries();
        let except = match (exempt, item.expr.as_variable()) {
            (Some(index), Some(variable)) => Some((index, variable.name.as_str())),
            _ => None,
        };
        let handles = self.scopes.releases(except);
        self.release(handles);
        self.backend.build_return(value);
        Ok(())
    }

    /// Lowers an if/else statement into then, else and merge blocks.
    fn compile_if_else(self: &mut Self, item: &ast::IfElse) -> CompileResult {
        comment!(self, "if ({})", item.cond);
        let handle = self.current_handle()?;
        let cond = self.compile_expression(&item.cond)?;
        let cond = self.condition(cond);
        self.release_temporaries();
        let then_block = self.backend.append_block(handle, config::THEN_LABEL);
        let else_block = self.backend.append_block(handle, config::ELSE_LABEL);
        let merge_block = self.backend.append_block(handle, config::MERGE_LABEL);
        self.backend.build_cond_branch(cond, then_block, else_block);
        self.backend.position_at_end(then_block);
        self.compile_block(&item.if_block)?;
        self.branch_unless_terminated(merge_block);
        self.backend.position_at_end(else_block);
        self.compile_block(&item.else_block)?;
        self.branch_unless_terminated(merge_block);
        self.backend.position_at_end(merge_block);
        Ok(())
    }

    /// Lowers a while loop into condition, body and continuation blocks.
    fn compile_while(self: &mut Self, item: &ast::While) -> CompileResult {
        comment!(self, "while ({})", item.cond);
        let handle = self.current_handle()?;
        let cond_block = self.backend.append_block(handle, config::WHILE_LABEL);
        let loop_block = self.backend.append_block(handle, config::LOOP_LABEL);
        let cont_block = self.backend.append_block(handle, config::CONT_LABEL);
        self.branch_unless_terminated(cond_block);
        self.backend.position_at_end(cond_block);
        let cond = self.compile_expression(&item.cond)?;
        let cond = self.condition(cond);
        self.release_temporaries();
        self.backend.build_cond_branch(cond, loop_block, cont_block);
        self.backend.position_at_end(loop_block);
        self.compile_block(&item.block)?;
        self.branch_unless_terminated(cond_block);
        self.backend.position_at_end(cont_block);
        Ok(())
    }

    fn current_handle(self: &Self) -> CompileResult<B::Function> {
        self.current.as_ref().map(|current| current.handle).ice_msg("No current function")
    }

    fn branch_unless_terminated(self: &mut Self, target: B::Block) {
        if !self.backend.is_terminated() {
            self.backend.build_branch(target);
        }
    }

    // expressions

    /// Lowers an expression. Pointer variables yield the pointer itself, not the pointee.
    pub(crate) fn compile_expression(self: &mut Self, item: &ast::Expression) -> CompileResult<Typed<B::Value>> {
        use ast::Expression as E;
        match item {
            E::IntLiteral(literal) => Ok(Typed { value: self.backend.const_int(literal.value), ty: ValueType::Int }),
            E::DoubleLiteral(literal) => Ok(Typed { value: self.backend.const_double(literal.value), ty: ValueType::Double }),
            E::Variable(variable) => self.compile_variable(variable),
            E::BinaryOp(binary_op) => self.compile_binary_op(binary_op),
            E::Call(call) => self.compile_call(call),
        }
    }

    fn compile_variable(self: &mut Self, item: &ast::Variable) -> CompileResult<Typed<B::Value>> {
        let local = self.scopes.resolve(&item.name).map_err(|kind| CompileError::new(item, kind))?;
        if local.ty.is_pointer() {
            Ok(Typed { value: local.storage, ty: local.ty.into() })
        } else {
            let primitive = local.ty.primitive();
            Ok(Typed { value: self.backend.build_load(primitive, local.storage), ty: primitive.into() })
        }
    }

    /// Lowers both operands, widening to double if either is double.
    fn compile_binary_op(self: &mut Self, item: &ast::BinaryOp) -> CompileResult<Typed<B::Value>> {
        let left = self.compile_expression(&item.left)?;
        let right = self.compile_expression(&item.right)?;
        let (left, left_primitive) = self.to_primitive(left);
        let (right, right_primitive) = self.to_primitive(right);
        let primitive = if left_primitive == Primitive::Double || right_primitive == Primitive::Double {
            Primitive::Double
        } else {
            Primitive::Int
        };
        let left = self.coerce(Typed { value: left, ty: left_primitive.into() }, primitive);
        let right = self.coerce(Typed { value: right, ty: right_primitive.into() }, primitive);
        let arithmetic = match item.op {
            ast::BinaryOperator::Add => Arithmetic::Add,
            ast::BinaryOperator::Sub => Arithmetic::Sub,
            ast::BinaryOperator::Mul => Arithmetic::Mul,
            ast::BinaryOperator::Less => {
                let value = self.backend.build_compare(Predicate::Lt, primitive, left, right);
                return Ok(Typed { value, ty: ValueType::Bool });
            }
        };
        let value = self.backend.build_arithmetic(arithmetic, primitive, left, right);
        Ok(Typed { value, ty: primitive.into() })
    }

    /// Lowers a call, coercing each argument to its declared parameter type.
    /// A returned heap cell becomes a temporary of the current statement.
    fn compile_call(self: &mut Self, item: &ast::Call) -> CompileResult<Typed<B::Value>> {
        let prototype = self.registry.get(&item.callee).ok_or_else(|| CompileError::new(item, CompileErrorKind::UnknownFunction(item.callee.clone())))?;
        let param_types = prototype.param_types();
        let ret = prototype.ret;
        if param_types.len() != item.args.len() {
            return Err(CompileError::new(item, CompileErrorKind::ArgumentCount {
                name    : item.callee.clone(),
                expected: param_types.len(),
                given   : item.args.len(),
            }));
        }
        let mut args = Vec::with_capacity(item.args.len());
        for (arg, &ty) in item.args.iter().zip(param_types.iter()) {
            let typed = self.compile_expression(arg)?;
            args.push(self.coerce_to_type(arg, typed, ty)?);
        }
        let handle = self.function_handle(item, &item.callee)?;
        let value = self.backend.build_call(handle, &args);
        if ret.is_pointer() {
            self.temporaries.push(value);
        }
        Ok(Typed { value, ty: ret.into() })
    }
}
