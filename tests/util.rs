pub use minic::{compile, Error};
pub use minic::backend::{Writer, Arithmetic, Cast, Predicate, ir::{Module, Function, Block, Instruction, Value, Label}};
pub use minic::types::{Type, Primitive, Reg};
pub use minic::parser::{parse, ParseErrorKind};
pub use minic::compiler::error::CompileErrorKind;

/// Compiles the given source, asserting that no errors were reported.
#[allow(dead_code)]
pub fn compile_ok(source: &str) -> Module {
    let (module, errors) = compile_all(source);
    assert!(errors.is_empty(), "Unexpected errors: {:?}", errors);
    module
}

/// Compiles the given source, returning the module and all reported errors.
#[allow(dead_code)]
pub fn compile_all(source: &str) -> (Module, Vec<Error>) {
    let mut writer = Writer::new();
    let errors = compile(source, &mut writer);
    (writer.into_module(), errors)
}

/// Compiles the given source, asserting that exactly one lowering error was reported, and returns its kind.
#[allow(dead_code)]
pub fn compile_error(source: &str) -> CompileErrorKind {
    let (_, errors) = compile_all(source);
    assert!(errors.len() == 1, "Expected one error, got {:?}", errors);
    match &errors[0] {
        Error::CompileError(error) => error.kind().clone(),
        error => panic!("Expected compile error, got {:?}", error),
    }
}

/// Compiles the given source, asserting that exactly one syntax error was reported, and returns its kind.
#[allow(dead_code)]
pub fn parse_error(source: &str) -> ParseErrorKind {
    match parse(source) {
        Ok(program) => panic!("Expected syntax error, got {:?}", program),
        Err(error) => *error.kind(),
    }
}

/// Returns the named function, panicking if it was not recorded.
#[allow(dead_code)]
pub fn function<'a>(module: &'a Module, name: &str) -> &'a Function {
    module.function(name).unwrap_or_else(|| panic!("Function '{}' not found in\n{}", name, module))
}

/// Returns the named block of a function.
#[allow(dead_code)]
pub fn block<'a>(function: &'a Function, label: &str) -> &'a Block {
    function.block(label).unwrap_or_else(|| panic!("Block '{}' not found in\n{}", label, function))
}

/// Instructions of a block without trace comments.
#[allow(dead_code)]
pub fn code(block: &Block) -> Vec<&Instruction> {
    block.instructions().iter().filter(|instruction| !instruction.is_comment()).collect()
}

/// Counts the instructions of a function matching the predicate.
#[allow(dead_code)]
pub fn count(function: &Function, predicate: fn(&Instruction) -> bool) -> usize {
    function.instructions().filter(|instruction| predicate(instruction)).count()
}

/// Returns the casts of a function in order.
#[allow(dead_code)]
pub fn casts(function: &Function) -> Vec<Cast> {
    function.instructions().filter_map(|instruction| match instruction {
        Instruction::Cast { cast, .. } => Some(*cast),
        _ => None,
    }).collect()
}

/// Returns the register allocated for the named local by a stack or heap allocation.
#[allow(dead_code)]
pub fn storage(function: &Function, name: &str) -> Value {
    function.instructions().find_map(|instruction| match instruction {
        Instruction::StackAlloc { dst, name: local, .. } | Instruction::HeapAlloc { dst, name: local, .. } if local == name => Some(Value::Reg(*dst)),
        _ => None,
    }).unwrap_or_else(|| panic!("No storage for '{}' in\n{}", name, function))
}

/// Returns the pointers released by a function in order.
#[allow(dead_code)]
pub fn frees(function: &Function) -> Vec<Value> {
    function.instructions().filter_map(|instruction| match instruction {
        Instruction::HeapFree { ptr } => Some(*ptr),
        _ => None,
    }).collect()
}
