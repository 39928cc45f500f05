use crate::util::*;

fn labels(function: &Function) -> Vec<&str> {
    function.blocks().iter().map(|block| block.label()).collect()
}

fn last<'a>(function: &'a Function, label: &str) -> &'a Instruction {
    code(block(function, label)).last().copied().unwrap_or_else(|| panic!("Block '{}' is empty", label))
}

fn branch(label: &str) -> Instruction {
    Instruction::Branch { target: Label(label.to_string()) }
}

#[test]
fn if_else_blocks() {
    let module = compile_ok("int f(int a) { if (a < 1) { a = 1; } else { a = 2; } return a; }");
    let f = function(&module, "f");
    assert_eq!(labels(f), vec![ "entry", "then", "else", "ifcont" ]);
    match last(f, "entry") {
        Instruction::CondBranch { cond: Value::Reg(reg), then_target, else_target } => {
            assert!(matches!(f.definition(*reg), Some(Instruction::Compare { predicate: Predicate::Lt, .. })));
            assert_eq!(then_target, &Label("then".to_string()));
            assert_eq!(else_target, &Label("else".to_string()));
        }
        other => panic!("Unexpected terminator {:?}", other),
    }
    assert_eq!(last(f, "then"), &branch("ifcont"));
    assert_eq!(last(f, "else"), &branch("ifcont"));
    assert!(last(f, "ifcont").is_return());
    // comparisons used as conditions are not widened
    assert!(casts(f).is_empty());
}

#[test]
fn missing_else() {
    let module = compile_ok("int f(int a) { if (a < 1) { a = 1; } return a; }");
    let f = function(&module, "f");
    assert_eq!(labels(f), vec![ "entry", "then", "else", "ifcont" ]);
    assert_eq!(code(block(f, "else")), vec![ &branch("ifcont") ]);
}

#[test]
fn int_condition() {
    let module = compile_ok("int f(int a) { if (a) { return 1; } return 0; }");
    let f = function(&module, "f");
    let compare = f.instructions().find(|instruction| instruction.is_compare()).unwrap();
    assert!(matches!(compare, Instruction::Compare { predicate: Predicate::Ne, ty: Primitive::Int, right: Value::Int(0), .. }));
    assert_eq!(last(f, "ifcont"), &Instruction::Return { value: Value::Int(0) });
}

#[test]
fn double_condition() {
    let module = compile_ok("int f(double d) { while (d) { d = d - 1; } return 0; }");
    let f = function(&module, "f");
    let compare = f.instructions().find(|instruction| instruction.is_compare()).unwrap();
    assert!(matches!(compare, Instruction::Compare { predicate: Predicate::Ne, ty: Primitive::Double, right: Value::Double(zero), .. } if *zero == 0.0));
}

#[test]
fn pointer_condition() {
    let module = compile_ok("int f() { Int p; if (p) { } return 0; }");
    let f = function(&module, "f");
    let compare = f.instructions().find(|instruction| instruction.is_compare()).unwrap();
    match compare {
        Instruction::Compare { predicate: Predicate::Ne, ty: Primitive::Int, left: Value::Reg(reg), .. } => {
            assert!(matches!(f.definition(*reg), Some(Instruction::Load { .. })));
        }
        other => panic!("Unexpected comparison {:?}", other),
    }
}

#[test]
fn while_blocks() {
    let module = compile_ok("int f(int n) { int i; i = 0; while (i < n) { i = i + 1; } return i; }");
    let f = function(&module, "f");
    assert_eq!(labels(f), vec![ "entry", "while", "loop", "cont" ]);
    assert_eq!(last(f, "entry"), &branch("while"));
    assert!(matches!(last(f, "while"), Instruction::CondBranch { then_target, else_target, .. } if then_target.0 == "loop" && else_target.0 == "cont"));
    assert_eq!(last(f, "loop"), &branch("while"));
    assert!(last(f, "cont").is_return());
}

#[test]
fn unique_labels() {
    let module = compile_ok("
        int f(int a) {
            if (a) { a = 1; }
            if (a) { a = 2; }
            while (a) { while (a) { a = a - 1; } }
            return a;
        }
    ");
    let f = function(&module, "f");
    assert_eq!(labels(f), vec![ "entry", "then", "else", "ifcont", "then1", "else1", "ifcont1", "while", "loop", "cont", "while1", "loop1", "cont1" ]);
    assert!(matches!(last(f, "ifcont"), Instruction::CondBranch { then_target, .. } if then_target.0 == "then1"));
    assert_eq!(last(f, "loop"), &branch("while1"));
    assert_eq!(last(f, "loop1"), &branch("while1"));
    assert_eq!(last(f, "cont1"), &branch("while"));
}

#[test]
fn both_branches_return() {
    let module = compile_ok("int f(int a) { if (a) { return 1; } else { return 2; } }");
    let f = function(&module, "f");
    assert_eq!(count(f, Instruction::is_branch), 0);
    assert_eq!(last(f, "then"), &Instruction::Return { value: Value::Int(1) });
    assert_eq!(last(f, "else"), &Instruction::Return { value: Value::Int(2) });
    // the merge block is unreachable but still terminated
    assert_eq!(code(block(f, "ifcont")), vec![ &Instruction::Return { value: Value::Int(0) } ]);
}

#[test]
fn return_in_loop() {
    let module = compile_ok("int f(int n) { while (n) { return 1; } return 0; }");
    let f = function(&module, "f");
    assert_eq!(count(f, Instruction::is_branch), 1);
    assert_eq!(last(f, "loop"), &Instruction::Return { value: Value::Int(1) });
}

#[test]
fn statements_after_return() {
    let module = compile_ok("int f() { return 1; int x; x = 2; return x; }");
    let f = function(&module, "f");
    assert_eq!(code(block(f, "entry")), vec![ &Instruction::Return { value: Value::Int(1) } ]);
    assert_eq!(count(f, Instruction::is_stack_alloc), 0);
}

#[test]
fn fall_off_end() {
    let module = compile_ok("int f() { } double g() { int x; }");
    assert_eq!(code(block(function(&module, "f"), "entry")), vec![ &Instruction::Return { value: Value::Int(0) } ]);
    assert_eq!(last(function(&module, "g"), "entry"), &Instruction::Return { value: Value::Double(0.0) });
}

#[test]
fn every_block_is_terminated() {
    let module = compile_ok("
        int f(int n) {
            int i;
            i = 0;
            while (i < n) {
                if (i < 5) {
                    i = i + 2;
                } else if (i < 10) {
                    return i;
                } else {
                    { i = i + 1; }
                }
            }
        }
    ");
    let f = function(&module, "f");
    for block in f.blocks() {
        assert!(block.is_terminated(), "Block '{}' not terminated in\n{}", block.label(), f);
        let terminators = block.instructions().iter().filter(|instruction| instruction.is_terminator()).count();
        assert_eq!(terminators, 1, "Block '{}' has {} terminators", block.label(), terminators);
    }
}
