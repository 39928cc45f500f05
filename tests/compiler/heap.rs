use crate::util::*;

#[test]
fn returned_handle_is_kept() {
    let module = compile_ok("int g() { Int p; Int q; return p; }");
    let g = function(&module, "g");
    assert_eq!(count(g, Instruction::is_heap_alloc), 2);
    assert_eq!(frees(g), vec![ storage(g, "q") ]);
}

#[test]
fn pointer_return() {
    let module = compile_ok("Int g() { Int p; return p; }");
    let g = function(&module, "g");
    assert!(frees(g).is_empty());
    assert_eq!(count(g, Instruction::is_load), 0);
    assert_eq!(code(block(g, "entry")).last(), Some(&&Instruction::Return { value: storage(g, "p") }));
}

#[test]
fn pointer_parameter_return() {
    // the parameter is borrowed, the caller receives a copy it owns
    let module = compile_ok("Double g(Double p) { return p; }");
    let g = function(&module, "g");
    let cell = storage(g, "result");
    let entry = code(block(g, "entry"));
    assert!(matches!(entry[1], Instruction::Load { ptr: Value::Arg(0), ty: Primitive::Double, .. }));
    assert!(matches!(entry[2], Instruction::Store { ptr, .. } if *ptr == cell));
    assert_eq!(entry.last(), Some(&&Instruction::Return { value: cell }));
    assert!(frees(g).is_empty());
}

#[test]
fn returned_cells_are_released_by_caller() {
    let module = compile_ok("
        Int make() { Int p; return p; }
        int main() { Int q; int x; q = make(); x = make(); return 0; }
    ");
    let (make, main) = (function(&module, "make"), function(&module, "main"));
    let allocs = count(make, Instruction::is_heap_alloc) * 2 + count(main, Instruction::is_heap_alloc);
    assert_eq!(allocs, 3);
    assert_eq!(frees(make).len() + frees(main).len(), allocs);
    let results: Vec<_> = main.instructions().filter_map(|instruction| match instruction {
        Instruction::Call { dst, .. } => Some(Value::Reg(*dst)),
        _ => None,
    }).collect();
    assert_eq!(frees(main), vec![ results[0], results[1], storage(main, "q") ]);
}

#[test]
fn returned_cell_released_after_statement() {
    let module = compile_ok("
        Int make() { Int p; return p; }
        int use(Int p) { return p; }
        int main() { int x; x = use(make()) + make(); return x; }
    ");
    let main = function(&module, "main");
    let entry = code(block(main, "entry"));
    let store = entry.iter().position(|instruction| instruction.is_store()).unwrap();
    // both results are released once the value is stored, the last one first
    assert!(entry[..store].iter().all(|instruction| !instruction.is_heap_free()));
    assert_eq!(frees(main).len(), 2);
    assert!(entry[store + 1].is_heap_free() && entry[store + 2].is_heap_free());
}

#[test]
fn returned_cell_in_condition() {
    let module = compile_ok("
        Int make() { Int p; return p; }
        int main() { while (make()) { } if (make() < 1) { } return 0; }
    ");
    let main = function(&module, "main");
    let released = |label: &str| code(block(main, label)).iter().filter(|instruction| instruction.is_heap_free()).count();
    assert_eq!(released("while"), 1);
    assert_eq!(released("entry"), 0);
    assert_eq!(released("cont"), 1);
}

#[test]
fn returned_cell_passed_on() {
    let module = compile_ok("
        Int make() { Int p; return p; }
        Int forward() { return make(); }
        int main() { return forward(); }
    ");
    let forward = function(&module, "forward");
    assert!(frees(forward).is_empty());
    assert_eq!(count(forward, Instruction::is_heap_alloc), 0);
    let main = function(&module, "main");
    assert_eq!(frees(main).len(), 1);
}

#[test]
fn release_on_return() {
    let module = compile_ok("int f() { Int p; Double d; return 0; }");
    let f = function(&module, "f");
    // released in reverse declaration order, before returning
    assert_eq!(frees(f), vec![ storage(f, "d"), storage(f, "p") ]);
    let entry = code(block(f, "entry"));
    assert!(entry[entry.len() - 2].is_heap_free());
}

#[test]
fn release_on_fall_off() {
    let module = compile_ok("int f() { Int p; }");
    let f = function(&module, "f");
    let p = storage(f, "p");
    let entry = code(block(f, "entry"));
    assert_eq!(entry[1..], [ &Instruction::HeapFree { ptr: p }, &Instruction::Return { value: Value::Int(0) } ]);
}

#[test]
fn pointer_fall_off() {
    let module = compile_ok("Double f() { Double p; }");
    let f = function(&module, "f");
    assert_eq!(frees(f), vec![ storage(f, "p") ]);
    assert!(code(block(f, "entry")).last().unwrap().is_unreachable());
}

#[test]
fn release_on_block_exit() {
    let module = compile_ok("int f() { Int a; { Int b; Double c; } return 0; }");
    let f = function(&module, "f");
    assert_eq!(frees(f), vec![ storage(f, "c"), storage(f, "b"), storage(f, "a") ]);
}

#[test]
fn release_on_nested_return() {
    let module = compile_ok("int f() { Int a; { Int b; return 1; } }");
    let f = function(&module, "f");
    assert_eq!(frees(f), vec![ storage(f, "b"), storage(f, "a") ]);
    assert_eq!(count(f, Instruction::is_return), 1);
}

#[test]
fn outer_handle_returned_from_nested_block() {
    let module = compile_ok("Int f() { Int a; { Int b; return a; } }");
    let f = function(&module, "f");
    assert_eq!(frees(f), vec![ storage(f, "b") ]);
}

#[test]
fn shadowed_handle_is_released() {
    let module = compile_ok("Int f() { Int a; { Int a; return a; } }");
    let f = function(&module, "f");
    let allocs: Vec<_> = f.instructions().filter_map(|instruction| instruction.dst().filter(|_| instruction.is_heap_alloc())).map(Value::Reg).collect();
    assert_eq!(allocs.len(), 2);
    // the inner handle is returned, the outer one released
    assert_eq!(frees(f), vec![ allocs[0] ]);
    assert_eq!(code(block(f, "entry")).last(), Some(&&Instruction::Return { value: allocs[1] }));
}

#[test]
fn release_in_loop_body() {
    let module = compile_ok("int f(int n) { while (n) { Int p; n = n - 1; } return 0; }");
    let f = function(&module, "f");
    let body = code(block(f, "loop"));
    assert_eq!(body[body.len() - 2], &Instruction::HeapFree { ptr: storage(f, "p") });
    assert!(frees(f).len() == 1);
}

#[test]
fn release_in_branches() {
    let module = compile_ok("int f(int n) { Int a; if (n) { Int b; return 1; } else { Int c; } return 0; }");
    let f = function(&module, "f");
    let (a, b, c) = (storage(f, "a"), storage(f, "b"), storage(f, "c"));
    let released = |label: &str| code(block(f, label)).iter().filter_map(|instruction| match instruction {
        Instruction::HeapFree { ptr } => Some(*ptr),
        _ => None,
    }).collect::<Vec<_>>();
    assert_eq!(released("then"), vec![ b, a ]);
    assert_eq!(released("else"), vec![ c ]);
    assert_eq!(released("ifcont"), vec![ a ]);
}

#[test]
fn pointer_value_assignment() {
    let module = compile_ok("int f() { Double p, q; p = q; q = p; return 0; }");
    let f = function(&module, "f");
    let (p, q) = (storage(f, "p"), storage(f, "q"));
    // handles are never rebound: each assignment copies the pointee
    let stores: Vec<_> = f.instructions().filter_map(|instruction| match instruction {
        Instruction::Store { value: Value::Reg(reg), ptr } => Some((f.definition(*reg), *ptr)),
        _ => None,
    }).collect();
    assert_eq!(stores.len(), 2);
    assert!(matches!(stores[0], (Some(Instruction::Load { ptr, ty: Primitive::Double, .. }), target) if *ptr == q && target == p));
    assert!(matches!(stores[1], (Some(Instruction::Load { ptr, ty: Primitive::Double, .. }), target) if *ptr == p && target == q));
    assert_eq!(frees(f), vec![ q, p ]);
}

#[test]
fn primitive_into_pointer() {
    assert!(matches!(compile_error("int f() { Int p; p = 1; return 0; }"), CompileErrorKind::IncompatiblePointer { .. }));
    assert!(matches!(compile_error("int f() { Int p; int x; p = x; return 0; }"), CompileErrorKind::IncompatiblePointer { .. }));
    assert!(matches!(compile_error("int f() { Int p; p = p + 1; return 0; }"), CompileErrorKind::IncompatiblePointer { .. }));
}

#[test]
fn primitive_parameters() {
    let module = compile_ok("int f(int a, Int p) { return a; }");
    let f = function(&module, "f");
    assert_eq!(count(f, Instruction::is_stack_alloc), 1);
    assert_eq!(count(f, Instruction::is_heap_alloc), 0);
    assert!(frees(f).is_empty());
}
