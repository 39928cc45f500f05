use crate::util::*;
use minic::{compile_with, compile_program, Diagnostics};

#[test]
fn stray_token() {
    let source = "; int f() { return 1; }";
    let (module, errors) = compile_all(source);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].as_parse_error().map(|error| *error.kind()), Some(ParseErrorKind::InvalidInput));
    assert_eq!(errors[0].loc(source), (1, 1));
    assert!(module.function("f").is_some());
}

#[test]
fn syntax_error_skips_item() {
    let (module, errors) = compile_all("int h(int x { return x; }\nint k() { return 1; }");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].as_parse_error().map(|error| *error.kind()), Some(ParseErrorKind::ExpectedParamsClose));
    assert!(module.function("h").is_none());
    assert!(module.function("k").is_some());
}

#[test]
fn syntax_error_skips_body() {
    let (module, errors) = compile_all("int h(int x { int y; while (x) { int z; } return x; }\nint k() { return 1; }");
    assert_eq!(errors.len(), 1, "Unexpected errors: {:?}", errors);
    assert!(module.function("k").is_some());
}

#[test]
fn syntax_error_inside_body() {
    let (module, errors) = compile_all("int h() { int y; y = ; { int z; } return y; } int k() { return 1; }");
    assert_eq!(errors.len(), 1, "Unexpected errors: {:?}", errors);
    assert_eq!(errors[0].as_parse_error().map(|error| *error.kind()), Some(ParseErrorKind::ExpectedFactor));
    assert!(module.function("k").is_some());
}

#[test]
fn errors_in_source_order() {
    let source = "
        int a() { return x; }
        int b( { }
        extern double sqrt(double x);
        double c() { return sqrt(2); }
    ";
    let (module, errors) = compile_all(source);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].as_compile_error().map(|error| error.kind().clone()), Some(CompileErrorKind::UnknownVariable("x".to_string())));
    assert_eq!(errors[1].as_parse_error().map(|error| *error.kind()), Some(ParseErrorKind::ExpectedParamType));
    assert_eq!(errors[0].loc(source), (2, 26));
    assert_eq!(errors[1].loc(source), (3, 16));
    assert!(module.function("c").is_some());
}

#[test]
fn empty_source() {
    let (module, errors) = compile_all("  \n ");
    assert!(errors.is_empty());
    assert!(module.functions().is_empty());
}

#[test]
fn custom_diagnostics() {
    struct Counter(usize);
    impl Diagnostics for Counter {
        fn report(self: &mut Self, _error: Error) {
            self.0 += 1;
        }
    }
    let mut writer = Writer::new();
    let mut counter = Counter(0);
    compile_with("int f() { return y; } int g() { return z; } int h() { return 0; }", &mut writer, &mut counter);
    assert_eq!(counter.0, 2);
    assert!(writer.function("h").is_some());
}

#[test]
fn parsed_program() {
    let program = parse("extern int g(int a); int f() { return g(1); } int e() { return q; }").unwrap();
    let mut writer = Writer::new();
    let errors = compile_program(&program, &mut writer);
    assert_eq!(errors.len(), 1);
    let module = writer.into_module();
    assert!(function(&module, "g").is_declaration());
    assert!(module.function("e").is_none());
}

#[test]
fn module_listing() {
    let module = compile_ok("extern double sqrt(double x); double f(int a) { if (a < 0) { return 0; } return sqrt(a); }");
    let listing = module.to_string();
    assert!(listing.contains("define double f(int) {"));
    assert!(listing.contains("declare double sqrt(double)"));
    assert!(listing.contains(", %then, %else"));
}
