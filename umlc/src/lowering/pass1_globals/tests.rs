use super::*;
use crate::ir::Type;

fn parse_and_run(source: &str) -> Result<Pass1Output, Diagnostic> {
    let module = umlc_parser::parse(source).expect("fixture must parse");
    let ctx = SourceContext::new("test.uml", source);
    run(&module, &ctx)
}

#[test]
fn a_uint_global_is_discovered() {
    let output = parse_and_run("greeting: uint = 72\n").unwrap();
    assert_eq!(output.items.len(), 1);
    assert!(output.scope.lookup_global("greeting").is_some());
}

#[test]
fn an_array_global_from_a_string_literal_is_discovered() {
    let output = parse_and_run("msg: array = \"ok\"\n").unwrap();
    let global = output.scope.lookup_global("msg").unwrap();
    assert_eq!(global.ty(), Type::Array);
}

#[test]
fn a_global_with_a_mismatched_initializer_type_is_rejected() {
    let err = parse_and_run("x: array = 5\n").unwrap_err();
    assert!(matches!(err, Diagnostic::Type { .. }));
}

#[test]
fn redefining_a_global_is_rejected() {
    let err = parse_and_run("x: uint = 1\nx: uint = 2\n").unwrap_err();
    assert!(matches!(err, Diagnostic::Name { .. }));
}

#[test]
fn module_scope_assignment_without_annotation_is_rejected() {
    let err = parse_and_run("x = 1\n").unwrap_err();
    assert!(matches!(err, Diagnostic::Syntax { .. }));
}

#[test]
fn a_function_signature_is_recorded_with_its_body_unlowered() {
    let output = parse_and_run("def inc(n: uint) -> uint:\n    return n\n").unwrap();
    assert_eq!(output.functions.len(), 1);
    let def = &output.functions[0].def;
    assert_eq!(def.name(), "inc");
    assert_eq!(def.return_type(), Type::Uint);
}

#[test]
fn a_missing_parameter_annotation_is_rejected() {
    let err = parse_and_run("def inc(n) -> uint:\n    return n\n").unwrap_err();
    assert!(matches!(err, Diagnostic::Syntax { .. }));
}

#[test]
fn a_variadic_parameter_is_rejected() {
    let err = parse_and_run("def f(*args) -> void:\n    return\n").unwrap_err();
    assert!(matches!(err, Diagnostic::Syntax { .. }));
}

#[test]
fn two_functions_can_reference_each_other_by_name_regardless_of_order() {
    let output = parse_and_run(
        "def a(n: uint) -> uint:\n    return b(n)\ndef b(n: uint) -> uint:\n    return n\n",
    )
    .unwrap();
    assert!(output.scope.lookup_function("a").is_some());
    assert!(output.scope.lookup_function("b").is_some());
}
