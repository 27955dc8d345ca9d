use super::*;

#[test]
fn an_empty_main_compiles_to_a_well_formed_word_stream() {
    let bytes = compile("def main() -> uint:\n    return 0\n", "a.uml").unwrap();
    assert_eq!(bytes.len() % 4, 0);
    let instructions = isa::deserialize(&bytes).unwrap();
    assert!(matches!(instructions.last().unwrap(), Instruction::LoadProgram { .. }));
}

#[test]
fn missing_main_is_reported() {
    let err = compile("def helper() -> uint:\n    return 0\n", "a.uml").unwrap_err();
    assert!(matches!(err, Diagnostic::NoMain));
}

#[test]
fn a_syntax_error_carries_the_filename() {
    let err = compile("def main(:\n    return 0\n", "broken.uml").unwrap_err();
    match err {
        Diagnostic::Syntax { at, .. } => assert_eq!(at.filename, "broken.uml"),
        other => panic!("expected a syntax diagnostic, got {other:?}"),
    }
}

#[test]
fn a_global_string_iterated_with_putchar_round_trips_through_serialization() {
    let source = "msg: array = \"hi\"\ndef main() -> uint:\n    for c in msg:\n        um.putchar(c)\n    return 0\n";
    let bytes = compile(source, "a.uml").unwrap();
    let instructions = isa::deserialize(&bytes).unwrap();
    let outputs = instructions.iter().filter(|i| matches!(i, Instruction::Output { .. })).count();
    assert_eq!(outputs, 1); // one Output site in the loop body, executed per iteration at runtime
}

#[test]
fn a_call_between_two_functions_compiles_without_error() {
    let source = "def inc(n: uint) -> uint:\n    return n + 1\ndef main() -> uint:\n    return inc(41)\n";
    let bytes = compile(source, "a.uml").unwrap();
    assert!(!bytes.is_empty());
}

#[test]
fn redefining_a_name_is_reported_as_a_name_error() {
    let source = "x: uint = 1\nx: uint = 2\ndef main() -> uint:\n    return x\n";
    let err = compile(source, "a.uml").unwrap_err();
    assert!(matches!(err, Diagnostic::Name { .. }));
}
