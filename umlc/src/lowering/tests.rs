use super::*;

fn lower(source: &str) -> Result<LoweredModule, Diagnostic> {
    let module = umlc_parser::parse(source).expect("fixture must parse");
    lower_module(&module, "test.uml", source)
}

#[test]
fn a_module_with_no_main_is_rejected() {
    let err = lower("def helper() -> uint:\n    return 0\n").unwrap_err();
    assert!(matches!(err, Diagnostic::NoMain));
}

#[test]
fn items_are_returned_in_source_order() {
    let source = "x: uint = 1\ndef main() -> uint:\n    return x\ny: uint = 2\n";
    let lowered = lower(source).unwrap();
    assert_eq!(lowered.items.len(), 3);
    assert!(matches!(lowered.items[0], TopLevelItem::Global(_)));
    assert!(matches!(lowered.items[1], TopLevelItem::Function(_)));
    assert!(matches!(lowered.items[2], TopLevelItem::Global(_)));
}

#[test]
fn the_finalized_main_has_its_real_body_not_a_placeholder() {
    let lowered = lower("def main() -> uint:\n    return 42\n").unwrap();
    assert_eq!(lowered.main.0.body.len(), 1);
}

#[test]
fn a_diagnostic_quotes_the_offending_source_line() {
    let err = lower("def main() -> uint:\n    return missing\n").unwrap_err();
    match err {
        Diagnostic::Name { at, .. } => assert_eq!(at.source_line, "    return missing"),
        other => panic!("expected a name error, got {other:?}"),
    }
}
