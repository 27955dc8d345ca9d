use super::*;

fn loc() -> Location {
    Location::new("main.uml", 3, 5, "x: uint = 1")
}

#[test]
fn syntax_message_includes_location() {
    let diag = Diagnostic::syntax("unexpected token", loc());
    assert_eq!(diag.to_string(), "main.uml:3:5: unexpected token");
}

#[test]
fn registers_exhausted_lists_every_site() {
    let diag = Diagnostic::RegistersExhausted {
        sites: vec![loc(), Location::new("main.uml", 4, 1, "y: uint = 2")],
    };
    let message = diag.to_string();
    assert!(message.contains("2 register(s)"));
    assert!(message.contains("main.uml:3:5"));
    assert!(message.contains("main.uml:4:1"));
}

#[test]
fn internal_error_is_distinguishable() {
    let diag = Diagnostic::internal("unresolved placeholder at serialization");
    assert!(matches!(diag, Diagnostic::InternalError(_)));
}
