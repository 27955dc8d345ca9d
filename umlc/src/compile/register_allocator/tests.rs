use super::*;

fn here() -> Location {
    Location::unknown("test.uml")
}

#[test]
fn occupies_up_to_four_registers() {
    let pool = RegisterPool::new();
    let a = pool.occupy(here()).unwrap();
    let b = pool.occupy(here()).unwrap();
    let c = pool.occupy(here()).unwrap();
    let d = pool.occupy(here()).unwrap();
    assert_eq!(pool.occupied_count(), 4);
    drop((a, b, c, d));
}

#[test]
fn a_fifth_occupation_fails_with_every_outstanding_site() {
    let pool = RegisterPool::new();
    let _a = pool.occupy(Location::new("f.uml", 1, 1, "")).unwrap();
    let _b = pool.occupy(Location::new("f.uml", 2, 1, "")).unwrap();
    let _c = pool.occupy(Location::new("f.uml", 3, 1, "")).unwrap();
    let _d = pool.occupy(Location::new("f.uml", 4, 1, "")).unwrap();

    let err = pool.occupy(Location::new("f.uml", 5, 1, "")).unwrap_err();
    match err {
        Diagnostic::RegistersExhausted { sites } => assert_eq!(sites.len(), 4),
        other => panic!("expected RegistersExhausted, got {other:?}"),
    }
}

#[test]
fn releasing_a_handle_frees_its_register_for_reuse() {
    let pool = RegisterPool::new();
    let a = pool.occupy(here()).unwrap();
    let b = pool.occupy(here()).unwrap();
    let c = pool.occupy(here()).unwrap();
    let d = pool.occupy(here()).unwrap();
    drop(a);
    assert_eq!(pool.occupied_count(), 3);
    let e = pool.occupy(here()).unwrap();
    assert_eq!(pool.occupied_count(), 4);
    drop((b, c, d, e));
    assert_eq!(pool.occupied_count(), 0);
}
