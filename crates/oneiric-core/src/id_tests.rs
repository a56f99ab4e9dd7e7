use super::*;

crate::define_id! {
    pub struct TestId("tst-");
}

#[test]
fn new_ids_carry_the_prefix() {
    let id = TestId::new();
    assert!(id.as_str().starts_with("tst-"));
}

#[test]
fn from_string_round_trips() {
    let id = TestId::from_string("tst-abc123");
    assert_eq!(id.as_str(), "tst-abc123");
    assert_eq!(id.to_string(), "tst-abc123");
}

#[test]
fn ids_are_unique() {
    let a = TestId::new();
    let b = TestId::new();
    assert_ne!(a, b);
}

#[test]
fn idbuf_rejects_oversized_json() {
    let long = "x".repeat(ID_MAX_LEN + 1);
    let json = format!("\"{}\"", long);
    let result: Result<IdBuf, _> = serde_json::from_str(&json);
    assert!(result.is_err());
}
