use super::*;
use std::collections::HashSet;

#[test]
fn id_normal_usage() {
    let id = Id::try_new("note-1").unwrap();
    assert_eq!(id.as_str(), "note-1");
    assert_eq!(id.to_string(), "note-1");
}

#[test]
fn id_keeps_surrounding_whitespace() {
    let id = Id::try_new(" 17 ").unwrap();
    assert_eq!(id.as_str(), " 17 ");
}

#[test]
fn id_rejects_empty_string() {
    Id::try_new("").unwrap_err();
}

#[test]
fn id_accepts_long_string() {
    let long_string = "a".repeat(300);
    let id = Id::try_new(long_string.clone()).unwrap();
    assert_eq!(id.as_str(), long_string);
}

#[test]
fn generated_ids_are_unique() {
    let ids: HashSet<Id> = (0..1000).map(|_| Id::generate()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn id_serializes_as_plain_string() {
    let id = Id::try_new("xyz").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"xyz\"");

    let parsed: Id = serde_json::from_str("\"xyz\"").unwrap();
    assert_eq!(parsed, id);

    serde_json::from_str::<Id>("\"\"").unwrap_err();
}
