use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_nothing_is_set() {
    let cfg = ServerConfig::from_lookup(lookup_from(&[])).expect("config");
    assert_eq!(cfg, ServerConfig::default());
    assert_eq!(cfg.room_capacity, 2);
    assert_eq!(cfg.suggestion, "print('Hello World')");
}

#[test]
fn overrides_are_applied() {
    let cfg = ServerConfig::from_lookup(lookup_from(&[
        ("PORT", "8080"),
        ("ROOM_CAPACITY", "5"),
        ("AUTOCOMPLETE_SUGGESTION", "pass"),
    ]))
    .expect("config");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.room_capacity, 5);
    assert_eq!(cfg.suggestion, "pass");
}

#[test]
fn unparseable_numbers_fall_back_to_defaults() {
    let cfg = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty"), ("ROOM_CAPACITY", "-1")])).expect("config");
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.room_capacity, DEFAULT_ROOM_CAPACITY);
}

#[test]
fn zero_capacity_is_rejected() {
    let err = ServerConfig::from_lookup(lookup_from(&[("ROOM_CAPACITY", "0")])).expect_err("zero capacity");
    assert_eq!(err, ServerConfigError::ZeroCapacity);
}
