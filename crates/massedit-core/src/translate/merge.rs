use crate::value::Value;
use std::collections::BTreeMap;

/// Overlay payload pairs on top of a record's current map value.
///
/// Existing keys absent from the payload are preserved; payload keys win on
/// conflict. This is the per-record half of a map `set`: map fields merge
/// per record instead of being overwritten batch-wide.
pub fn overlay(current: &mut BTreeMap<String, Value>, payload: &BTreeMap<String, Value>) {
    for (key, value) in payload {
        current.insert(key.clone(), value.clone());
    }
}

///
/// TESTS
///
