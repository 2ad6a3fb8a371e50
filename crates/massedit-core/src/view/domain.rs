use serde_json::Value as Json;

/// Key marking a filter clause as bound to the single-record edit context.
///
/// Fragile contract, kept for wire compatibility: stored expressions tag
/// contextual sub-expressions with this key, and stripping uses a broad
/// containment match. A clause is dropped when any object anywhere in its
/// subtree carries the key, not only when the clause itself is the marker.
pub const REMOVE_CLAUSE_KEY: &str = "__class__";

/// Drop contextual clauses from an encoded filter expression.
///
/// The expression is a JSON array of clauses; clauses tagged with
/// [`REMOVE_CLAUSE_KEY`] presuppose a single-record edit context that no
/// longer applies, so they are removed. All other clauses are preserved
/// verbatim. Non-array expressions are returned unchanged.
#[must_use]
pub fn strip_marked_clauses(domain: &Json) -> Json {
    let Json::Array(clauses) = domain else {
        return domain.clone();
    };

    Json::Array(
        clauses
            .iter()
            .filter(|clause| !contains_marker(clause))
            .cloned()
            .collect(),
    )
}

fn contains_marker(value: &Json) -> bool {
    match value {
        Json::Object(entries) => {
            entries.contains_key(REMOVE_CLAUSE_KEY) || entries.values().any(contains_marker)
        }
        Json::Array(items) => items.iter().any(contains_marker),
        _ => false,
    }
}

///
/// TESTS
///
