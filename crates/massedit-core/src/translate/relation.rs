use crate::value::RecordId;
use std::collections::BTreeSet;

///
/// RelationDiff
///
/// Add/remove decomposition realizing "set to exactly this list" semantics
/// for a to-many relation.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RelationDiff {
    pub add: BTreeSet<RecordId>,
    pub remove: BTreeSet<RecordId>,
}

/// Diff the union of currently linked ids against the requested set.
///
/// `remove` is everything linked but no longer requested; `add` is the full
/// requested set (re-asserting an existing link is a harmless no-op at the
/// persistence layer). Inline creation payloads never participate: a
/// creation cannot already be a linked id, so the caller keeps them in a
/// separate `create` list. Identifiers are sets — no ordering, no
/// duplicates.
#[must_use]
pub fn diff(existing: &BTreeSet<RecordId>, requested: &BTreeSet<RecordId>) -> RelationDiff {
    RelationDiff {
        add: requested.clone(),
        remove: existing.difference(requested).copied().collect(),
    }
}

///
/// TESTS
///
