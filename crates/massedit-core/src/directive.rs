use crate::value::{RecordId, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, btree_map};

///
/// ActionVerb
///
/// The operator's chosen bulk operation for one field. Tokens are stable and
/// language-independent; display labels come from the localizer. `Keep` is
/// the empty verb: the field is left untouched and never yields a directive.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionVerb {
    #[default]
    #[serde(rename = "")]
    Keep,
    Set,
    Remove,
    RemoveAll,
    Add,
}

impl ActionVerb {
    /// Stable wire token for this verb.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Keep => "",
            Self::Set => "set",
            Self::Remove => "remove",
            Self::RemoveAll => "remove_all",
            Self::Add => "add",
        }
    }

    #[must_use]
    pub const fn is_keep(self) -> bool {
        matches!(self, Self::Keep)
    }
}

impl std::fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl std::str::FromStr for ActionVerb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Keep),
            "set" => Ok(Self::Set),
            "remove" => Ok(Self::Remove),
            "remove_all" => Ok(Self::RemoveAll),
            "add" => Ok(Self::Add),
            other => Err(UnknownVerb {
                token: other.to_string(),
            }),
        }
    }
}

///
/// UnknownVerb
///

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown action verb token '{token}'")]
pub struct UnknownVerb {
    pub token: String,
}

///
/// ActionDirective
///
/// One submitted (verb, payload) pair for one field.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ActionDirective {
    pub verb: ActionVerb,
    pub payload: Value,
}

impl ActionDirective {
    #[must_use]
    pub const fn new(verb: ActionVerb, payload: Value) -> Self {
        Self { verb, payload }
    }
}

///
/// Submission
///
/// Typed map from field name to its action directive: the whole state carried
/// between the wizard's render and submit steps.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Submission {
    entries: BTreeMap<String, ActionDirective>,
}

impl Submission {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, field: impl Into<String>, verb: ActionVerb, payload: Value) {
        self.entries
            .insert(field.into(), ActionDirective::new(verb, payload));
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, verb: ActionVerb, payload: Value) -> Self {
        self.set(field, verb, payload);
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&ActionDirective> {
        self.entries.get(field)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ActionDirective> {
        self.entries.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<'a> IntoIterator for &'a Submission {
    type Item = (&'a String, &'a ActionDirective);
    type IntoIter = btree_map::Iter<'a, String, ActionDirective>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

///
/// WriteDirective
///
/// Generic write instruction handed to the host persistence layer for one
/// field across the whole batch.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum WriteDirective {
    /// Scalar, selection, or whole-map assignment.
    Assign(Value),
    /// Structured edit of a to-many relation.
    Relation(RelationEdit),
}

///
/// RelationEdit
///
/// Four independent identifier lists plus inline creation payloads. Only
/// `delete` removes sub-records themselves; `remove` merely unlinks, so
/// `delete` is reserved for exclusively-owned relations.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RelationEdit {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub add: BTreeSet<RecordId>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub remove: BTreeSet<RecordId>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub delete: BTreeSet<RecordId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub create: Vec<BTreeMap<String, Value>>,
}

impl RelationEdit {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            add: BTreeSet::new(),
            remove: BTreeSet::new(),
            delete: BTreeSet::new(),
            create: Vec::new(),
        }
    }

    #[must_use]
    pub fn adding(ids: impl IntoIterator<Item = RecordId>) -> Self {
        let mut edit = Self::new();
        edit.add = ids.into_iter().collect();
        edit
    }

    #[must_use]
    pub fn removing(ids: impl IntoIterator<Item = RecordId>) -> Self {
        let mut edit = Self::new();
        edit.remove = ids.into_iter().collect();
        edit
    }

    #[must_use]
    pub fn deleting(ids: impl IntoIterator<Item = RecordId>) -> Self {
        let mut edit = Self::new();
        edit.delete = ids.into_iter().collect();
        edit
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && self.delete.is_empty()
            && self.create.is_empty()
    }
}

///
/// TESTS
///
