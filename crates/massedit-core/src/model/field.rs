use crate::value::Value;
use serde::{Deserialize, Serialize};

///
/// FieldDescriptor
///
/// Runtime metadata for one field of a host model. Descriptors are derived
/// on demand from registry metadata, never stored by the engine.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub category: FieldCategory,

    #[serde(default)]
    pub readonly: bool,

    /// Present when the field is a computed value; a computed field without
    /// a setter cannot be bulk-edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed: Option<ComputedSpec>,

    #[serde(default)]
    pub required: bool,

    /// Conditional-visibility rules, opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<serde_json::Value>,

    /// Names of change-triggered side effects on the original edit form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_change: Vec<String>,

    /// Encoded filter expression (a JSON array of clauses).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>, category: FieldCategory) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            category,
            readonly: false,
            computed: None,
            required: false,
            states: None,
            on_change: Vec::new(),
            domain: None,
            default: None,
        }
    }

    #[must_use]
    pub fn scalar(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldCategory::Scalar)
    }

    #[must_use]
    pub fn map(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldCategory::Map)
    }

    #[must_use]
    pub fn selection(
        name: impl Into<String>,
        label: impl Into<String>,
        source: SelectionSource,
    ) -> Self {
        Self::new(name, label, FieldCategory::Selection(source))
    }

    #[must_use]
    pub fn to_many(
        name: impl Into<String>,
        label: impl Into<String>,
        shape: RelationShape,
    ) -> Self {
        Self::new(name, label, FieldCategory::ToMany(shape))
    }

    #[must_use]
    pub fn with_computed(mut self, has_setter: bool) -> Self {
        self.computed = Some(ComputedSpec { has_setter });
        self
    }

    #[must_use]
    pub const fn with_required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn with_readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    #[must_use]
    pub fn with_states(mut self, states: serde_json::Value) -> Self {
        self.states = Some(states);
        self
    }

    #[must_use]
    pub fn with_on_change(mut self, triggers: &[&str]) -> Self {
        self.on_change = triggers.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: serde_json::Value) -> Self {
        self.domain = Some(domain);
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// True when a bulk edit can write through this field. Computed fields
    /// qualify only when they expose a setter.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.computed.as_ref().is_none_or(|spec| spec.has_setter)
    }

    #[must_use]
    pub const fn is_to_many(&self) -> bool {
        matches!(self.category, FieldCategory::ToMany(_))
    }

    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self.category, FieldCategory::Map)
    }

    /// Relation shape, if this field is a to-many relation.
    #[must_use]
    pub const fn relation(&self) -> Option<&RelationShape> {
        match &self.category {
            FieldCategory::ToMany(shape) => Some(shape),
            _ => None,
        }
    }
}

///
/// ComputedSpec
///

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ComputedSpec {
    pub has_setter: bool,
}

///
/// FieldCategory
///
/// Closed union over the supported field shapes. The catalog dispatches on
/// this once; downstream code matches exhaustively instead of re-deriving
/// category checks per call site.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum FieldCategory {
    Scalar,
    Selection(SelectionSource),
    ToMany(RelationShape),
    Map,
}

///
/// SelectionSource
///
/// Fixed enumerations carry their (token, label) pairs inline; dynamic ones
/// name a registry resolver and are materialized at synthesis time.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum SelectionSource {
    Fixed(Vec<(String, String)>),
    Dynamic(String),
}

///
/// RelationShape
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RelationShape {
    /// Target model name.
    pub target: String,
    pub ownership: RelationOwnership,
    /// Explicitly marked as supporting incremental add/remove even when
    /// exclusively owned.
    #[serde(default)]
    pub incremental: bool,
}

impl RelationShape {
    #[must_use]
    pub fn owned(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ownership: RelationOwnership::Owned,
            incremental: false,
        }
    }

    #[must_use]
    pub fn shared(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ownership: RelationOwnership::Shared,
            incremental: false,
        }
    }

    #[must_use]
    pub const fn with_incremental(mut self) -> Self {
        self.incremental = true;
        self
    }

    #[must_use]
    pub const fn is_owned(&self) -> bool {
        matches!(self.ownership, RelationOwnership::Owned)
    }

    /// True when the relation accepts incremental add/remove verbs.
    #[must_use]
    pub const fn supports_incremental(&self) -> bool {
        matches!(self.ownership, RelationOwnership::Shared) || self.incremental
    }
}

///
/// RelationOwnership
///
/// `Owned` sub-records have no existence outside the parent (unlinking
/// deletes them); `Shared` sub-records are merely unlinked.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RelationOwnership {
    Owned,
    Shared,
}

///
/// TESTS
///
