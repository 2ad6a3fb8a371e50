pub mod domain;
pub mod layout;
mod synthesize;

pub use domain::{REMOVE_CLAUSE_KEY, strip_marked_clauses};
pub use layout::{LayoutNode, Page, Span};
pub use synthesize::synthesize;

use crate::{
    model::FieldCategory,
    traits::ModelRegistry,
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Id of the marker node locating the insertion point in a base layout.
pub const ANCHOR_ID: &str = "fields";

/// Name prefix of the twin selector pseudo-field synthesized per chosen field.
pub const SELECTOR_PREFIX: &str = "selection_";

/// Selector pseudo-field name for a chosen field.
#[must_use]
pub fn selector_name(field: &str) -> String {
    format!("{SELECTOR_PREFIX}{field}")
}

/// Original field name behind a selector pseudo-field, if `name` is one.
#[must_use]
pub fn selector_target(name: &str) -> Option<&str> {
    name.strip_prefix(SELECTOR_PREFIX)
}

///
/// FieldMeta
///
/// Per-field control description shipped with the synthesized layout.
/// Volatile directives of the original edit form (visibility states,
/// required-ness, change triggers) are already stripped; dynamic selection
/// enumerations are resolved to fixed lists.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FieldMeta {
    pub name: String,
    pub label: String,
    pub category: FieldCategory,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub readonly: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

///
/// ViewDescription
///
/// The synthesizer's output: a fresh layout tree plus the metadata map for
/// every exposed field, selector pseudo-fields included.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ViewDescription {
    pub root: LayoutNode,
    pub fields: BTreeMap<String, FieldMeta>,
}

///
/// ViewCache
///
/// Caller-held layout cache. Synthesized output depends on runtime
/// configuration rather than static view definitions, so any cached entry
/// for a model must be invalidated before re-synthesis; `refresh` does both.
///

#[derive(Clone, Debug, Default)]
pub struct ViewCache {
    entries: BTreeMap<String, ViewDescription>,
}

impl ViewCache {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, model: &str) -> Option<&ViewDescription> {
        self.entries.get(model)
    }

    pub fn insert(&mut self, model: impl Into<String>, view: ViewDescription) {
        self.entries.insert(model.into(), view);
    }

    pub fn invalidate(&mut self, model: &str) -> Option<ViewDescription> {
        self.entries.remove(model)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Default-value resolver for a synthesized view: every selector
/// pseudo-field defaults to the empty verb; everything else is delegated to
/// the target model's own default resolution.
#[must_use]
pub fn default_values<R>(registry: &R, model: &str, fields: &[String]) -> BTreeMap<String, Value>
where
    R: ModelRegistry + ?Sized,
{
    let (selectors, regular): (Vec<_>, Vec<_>) = fields
        .iter()
        .cloned()
        .partition(|name| selector_target(name).is_some());

    let mut values: BTreeMap<String, Value> = selectors
        .into_iter()
        .map(|name| (name, Value::text("")))
        .collect();
    values.extend(registry.default_values(model, &regular));
    values
}

///
/// TESTS
///
