use crate::{
    directive::WriteDirective,
    model::{CatalogError, ModelDescriptor},
    value::{RecordId, Value},
    view::layout::LayoutNode,
};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// ModelRegistry
///
/// Host metadata surface: model lookup, dynamic selection resolution, model
/// defaults, and the base edit layout the synthesizer starts from.
///

pub trait ModelRegistry {
    /// Model lookup by name.
    fn model(&self, name: &str) -> Result<&ModelDescriptor, CatalogError>;

    /// Materialize a dynamically-resolved selection enumeration.
    fn resolve_selection(
        &self,
        model: &str,
        resolver: &str,
    ) -> Result<Vec<(String, String)>, CatalogError>;

    /// Default values for the named fields of a model.
    fn default_values(&self, model: &str, fields: &[String]) -> BTreeMap<String, Value>;

    /// Base edit-form layout for a model. The synthesizer discards everything
    /// except the anchor node, so the default single-anchor form suffices for
    /// hosts without stored layouts.
    fn base_layout(&self, model: &str) -> LayoutNode {
        let _ = model;
        LayoutNode::form([LayoutNode::anchor(crate::view::ANCHOR_ID)])
    }
}

///
/// RecordStore
///
/// Host persistence surface. The engine only reads relation links and map
/// values, saves per-record map merges, and hands over one batch write;
/// querying, transactions, and storage layout stay on the host side.
/// `write_batch` is expected to be atomic: all directives for all targets
/// apply, or none do.
///

pub trait RecordStore {
    /// Identifiers currently linked through a to-many field of one record.
    fn linked_ids(
        &self,
        model: &str,
        record: RecordId,
        field: &str,
    ) -> Result<BTreeSet<RecordId>, HostError>;

    /// Current value of a map field on one record.
    fn read_map(
        &self,
        model: &str,
        record: RecordId,
        field: &str,
    ) -> Result<BTreeMap<String, Value>, HostError>;

    /// Per-record save of a merged map value.
    fn write_map(
        &mut self,
        model: &str,
        record: RecordId,
        field: &str,
        value: BTreeMap<String, Value>,
    ) -> Result<(), HostError>;

    /// Apply one directive map to the whole batch in a single call.
    fn write_batch(
        &mut self,
        model: &str,
        targets: &[RecordId],
        directives: &BTreeMap<String, WriteDirective>,
    ) -> Result<(), HostError>;
}

///
/// HostError
///
/// Failures reported by the host persistence layer. `Unsupported` is
/// surfaced verbatim to the operator and aborts the whole batch.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum HostError {
    #[error("record {record} not found on model '{model}'")]
    RecordNotFound { model: String, record: RecordId },

    #[error("unsupported operation on '{model}.{field}': {message}")]
    Unsupported {
        model: String,
        field: String,
        message: String,
    },
}

///
/// Localizer
///
/// Translation collaborator for verb and page labels. Keys are stable
/// `massedit.*` tokens; a miss falls back to the caller's default text.
///

pub trait Localizer {
    fn text(&self, key: &str) -> Option<String>;
}

///
/// NullLocalizer
///
/// Passthrough localizer: every lookup misses, so defaults apply.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NullLocalizer;

impl Localizer for NullLocalizer {
    fn text(&self, _key: &str) -> Option<String> {
        None
    }
}
