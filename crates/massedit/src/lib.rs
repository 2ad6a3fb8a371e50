//! ## Crate layout
//! - `core`: field catalogs, verb vocabularies, view synthesis, update
//!   translation, and observability counters.
//!
//! The `prelude` module mirrors the vocabulary a host embeds: descriptors,
//! verbs, values, and the registry/store seams.

pub use massedit_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::{Error, PAGE_FIELDS};

///
/// Host Prelude
///

pub mod prelude {
    pub use crate::core::{
        config::{ConfigStore, EditConfig},
        directive::{ActionDirective, ActionVerb, Submission, WriteDirective},
        model::{FieldCategory, FieldDescriptor, ModelDescriptor},
        traits::{Localizer, ModelRegistry, NullLocalizer, RecordStore},
        translate::{apply, translate},
        value::{RecordId, Value},
        verb::verbs_for,
        view::{ViewDescription, synthesize},
    };
}
