//! Core engine for metadata-driven bulk editing: field catalogs, verb
//! vocabularies, view synthesis, and update translation against host-provided
//! registry and store seams.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod directive;
pub mod error;
pub mod model;
pub mod obs;
pub mod traits;
pub mod translate;
pub mod value;
pub mod verb;
pub mod view;

pub use error::Error;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Maximum number of editable fields rendered on a single notebook page.
///
/// Selections wider than this paginate into alphabetic ranges so the
/// synthesized form stays navigable.
pub const PAGE_FIELDS: usize = 8;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No stores, synthesizers, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        directive::{ActionDirective, ActionVerb, Submission, WriteDirective},
        model::{FieldCategory, FieldDescriptor, ModelDescriptor},
        traits::{Localizer, ModelRegistry, RecordStore},
        value::{RecordId, Value},
    };
}
