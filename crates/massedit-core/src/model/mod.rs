pub mod field;

pub use field::{
    ComputedSpec, FieldCategory, FieldDescriptor, RelationOwnership, RelationShape,
    SelectionSource,
};

use crate::traits::ModelRegistry;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ModelDescriptor
///
/// One named persistent record type with its fixed field schema, as reported
/// by the host registry.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub label: String,

    /// Whether the model supports durable storage. Configurations may only
    /// target persistable models.
    #[serde(default = "default_persistable")]
    pub persistable: bool,

    pub fields: Vec<FieldDescriptor>,
}

const fn default_persistable() -> bool {
    true
}

impl ModelDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            persistable: true,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub const fn transient(mut self) -> Self {
        self.persistable = false;
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Descriptor lookup; fails fast on unknown fields.
    pub fn field(&self, name: &str) -> Result<&FieldDescriptor, CatalogError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| CatalogError::UnknownField {
                model: self.name.clone(),
                field: name.to_string(),
            })
    }
}

/// Field descriptor catalog entry point: purely a metadata lookup against the
/// host registry, no side effects.
pub fn describe<'a, R>(
    registry: &'a R,
    model: &str,
    field: &str,
) -> Result<&'a FieldDescriptor, CatalogError>
where
    R: ModelRegistry + ?Sized,
{
    registry.model(model)?.field(field)
}

///
/// CatalogError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum CatalogError {
    #[error("unknown field '{field}' on model '{model}'")]
    UnknownField { model: String, field: String },

    #[error("unknown model '{model}'")]
    UnknownModel { model: String },

    #[error("unknown selection resolver '{resolver}' on model '{model}'")]
    UnknownResolver { model: String, resolver: String },
}

///
/// TESTS
///
