use crate::{
    model::{CatalogError, FieldDescriptor},
    traits::ModelRegistry,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, btree_map};
use thiserror::Error as ThisError;

///
/// EditConfig
///
/// Stored definition of which model and fields are eligible for bulk editing,
/// plus an optional menu/action binding. At most one active configuration per
/// model; the store enforces uniqueness.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EditConfig {
    pub model: String,

    /// Ordered chosen field names, always drawn from the model's own field
    /// set (enforced at save time).
    pub fields: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<ActionBinding>,
}

impl EditConfig {
    #[must_use]
    pub fn new(model: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            model: model.into(),
            fields: fields.iter().map(ToString::to_string).collect(),
            binding: None,
        }
    }

    #[must_use]
    pub fn is_chosen(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Display name of a configuration: its target model's label, falling
    /// back to the raw model name when the registry no longer knows it.
    pub fn display_name<R>(&self, registry: &R) -> String
    where
        R: ModelRegistry + ?Sized,
    {
        registry
            .model(&self.model)
            .map_or_else(|_| self.model.clone(), |model| model.label.clone())
    }
}

///
/// ActionBinding
///
/// Menu keyword entry that launches the wizard for this configuration.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionBinding {
    pub keyword: String,
    pub action: String,
}

impl ActionBinding {
    #[must_use]
    pub fn form_action(action: impl Into<String>) -> Self {
        Self {
            keyword: "form_action".to_string(),
            action: action.into(),
        }
    }
}

///
/// ConfigStore
///
/// In-memory configuration registry keyed by model name. Validation runs
/// eagerly at save time so edit sessions never see an invalid selection.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ConfigStore {
    configs: BTreeMap<String, EditConfig>,
}

impl ConfigStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            configs: BTreeMap::new(),
        }
    }

    /// Create a configuration; a second configuration for the same model
    /// fails validation.
    pub fn create<R>(&mut self, registry: &R, config: EditConfig) -> Result<(), ConfigError>
    where
        R: ModelRegistry + ?Sized,
    {
        if self.configs.contains_key(&config.model) {
            return Err(ConfigError::DuplicateModel {
                model: config.model,
            });
        }
        validate(registry, &config)?;
        self.configs.insert(config.model.clone(), config);

        Ok(())
    }

    /// Replace an existing configuration after re-validation. The previous
    /// binding is carried over unless the replacement declares its own.
    pub fn update<R>(&mut self, registry: &R, mut config: EditConfig) -> Result<(), ConfigError>
    where
        R: ModelRegistry + ?Sized,
    {
        let Some(existing) = self.configs.get(&config.model) else {
            return Err(ConfigError::UnknownConfig {
                model: config.model,
            });
        };
        if config.binding.is_none() {
            config.binding = existing.binding.clone();
        }
        validate(registry, &config)?;
        self.configs.insert(config.model.clone(), config);

        Ok(())
    }

    #[must_use]
    pub fn get(&self, model: &str) -> Option<&EditConfig> {
        self.configs.get(model)
    }

    /// Delete a configuration; its binding is detached with it.
    pub fn delete(&mut self, model: &str) -> Option<EditConfig> {
        self.detach_binding(model);
        self.configs.remove(model)
    }

    /// Attach a menu binding; a no-op when one is already attached,
    /// mirroring the idempotent keyword button.
    pub fn attach_binding(&mut self, model: &str, binding: ActionBinding) -> Result<(), ConfigError> {
        let config = self
            .configs
            .get_mut(model)
            .ok_or_else(|| ConfigError::UnknownConfig {
                model: model.to_string(),
            })?;
        if config.binding.is_none() {
            config.binding = Some(binding);
        }

        Ok(())
    }

    /// Detach and return the binding, if any.
    pub fn detach_binding(&mut self, model: &str) -> Option<ActionBinding> {
        self.configs
            .get_mut(model)
            .and_then(|config| config.binding.take())
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, EditConfig> {
        self.configs.values()
    }

    /// Configurations whose model name or display label contains `needle`,
    /// case-insensitively.
    #[must_use]
    pub fn search<R>(&self, registry: &R, needle: &str) -> Vec<&EditConfig>
    where
        R: ModelRegistry + ?Sized,
    {
        let needle = needle.to_lowercase();
        self.configs
            .values()
            .filter(|config| {
                config.model.to_lowercase().contains(&needle)
                    || config.display_name(registry).to_lowercase().contains(&needle)
            })
            .collect()
    }
}

/// Validate one configuration against live model metadata.
pub fn validate<R>(registry: &R, config: &EditConfig) -> Result<(), ConfigError>
where
    R: ModelRegistry + ?Sized,
{
    let model = registry.model(&config.model)?;
    if !model.persistable {
        return Err(ConfigError::NotPersistable {
            model: model.name.clone(),
        });
    }

    for name in &config.fields {
        let field = model.field(name)?;
        if !field.is_writable() {
            return Err(ConfigError::NotWritable {
                model: model.name.clone(),
                field: field.name.clone(),
            });
        }
    }

    Ok(())
}

/// Fields of a model eligible for selection: everything bulk-writable.
pub fn available_fields<'a, R>(
    registry: &'a R,
    model: &str,
) -> Result<Vec<&'a FieldDescriptor>, CatalogError>
where
    R: ModelRegistry + ?Sized,
{
    Ok(registry
        .model(model)?
        .fields
        .iter()
        .filter(|f| f.is_writable())
        .collect())
}

///
/// ConfigError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum ConfigError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("a configuration already exists for model '{model}'")]
    DuplicateModel { model: String },

    #[error("model '{model}' does not support durable storage")]
    NotPersistable { model: String },

    #[error("field '{model}.{field}' is computed without a setter and cannot be bulk-edited")]
    NotWritable { model: String, field: String },

    #[error("no configuration exists for model '{model}'")]
    UnknownConfig { model: String },
}

///
/// TESTS
///
