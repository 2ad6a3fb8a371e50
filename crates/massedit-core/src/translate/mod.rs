pub mod merge;
pub mod relation;

pub use relation::{RelationDiff, diff};

use crate::{
    directive::{ActionVerb, RelationEdit, Submission, WriteDirective},
    model::{CatalogError, FieldCategory, FieldDescriptor},
    obs,
    traits::{HostError, ModelRegistry, RecordStore},
    value::{RecordId, Value},
    verb,
};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// Translation
///
/// The translator's output: one generic write directive per edited field,
/// plus the count of map-field merges already applied record-by-record.
///

#[derive(Clone, Debug, Default)]
pub struct Translation {
    pub directives: BTreeMap<String, WriteDirective>,
    pub merged_records: u64,
}

/// Convert one submission into write directives for the target batch.
///
/// Dispatches each action directive once on (field category, verb). Map
/// `set` is not batched: the payload is overlaid onto every target record's
/// current value and saved immediately through the store, so no generic
/// directive is produced for that field. The empty verb never contributes
/// anything.
pub fn translate<S, R>(
    store: &mut S,
    registry: &R,
    model: &str,
    targets: &[RecordId],
    submission: &Submission,
) -> Result<Translation, TranslateError>
where
    S: RecordStore + ?Sized,
    R: ModelRegistry + ?Sized,
{
    obs::record_translate();

    let descriptor_model = registry.model(model)?;
    let mut translation = Translation::default();

    for (field, action) in submission {
        if action.verb.is_keep() {
            continue;
        }
        let descriptor = descriptor_model.field(field)?;

        // Typed submissions can bypass the synthesized form, so the verb
        // catalog's vocabulary rule is re-checked here before dispatch.
        if !verb::verb_allowed(&descriptor.category, action.verb) {
            return Err(TranslateError::VerbNotAllowed {
                field: field.clone(),
                verb: action.verb,
            });
        }

        let directive = match (&descriptor.category, action.verb) {
            (FieldCategory::Scalar | FieldCategory::Selection(_), ActionVerb::Set) => {
                Some(WriteDirective::Assign(action.payload.clone()))
            }
            (FieldCategory::Scalar | FieldCategory::Selection(_), ActionVerb::Remove) => {
                Some(WriteDirective::Assign(Value::Null))
            }
            (FieldCategory::Map, ActionVerb::Set) => {
                let payload = action.payload.as_map().ok_or_else(|| {
                    TranslateError::InvalidPayload {
                        field: field.clone(),
                        expected: "map of key/value pairs",
                    }
                })?;
                for target in targets {
                    let mut current = store.read_map(model, *target, field)?;
                    merge::overlay(&mut current, payload);
                    store.write_map(model, *target, field, current)?;
                    obs::record_map_merge();
                    translation.merged_records += 1;
                }
                None
            }
            (FieldCategory::Map, ActionVerb::Remove) => {
                Some(WriteDirective::Assign(Value::empty_map()))
            }
            (FieldCategory::ToMany(shape), ActionVerb::Set) => {
                let (requested, creations) =
                    split_relation_payload(registry, field, &shape.target, &action.payload)?;
                let existing = linked_union(store, model, targets, field)?;
                // The id list is the requested final link set even when it is
                // empty: a creations-only payload unlinks every currently
                // linked id and keeps only the fresh records.
                let diff = relation::diff(&existing, &requested);

                let edit = RelationEdit {
                    add: diff.add,
                    remove: diff.remove,
                    delete: BTreeSet::new(),
                    create: creations,
                };
                (!edit.is_empty()).then_some(WriteDirective::Relation(edit))
            }
            (FieldCategory::ToMany(_), ActionVerb::Remove) => {
                // Unlink only, regardless of ownership.
                let ids = id_list(field, &action.payload)?;
                Some(WriteDirective::Relation(RelationEdit::removing(ids)))
            }
            (FieldCategory::ToMany(shape), ActionVerb::RemoveAll) => {
                let union = linked_union(store, model, targets, field)?;
                let edit = if shape.is_owned() {
                    RelationEdit::deleting(union)
                } else {
                    RelationEdit::removing(union)
                };
                (!edit.is_empty()).then_some(WriteDirective::Relation(edit))
            }
            (FieldCategory::ToMany(_), ActionVerb::Add) => {
                let ids = id_list(field, &action.payload)?;
                Some(WriteDirective::Relation(RelationEdit::adding(ids)))
            }
            // Unreachable behind the vocabulary check above; kept for match
            // exhaustiveness.
            (_, verb) => {
                return Err(TranslateError::VerbNotAllowed {
                    field: field.clone(),
                    verb,
                });
            }
        };

        if let Some(directive) = directive {
            obs::record_directive();
            translation.directives.insert(field.clone(), directive);
        }
    }

    Ok(translation)
}

/// Translate and hand the directive map to the host in one batch write.
///
/// The batch is all-or-nothing: a host rejection (unsupported operation for
/// some field/record combination) surfaces verbatim and nothing is reported
/// as partially applied.
pub fn apply<S, R>(
    store: &mut S,
    registry: &R,
    model: &str,
    targets: &[RecordId],
    submission: &Submission,
) -> Result<Translation, TranslateError>
where
    S: RecordStore + ?Sized,
    R: ModelRegistry + ?Sized,
{
    let translation = translate(store, registry, model, targets, submission)?;
    if !translation.directives.is_empty() {
        store.write_batch(model, targets, &translation.directives)?;
        obs::record_batch_write(targets.len());
    }

    Ok(translation)
}

// Union of currently linked identifiers across all target records.
fn linked_union<S>(
    store: &S,
    model: &str,
    targets: &[RecordId],
    field: &str,
) -> Result<BTreeSet<RecordId>, TranslateError>
where
    S: RecordStore + ?Sized,
{
    let mut union = BTreeSet::new();
    for target in targets {
        union.extend(store.linked_ids(model, *target, field)?);
    }

    Ok(union)
}

// Split a relation `set` payload into linked ids and sanitized inline
// creation payloads; entries are distinguished structurally.
fn split_relation_payload<R>(
    registry: &R,
    field: &str,
    target_model: &str,
    payload: &Value,
) -> Result<(BTreeSet<RecordId>, Vec<BTreeMap<String, Value>>), TranslateError>
where
    R: ModelRegistry + ?Sized,
{
    let entries = payload
        .as_list()
        .ok_or_else(|| TranslateError::InvalidPayload {
            field: field.to_string(),
            expected: "list of linked identifiers or inline creation payloads",
        })?;

    let mut ids = BTreeSet::new();
    let mut creations = Vec::new();
    for entry in entries {
        match entry {
            Value::Id(id) => {
                ids.insert(*id);
            }
            Value::Map(values) => {
                creations.push(sanitize_creation(registry, target_model, values)?);
            }
            _ => {
                return Err(TranslateError::InvalidPayload {
                    field: field.to_string(),
                    expected: "list of linked identifiers or inline creation payloads",
                });
            }
        }
    }

    Ok((ids, creations))
}

// Sanitize one inline creation payload against the relation's target model:
// read-only computed sub-fields are dropped, and list-valued sub-fields are
// reinterpreted as an `add` sub-directive against their own nested relation.
fn sanitize_creation<R>(
    registry: &R,
    target_model: &str,
    payload: &BTreeMap<String, Value>,
) -> Result<BTreeMap<String, Value>, TranslateError>
where
    R: ModelRegistry + ?Sized,
{
    let target = registry.model(target_model)?;

    let mut sanitized = BTreeMap::new();
    for (name, value) in payload {
        let sub_field: &FieldDescriptor = target.field(name)?;
        if !sub_field.is_writable() {
            continue;
        }
        let value = match value {
            Value::List(items) => Value::Map(BTreeMap::from([(
                "add".to_string(),
                Value::List(items.clone()),
            )])),
            other => other.clone(),
        };
        sanitized.insert(name.clone(), value);
    }

    Ok(sanitized)
}

// Decode a payload expected to be a plain list of linked identifiers.
fn id_list(field: &str, payload: &Value) -> Result<BTreeSet<RecordId>, TranslateError> {
    let entries = payload
        .as_list()
        .ok_or_else(|| TranslateError::InvalidPayload {
            field: field.to_string(),
            expected: "list of linked identifiers",
        })?;

    entries
        .iter()
        .map(|entry| {
            entry.as_id().ok_or_else(|| TranslateError::InvalidPayload {
                field: field.to_string(),
                expected: "list of linked identifiers",
            })
        })
        .collect()
}

///
/// TranslateError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum TranslateError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("invalid payload for field '{field}': expected {expected}")]
    InvalidPayload { field: String, expected: &'static str },

    #[error("verb '{verb}' is not allowed for field '{field}'")]
    VerbNotAllowed { field: String, verb: ActionVerb },
}

///
/// TESTS
///
