//! In-memory host fixtures for engine tests: a model registry with a small
//! party schema and a record store that applies write batches the way a real
//! host would.

use crate::{
    directive::WriteDirective,
    model::{CatalogError, FieldDescriptor, ModelDescriptor, RelationShape, SelectionSource},
    traits::{HostError, ModelRegistry, RecordStore},
    value::{RecordId, Value},
    view::layout::LayoutNode,
};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

///
/// MemoryRegistry
///
/// Clonable metadata half of the fixture, so tests can hold a registry
/// reference while mutating the store.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryRegistry {
    models: BTreeMap<String, ModelDescriptor>,
    selections: BTreeMap<(String, String), Vec<(String, String)>>,
    base_layouts: BTreeMap<String, LayoutNode>,
}

impl ModelRegistry for MemoryRegistry {
    fn model(&self, name: &str) -> Result<&ModelDescriptor, CatalogError> {
        self.models
            .get(name)
            .ok_or_else(|| CatalogError::UnknownModel {
                model: name.to_string(),
            })
    }

    fn resolve_selection(
        &self,
        model: &str,
        resolver: &str,
    ) -> Result<Vec<(String, String)>, CatalogError> {
        self.selections
            .get(&(model.to_string(), resolver.to_string()))
            .cloned()
            .ok_or_else(|| CatalogError::UnknownResolver {
                model: model.to_string(),
                resolver: resolver.to_string(),
            })
    }

    fn default_values(&self, model: &str, fields: &[String]) -> BTreeMap<String, Value> {
        let Ok(model) = self.model(model) else {
            return BTreeMap::new();
        };

        fields
            .iter()
            .filter_map(|name| {
                let descriptor = model.field(name).ok()?;
                Some((name.clone(), descriptor.default.clone()?))
            })
            .collect()
    }

    fn base_layout(&self, model: &str) -> LayoutNode {
        self.base_layouts.get(model).cloned().unwrap_or_else(|| {
            LayoutNode::form([LayoutNode::anchor(crate::view::ANCHOR_ID)])
        })
    }
}

///
/// RecordData
///

#[derive(Clone, Debug, Default)]
struct RecordData {
    scalars: BTreeMap<String, Value>,
    links: BTreeMap<String, BTreeSet<RecordId>>,
    maps: BTreeMap<String, BTreeMap<String, Value>>,
}

///
/// MemoryHost
///
/// Registry plus record store. Implements `ModelRegistry` by delegation so a
/// single fixture serves both seams when no mutation is in flight.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryHost {
    registry: MemoryRegistry,
    records: BTreeMap<(String, RecordId), RecordData>,
    rejected: BTreeSet<(String, String)>,
    next_id: u64,
}

impl MemoryHost {
    /// Party schema exercising every field category.
    pub fn with_party_fixture() -> Self {
        let party = ModelDescriptor::new("party", "Party")
            .with_field(
                FieldDescriptor::scalar("name", "Name")
                    .with_required()
                    .with_on_change(&["on_change_name"])
                    .with_default(Value::text("Unknown")),
            )
            .with_field(FieldDescriptor::selection(
                "lang",
                "Language",
                SelectionSource::Fixed(vec![
                    ("en".to_string(), "English".to_string()),
                    ("es".to_string(), "Spanish".to_string()),
                ]),
            ))
            .with_field(FieldDescriptor::selection(
                "timezone",
                "Timezone",
                SelectionSource::Dynamic("timezones".to_string()),
            ))
            .with_field(
                FieldDescriptor::to_many(
                    "categories",
                    "Categories",
                    RelationShape::shared("party.category"),
                )
                .with_domain(json!([
                    ["active", "=", true],
                    { "__class__": "Eval", "expr": "company" },
                ])),
            )
            .with_field(FieldDescriptor::to_many(
                "addresses",
                "Addresses",
                RelationShape::owned("party.address"),
            ))
            .with_field(FieldDescriptor::to_many(
                "tags_owned",
                "Owned Tags",
                RelationShape::owned("party.tag").with_incremental(),
            ))
            .with_field(FieldDescriptor::map("attributes", "Attributes"))
            .with_field(FieldDescriptor::scalar("company", "Company"))
            .with_field(FieldDescriptor::scalar("secret", "Secret").with_computed(false))
            .with_field(FieldDescriptor::scalar("code", "Code").with_computed(true));

        let category = ModelDescriptor::new("party.category", "Party Category")
            .with_field(FieldDescriptor::scalar("name", "Name"));

        let address = ModelDescriptor::new("party.address", "Party Address")
            .with_field(FieldDescriptor::scalar("street", "Street"))
            .with_field(FieldDescriptor::scalar("city", "City"))
            .with_field(FieldDescriptor::scalar("total", "Total").with_computed(false))
            .with_field(FieldDescriptor::to_many(
                "tags",
                "Tags",
                RelationShape::shared("party.tag"),
            ));

        let tag = ModelDescriptor::new("party.tag", "Party Tag")
            .with_field(FieldDescriptor::scalar("name", "Name"));

        let session = ModelDescriptor::new("party.session", "Party Session").transient();

        let mut registry = MemoryRegistry::default();
        for model in [party, category, address, tag, session] {
            registry.models.insert(model.name.clone(), model);
        }
        registry.selections.insert(
            ("party".to_string(), "timezones".to_string()),
            vec![
                ("utc".to_string(), "UTC".to_string()),
                ("cet".to_string(), "CET".to_string()),
            ],
        );

        Self {
            registry,
            records: BTreeMap::new(),
            rejected: BTreeSet::new(),
            next_id: 100,
        }
    }

    /// Model with `count` scalar fields labeled A.., B.. for pagination tests.
    pub fn with_wide_fixture(count: usize) -> Self {
        let mut model = ModelDescriptor::new("wide", "Wide");
        for i in 0..count {
            let letter = char::from(b'A' + u8::try_from(i % 26).unwrap_or(0));
            model = model.with_field(FieldDescriptor::scalar(
                Self::wide_field_name(i),
                format!("{letter} Field {i:02}"),
            ));
        }

        let mut registry = MemoryRegistry::default();
        registry.models.insert("wide".to_string(), model);

        Self {
            registry,
            records: BTreeMap::new(),
            rejected: BTreeSet::new(),
            next_id: 100,
        }
    }

    #[must_use]
    pub fn wide_field_name(i: usize) -> String {
        format!("field_{i:02}")
    }

    /// Clonable registry handle for APIs that also borrow the store mutably.
    #[must_use]
    pub fn registry(&self) -> MemoryRegistry {
        self.registry.clone()
    }

    pub fn set_base_layout(&mut self, model: &str, layout: LayoutNode) {
        self.registry
            .base_layouts
            .insert(model.to_string(), layout);
    }

    /// Seed one party record per name; returns the allocated ids.
    pub fn seed_parties(&mut self, names: &[&str]) -> Vec<RecordId> {
        names
            .iter()
            .map(|name| {
                let id = self.allocate_id();
                let mut data = RecordData::default();
                data.scalars
                    .insert("name".to_string(), Value::text(*name));
                self.records.insert(("party".to_string(), id), data);
                id
            })
            .collect()
    }

    pub fn link(&mut self, model: &str, record: RecordId, field: &str, ids: &BTreeSet<RecordId>) {
        let data = self
            .records
            .entry((model.to_string(), record))
            .or_default();
        data.links
            .entry(field.to_string())
            .or_default()
            .extend(ids.iter().copied());
    }

    pub fn put_map(&mut self, model: &str, record: RecordId, field: &str, entries: &[(&str, Value)]) {
        let data = self
            .records
            .entry((model.to_string(), record))
            .or_default();
        data.maps.insert(
            field.to_string(),
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        );
    }

    /// Make the batch writer reject one field, simulating a host that does
    /// not support the operation.
    pub fn reject_writes_to(&mut self, model: &str, field: &str) {
        self.rejected
            .insert((model.to_string(), field.to_string()));
    }

    #[must_use]
    pub fn scalar(&self, model: &str, record: RecordId, field: &str) -> Value {
        self.records
            .get(&(model.to_string(), record))
            .and_then(|data| data.scalars.get(field))
            .cloned()
            .unwrap_or(Value::Null)
    }

    #[must_use]
    pub fn links(&self, model: &str, record: RecordId, field: &str) -> BTreeSet<RecordId> {
        self.records
            .get(&(model.to_string(), record))
            .and_then(|data| data.links.get(field))
            .cloned()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn map_value(&self, model: &str, record: RecordId, field: &str) -> BTreeMap<String, Value> {
        self.records
            .get(&(model.to_string(), record))
            .and_then(|data| data.maps.get(field))
            .cloned()
            .unwrap_or_default()
    }

    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        RecordId(self.next_id)
    }

    fn record(&self, model: &str, record: RecordId) -> Result<&RecordData, HostError> {
        self.records
            .get(&(model.to_string(), record))
            .ok_or_else(|| HostError::RecordNotFound {
                model: model.to_string(),
                record,
            })
    }
}

impl ModelRegistry for MemoryHost {
    fn model(&self, name: &str) -> Result<&ModelDescriptor, CatalogError> {
        self.registry.model(name)
    }

    fn resolve_selection(
        &self,
        model: &str,
        resolver: &str,
    ) -> Result<Vec<(String, String)>, CatalogError> {
        self.registry.resolve_selection(model, resolver)
    }

    fn default_values(&self, model: &str, fields: &[String]) -> BTreeMap<String, Value> {
        self.registry.default_values(model, fields)
    }

    fn base_layout(&self, model: &str) -> LayoutNode {
        self.registry.base_layout(model)
    }
}

impl RecordStore for MemoryHost {
    fn linked_ids(
        &self,
        model: &str,
        record: RecordId,
        field: &str,
    ) -> Result<BTreeSet<RecordId>, HostError> {
        Ok(self
            .record(model, record)?
            .links
            .get(field)
            .cloned()
            .unwrap_or_default())
    }

    fn read_map(
        &self,
        model: &str,
        record: RecordId,
        field: &str,
    ) -> Result<BTreeMap<String, Value>, HostError> {
        Ok(self
            .record(model, record)?
            .maps
            .get(field)
            .cloned()
            .unwrap_or_default())
    }

    fn write_map(
        &mut self,
        model: &str,
        record: RecordId,
        field: &str,
        value: BTreeMap<String, Value>,
    ) -> Result<(), HostError> {
        self.record(model, record)?;
        let data = self
            .records
            .entry((model.to_string(), record))
            .or_default();
        data.maps.insert(field.to_string(), value);

        Ok(())
    }

    fn write_batch(
        &mut self,
        model: &str,
        targets: &[RecordId],
        directives: &BTreeMap<String, WriteDirective>,
    ) -> Result<(), HostError> {
        // Rejections are checked before any mutation so a failed batch
        // leaves every record untouched.
        for field in directives.keys() {
            if self.rejected.contains(&(model.to_string(), field.clone())) {
                return Err(HostError::Unsupported {
                    model: model.to_string(),
                    field: field.clone(),
                    message: "write not implemented for this field".to_string(),
                });
            }
        }
        for target in targets {
            self.record(model, *target)?;
        }

        let mut created: Vec<RecordId> = Vec::new();
        for (field, directive) in directives {
            if let WriteDirective::Relation(edit) = directive {
                for _ in &edit.create {
                    created.push(self.allocate_id());
                }
            }
            for target in targets {
                let data = self
                    .records
                    .entry((model.to_string(), *target))
                    .or_default();
                match directive {
                    WriteDirective::Assign(value) => {
                        data.scalars.insert(field.clone(), value.clone());
                    }
                    WriteDirective::Relation(edit) => {
                        let links = data.links.entry(field.clone()).or_default();
                        for id in edit.remove.iter().chain(&edit.delete) {
                            links.remove(id);
                        }
                        links.extend(edit.add.iter().copied());
                        links.extend(created.iter().copied());
                    }
                }
            }
            created.clear();
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::RelationEdit;

    #[test]
    fn batch_writes_apply_relation_edits() {
        let mut host = MemoryHost::with_party_fixture();
        let targets = host.seed_parties(&["John"]);
        host.link(
            "party",
            targets[0],
            "categories",
            &[RecordId(1), RecordId(2)].into_iter().collect(),
        );

        let mut edit = RelationEdit::adding([RecordId(3)]);
        edit.remove.insert(RecordId(1));
        let directives =
            BTreeMap::from([("categories".to_string(), WriteDirective::Relation(edit))]);
        host.write_batch("party", &targets, &directives).unwrap();

        assert_eq!(
            host.links("party", targets[0], "categories"),
            [RecordId(2), RecordId(3)].into_iter().collect()
        );
    }

    #[test]
    fn inline_creations_allocate_fresh_linked_records() {
        let mut host = MemoryHost::with_party_fixture();
        let targets = host.seed_parties(&["John"]);

        let mut edit = RelationEdit::new();
        edit.create.push(BTreeMap::from([(
            "street".to_string(),
            Value::text("Main St 1"),
        )]));
        let directives =
            BTreeMap::from([("addresses".to_string(), WriteDirective::Relation(edit))]);
        host.write_batch("party", &targets, &directives).unwrap();

        assert_eq!(host.links("party", targets[0], "addresses").len(), 1);
    }
}
