use crate::{
    PAGE_FIELDS,
    config::EditConfig,
    model::{CatalogError, FieldCategory, FieldDescriptor, SelectionSource},
    obs,
    traits::{Localizer, ModelRegistry},
    value::Value,
    verb,
    view::{ANCHOR_ID, FieldMeta, LayoutNode, Page, Span, ViewDescription, domain, selector_name},
};
use std::collections::{BTreeMap, BTreeSet};

/// Build the wizard's edit view for one configuration.
///
/// The base layout is reduced to its anchor node, every chosen field gets a
/// label, a twin verb selector, and its original control (stripped of
/// volatile directives), and fields overflow into labeled pages past
/// [`PAGE_FIELDS`]. The result is a fresh tree; callers holding a
/// [`super::ViewCache`] entry for this model must invalidate it first.
pub fn synthesize<R, L>(
    registry: &R,
    localizer: &L,
    config: &EditConfig,
) -> Result<ViewDescription, CatalogError>
where
    R: ModelRegistry + ?Sized,
    L: Localizer + ?Sized,
{
    obs::record_synthesize();

    let model = registry.model(&config.model)?;

    // Reduce the base layout to the anchor marker; every original section is
    // discarded so only synthesized content is shown.
    let base_children = match registry.base_layout(&config.model) {
        LayoutNode::Form { children } => children,
        other => vec![other],
    };
    let mut children: Vec<LayoutNode> = base_children
        .into_iter()
        .filter(|node| matches!(node, LayoutNode::Anchor { id } if id == ANCHOR_ID))
        .collect();
    if children.is_empty() {
        children.push(LayoutNode::anchor(ANCHOR_ID));
    }

    // Hidden carrier for company-scoped data resolution, unless the operator
    // chose the field explicitly.
    let inject_company = model.has_field("company") && !config.is_chosen("company");

    let mut chosen: Vec<&FieldDescriptor> = Vec::with_capacity(config.fields.len());
    for name in &config.fields {
        chosen.push(model.field(name)?);
    }

    let mut fields: BTreeMap<String, FieldMeta> = BTreeMap::new();
    for descriptor in &chosen {
        let meta = field_meta(registry, &model.name, descriptor)?;
        let selector = selector_meta(descriptor, localizer);
        fields.insert(selector.name.clone(), selector);
        fields.insert(meta.name.clone(), meta);
    }
    if inject_company {
        let mut meta = field_meta(registry, &model.name, model.field("company")?)?;
        meta.readonly = true;
        fields.insert(meta.name.clone(), meta);
    }

    // Page labels signal open-ended alphabetic ranges: the first page always
    // starts at A and the last always ends at Z.
    let paged = chosen.len() > PAGE_FIELDS;
    let mut pages: Vec<Page> = Vec::new();
    if paged {
        let section = localizer
            .text("massedit.fields")
            .unwrap_or_else(|| "Fields".to_string());
        let page_count = (chosen.len() - 1) / PAGE_FIELDS + 1;
        for page in 0..page_count {
            let first = if page == 0 {
                'A'
            } else {
                label_initial(chosen[page * PAGE_FIELDS])
            };
            let last_index = (page + 1) * PAGE_FIELDS - 1;
            let last = if last_index < chosen.len() - 1 {
                label_initial(chosen[last_index])
            } else {
                'Z'
            };
            pages.push(Page::new(format!("{section} ({first}-{last})")));
        }
    }

    // Identity guards keep re-synthesis from duplicating nodes that already
    // exist in the working tree.
    let mut seen_labels: BTreeSet<String> = children
        .iter()
        .flat_map(|node| node.label_ids().into_iter().map(ToString::to_string))
        .collect();
    let mut seen_controls: BTreeSet<String> = children
        .iter()
        .flat_map(|node| node.control_fields().into_iter().map(ToString::to_string))
        .collect();

    for (index, descriptor) in chosen.iter().enumerate() {
        let span = if descriptor.is_to_many() || descriptor.is_map() {
            Span::Full
        } else {
            Span::Half
        };

        let mut group_children = Vec::with_capacity(3);
        let label_id = format!("label_{}", descriptor.name);
        if seen_labels.insert(label_id.clone()) {
            group_children.push(LayoutNode::label(label_id, descriptor.label.clone()));
        }
        let selector = selector_name(&descriptor.name);
        if seen_controls.insert(selector.clone()) {
            group_children.push(LayoutNode::control(selector, span));
        }
        if seen_controls.insert(descriptor.name.clone()) {
            group_children.push(LayoutNode::control(descriptor.name.clone(), span));
        }

        let group = LayoutNode::group(group_children);
        if paged {
            pages[index / PAGE_FIELDS].children.push(group);
        } else {
            children.push(group);
        }
    }

    if paged {
        children.push(LayoutNode::Notebook { pages });
    }
    if inject_company && seen_controls.insert("company".to_string()) {
        children.push(LayoutNode::hidden_control("company"));
    }

    Ok(ViewDescription {
        root: LayoutNode::Form { children },
        fields,
    })
}

// Strip volatile directives from one field's control description and resolve
// dynamic selection enumerations.
fn field_meta<R>(
    registry: &R,
    model: &str,
    descriptor: &FieldDescriptor,
) -> Result<FieldMeta, CatalogError>
where
    R: ModelRegistry + ?Sized,
{
    let category = match &descriptor.category {
        FieldCategory::Selection(SelectionSource::Dynamic(resolver)) => FieldCategory::Selection(
            SelectionSource::Fixed(registry.resolve_selection(model, resolver)?),
        ),
        other => other.clone(),
    };

    Ok(FieldMeta {
        name: descriptor.name.clone(),
        label: descriptor.label.clone(),
        category,
        // Required-ness, visibility states, and change triggers presuppose a
        // single-record edit context; they do not survive synthesis.
        required: false,
        readonly: descriptor.readonly,
        domain: descriptor.domain.as_ref().map(domain::strip_marked_clauses),
        default: descriptor.default.clone(),
    })
}

fn selector_meta<L>(descriptor: &FieldDescriptor, localizer: &L) -> FieldMeta
where
    L: Localizer + ?Sized,
{
    let choices = verb::verbs_for(descriptor, localizer)
        .into_iter()
        .map(|choice| (choice.verb.token().to_string(), choice.label))
        .collect();

    FieldMeta {
        name: selector_name(&descriptor.name),
        label: descriptor.label.clone(),
        category: FieldCategory::Selection(SelectionSource::Fixed(choices)),
        required: false,
        readonly: false,
        domain: None,
        default: Some(Value::text("")),
    }
}

fn label_initial(descriptor: &FieldDescriptor) -> char {
    descriptor
        .label
        .chars()
        .next()
        .map_or('A', |c| c.to_ascii_uppercase())
}

///
/// TESTS
///
