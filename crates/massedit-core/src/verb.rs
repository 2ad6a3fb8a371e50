use crate::{
    directive::ActionVerb,
    model::{FieldCategory, FieldDescriptor},
    traits::Localizer,
};
use serde::{Deserialize, Serialize};

///
/// VerbChoice
///
/// One entry of a selector pseudo-field's enumeration.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct VerbChoice {
    pub verb: ActionVerb,
    pub label: String,
}

/// Ordered verb vocabulary for one field, independent of any specific model.
///
/// To-many relations offer `set`/`remove_all`, with `add`/`remove` appended
/// only for shared (many-to-many) or explicitly incremental relations; every
/// other category offers `set`/`remove`. The empty verb always comes first
/// and renders as an empty label.
#[must_use]
pub fn verbs_for<L>(descriptor: &FieldDescriptor, localizer: &L) -> Vec<VerbChoice>
where
    L: Localizer + ?Sized,
{
    let mut verbs = vec![ActionVerb::Keep, ActionVerb::Set];
    match &descriptor.category {
        FieldCategory::ToMany(shape) => {
            verbs.push(ActionVerb::RemoveAll);
            if shape.supports_incremental() {
                verbs.push(ActionVerb::Add);
                verbs.push(ActionVerb::Remove);
            }
        }
        FieldCategory::Scalar | FieldCategory::Selection(_) | FieldCategory::Map => {
            verbs.push(ActionVerb::Remove);
        }
    }

    verbs
        .into_iter()
        .map(|verb| VerbChoice {
            verb,
            label: label_for(verb, localizer),
        })
        .collect()
}

/// True when `verb` belongs to the vocabulary of `category`. The translator
/// re-checks this because typed submissions can bypass the synthesized form.
#[must_use]
pub fn verb_allowed(category: &FieldCategory, verb: ActionVerb) -> bool {
    match category {
        FieldCategory::ToMany(shape) => match verb {
            ActionVerb::Keep | ActionVerb::Set | ActionVerb::RemoveAll => true,
            ActionVerb::Add | ActionVerb::Remove => shape.supports_incremental(),
        },
        FieldCategory::Scalar | FieldCategory::Selection(_) | FieldCategory::Map => matches!(
            verb,
            ActionVerb::Keep | ActionVerb::Set | ActionVerb::Remove
        ),
    }
}

fn label_for<L>(verb: ActionVerb, localizer: &L) -> String
where
    L: Localizer + ?Sized,
{
    if verb.is_keep() {
        return String::new();
    }

    let default = match verb {
        ActionVerb::Keep => "",
        ActionVerb::Set => "Set",
        ActionVerb::Remove => "Remove",
        ActionVerb::RemoveAll => "Remove All",
        ActionVerb::Add => "Add",
    };

    localizer
        .text(&format!("massedit.{}", verb.token()))
        .unwrap_or_else(|| default.to_string())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::RelationShape, traits::NullLocalizer};

    fn tokens(choices: &[VerbChoice]) -> Vec<&'static str> {
        choices.iter().map(|c| c.verb.token()).collect()
    }

    #[test]
    fn scalar_selection_and_map_share_the_same_vocabulary() {
        for descriptor in [
            FieldDescriptor::scalar("name", "Name"),
            FieldDescriptor::selection(
                "lang",
                "Language",
                crate::model::SelectionSource::Fixed(vec![]),
            ),
            FieldDescriptor::map("attributes", "Attributes"),
        ] {
            let choices = verbs_for(&descriptor, &NullLocalizer);
            assert_eq!(tokens(&choices), ["", "set", "remove"]);
        }
    }

    #[test]
    fn shared_relation_gains_add_and_remove() {
        let descriptor =
            FieldDescriptor::to_many("categories", "Categories", RelationShape::shared("cat"));
        let choices = verbs_for(&descriptor, &NullLocalizer);
        assert_eq!(tokens(&choices), ["", "set", "remove_all", "add", "remove"]);
    }

    #[test]
    fn owned_relation_without_incremental_stays_coarse() {
        let descriptor =
            FieldDescriptor::to_many("addresses", "Addresses", RelationShape::owned("addr"));
        let choices = verbs_for(&descriptor, &NullLocalizer);
        assert_eq!(tokens(&choices), ["", "set", "remove_all"]);

        let incremental = FieldDescriptor::to_many(
            "addresses",
            "Addresses",
            RelationShape::owned("addr").with_incremental(),
        );
        let choices = verbs_for(&incremental, &NullLocalizer);
        assert_eq!(tokens(&choices), ["", "set", "remove_all", "add", "remove"]);
    }

    #[test]
    fn empty_verb_renders_with_an_empty_label() {
        let descriptor = FieldDescriptor::scalar("name", "Name");
        let choices = verbs_for(&descriptor, &NullLocalizer);
        assert_eq!(choices[0].label, "");
        assert_eq!(choices[1].label, "Set");
    }

    #[test]
    fn allowed_verbs_mirror_the_catalog() {
        let scalar = FieldCategory::Scalar;
        assert!(verb_allowed(&scalar, ActionVerb::Set));
        assert!(!verb_allowed(&scalar, ActionVerb::Add));
        assert!(!verb_allowed(&scalar, ActionVerb::RemoveAll));

        let owned = FieldCategory::ToMany(RelationShape::owned("addr"));
        assert!(verb_allowed(&owned, ActionVerb::RemoveAll));
        assert!(!verb_allowed(&owned, ActionVerb::Add));
    }
}
