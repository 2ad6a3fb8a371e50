use serde::{Deserialize, Serialize};

///
/// LayoutNode
///
/// Immutable view layout tree. Synthesis never mutates a cached tree in
/// place; it produces a fresh root from the base layout.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum LayoutNode {
    Form {
        children: Vec<LayoutNode>,
    },
    /// Marker node locating the insertion point in the base layout.
    Anchor {
        id: String,
    },
    Notebook {
        pages: Vec<Page>,
    },
    Group {
        children: Vec<LayoutNode>,
    },
    Label {
        id: String,
        text: String,
    },
    Control {
        field: String,
        span: Span,
        readonly: bool,
        invisible: bool,
    },
}

impl LayoutNode {
    #[must_use]
    pub fn form(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Form {
            children: children.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn anchor(id: impl Into<String>) -> Self {
        Self::Anchor { id: id.into() }
    }

    #[must_use]
    pub fn group(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Group {
            children: children.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn label(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Label {
            id: id.into(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn control(field: impl Into<String>, span: Span) -> Self {
        Self::Control {
            field: field.into(),
            span,
            readonly: false,
            invisible: false,
        }
    }

    /// Hidden read-only carrier control (the injected `company` field).
    #[must_use]
    pub fn hidden_control(field: impl Into<String>) -> Self {
        Self::Control {
            field: field.into(),
            span: Span::Full,
            readonly: true,
            invisible: true,
        }
    }

    /// True when a control bound to `field` exists anywhere in the tree.
    #[must_use]
    pub fn contains_control(&self, field: &str) -> bool {
        match self {
            Self::Control { field: name, .. } => name == field,
            Self::Anchor { .. } | Self::Label { .. } => false,
            Self::Form { children } | Self::Group { children } => {
                children.iter().any(|c| c.contains_control(field))
            }
            Self::Notebook { pages } => pages
                .iter()
                .flat_map(|p| &p.children)
                .any(|c| c.contains_control(field)),
        }
    }

    /// True when a label node with `id` exists anywhere in the tree.
    #[must_use]
    pub fn contains_label(&self, id: &str) -> bool {
        match self {
            Self::Label { id: label_id, .. } => label_id == id,
            Self::Anchor { .. } | Self::Control { .. } => false,
            Self::Form { children } | Self::Group { children } => {
                children.iter().any(|c| c.contains_label(id))
            }
            Self::Notebook { pages } => pages
                .iter()
                .flat_map(|p| &p.children)
                .any(|c| c.contains_label(id)),
        }
    }

    /// Pages of the first notebook in the tree, if any.
    #[must_use]
    pub fn notebook_pages(&self) -> Option<&[Page]> {
        match self {
            Self::Notebook { pages } => Some(pages),
            Self::Anchor { .. } | Self::Label { .. } | Self::Control { .. } => None,
            Self::Form { children } | Self::Group { children } => {
                children.iter().find_map(Self::notebook_pages)
            }
        }
    }

    /// Field names of every control in the tree, in document order.
    #[must_use]
    pub fn control_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_control_fields(&mut fields);
        fields
    }

    fn collect_control_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Control { field, .. } => out.push(field),
            Self::Anchor { .. } | Self::Label { .. } => {}
            Self::Form { children } | Self::Group { children } => {
                for child in children {
                    child.collect_control_fields(out);
                }
            }
            Self::Notebook { pages } => {
                for child in pages.iter().flat_map(|p| &p.children) {
                    child.collect_control_fields(out);
                }
            }
        }
    }

    /// Ids of every label node in the tree, in document order.
    #[must_use]
    pub fn label_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_label_ids(&mut ids);
        ids
    }

    fn collect_label_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Label { id, .. } => out.push(id),
            Self::Anchor { .. } | Self::Control { .. } => {}
            Self::Form { children } | Self::Group { children } => {
                for child in children {
                    child.collect_label_ids(out);
                }
            }
            Self::Notebook { pages } => {
                for child in pages.iter().flat_map(|p| &p.children) {
                    child.collect_label_ids(out);
                }
            }
        }
    }
}

///
/// Page
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Page {
    pub label: String,
    pub children: Vec<LayoutNode>,
}

impl Page {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }
}

///
/// Span
///
/// Selector controls span the full row for relation and map fields, half a
/// row otherwise.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Span {
    Half,
    Full,
}

///
/// TESTS
///
