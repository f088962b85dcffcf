//! The rendered page structure shared by every stage.
//!
//! An external HTML generator renders the site; this module describes what the
//! controller needs to know about that output: one [`Section`] per top-level
//! view, the animatable elements inside it grouped by role, the filterable
//! content items with their category tags, and the heading/paragraph text used
//! by search. The structure serializes to JSON so a generator can hand it over
//! as a manifest.
//!
//! Optional parts (hero block, filters, text) default to empty. Absence is a
//! valid page shape, never an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role of an animatable element inside a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementRole {
    Hero,
    Header,
    Card,
    ListItem,
    FilterControl,
}

impl ElementRole {
    /// Short name used in logs and inventories.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Header => "header",
            Self::Card => "card",
            Self::ListItem => "list-item",
            Self::FilterControl => "filter-control",
        }
    }
}

/// Elements sharing a role, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementGroup {
    pub role: ElementRole,
    #[serde(default)]
    pub elements: Vec<String>,
}

/// A filterable unit of content (publication, news entry) with its tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl ContentItem {
    pub fn new<I, S>(id: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact tag-set membership. No substring or fuzzy matching.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// A filter button: the category token it selects and its display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterControl {
    pub token: String,
    pub label: String,
}

impl FilterControl {
    pub fn new(token: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    Heading,
    Paragraph,
}

/// Pre-rendered heading or paragraph text, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub kind: TextKind,
    pub text: String,
}

impl TextBlock {
    pub fn heading(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::Heading,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::Paragraph,
            text: text.into(),
        }
    }
}

/// One top-level page view (home, research, team, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ElementGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ContentItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterControl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<TextBlock>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            hero: None,
            headers: Vec::new(),
            groups: Vec::new(),
            items: Vec::new(),
            filters: Vec::new(),
            text: Vec::new(),
        }
    }

    /// Append an element to the group for `role`, creating the group on first use.
    ///
    /// Hero and header roles have dedicated fields and are routed there.
    pub fn push_element(&mut self, role: ElementRole, element: impl Into<String>) {
        let element = element.into();
        match role {
            ElementRole::Hero => self.hero = Some(element),
            ElementRole::Header => self.headers.push(element),
            _ => match self.groups.iter_mut().find(|g| g.role == role) {
                Some(group) => group.elements.push(element),
                None => self.groups.push(ElementGroup {
                    role,
                    elements: vec![element],
                }),
            },
        }
    }

    /// Elements of the group for `role`, empty when the section has none.
    pub fn group(&self, role: ElementRole) -> &[String] {
        match role {
            ElementRole::Header => &self.headers,
            ElementRole::Hero => self.hero.as_slice(),
            _ => self
                .groups
                .iter()
                .find(|g| g.role == role)
                .map(|g| g.elements.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Every animatable element in the section: hero, headers, then groups.
    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.hero
            .iter()
            .chain(self.headers.iter())
            .chain(self.groups.iter().flat_map(|g| g.elements.iter()))
            .map(String::as_str)
    }

    /// Fold another section's parts into this one (used when a data file
    /// feeds a section that also has a markdown body).
    pub fn absorb(&mut self, other: Section) {
        if self.hero.is_none() {
            self.hero = other.hero;
        }
        if self.title.is_empty() {
            self.title = other.title;
        }
        self.headers.extend(other.headers);
        for group in other.groups {
            for element in group.elements {
                self.push_element(group.role, element);
            }
        }
        self.items.extend(other.items);
        self.filters.extend(other.filters);
        self.text.extend(other.text);
    }
}

/// All sections of the site, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageStructure {
    pub sections: Vec<Section>,
}

impl PageStructure {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.id.as_str())
    }

    /// Insert a section, or merge it into an existing section with the same id.
    pub fn upsert(&mut self, section: Section) {
        match self.section_mut(&section.id) {
            Some(existing) => existing.absorb(section),
            None => self.sections.push(section),
        }
    }
}
