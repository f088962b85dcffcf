//! News records and the news section.
//!
//! Records come from `data/news.json`. Only visible items are shown: featured
//! items first (capped), then the remaining visible items as past news, each
//! in file order.

use serde::{Deserialize, Serialize};

use crate::types::{ContentItem, ElementRole, Section, TextBlock};

/// A news entry as stored in `news.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub featured: bool,
}

fn default_true() -> bool {
    true
}

/// Visible news split into the featured strip and the past list.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsLayout<'a> {
    pub featured: Vec<&'a NewsItem>,
    pub past: Vec<&'a NewsItem>,
}

pub fn layout(items: &[NewsItem], featured_limit: usize) -> NewsLayout<'_> {
    let featured = items
        .iter()
        .filter(|n| n.visible && n.featured)
        .take(featured_limit)
        .collect();
    let past = items.iter().filter(|n| n.visible && !n.featured).collect();
    NewsLayout { featured, past }
}

/// Next id in the `news-NNN` sequence.
pub fn next_news_id(items: &[NewsItem]) -> String {
    let next = items
        .iter()
        .filter_map(|n| n.id.strip_prefix("news-")?.parse::<u32>().ok())
        .max()
        .map_or(1, |n| n + 1);
    format!("news-{next:03}")
}

/// Lay news out as a section: one list row and one content item (tagged
/// with its category) per shown entry.
pub fn news_section(id: &str, items: &[NewsItem], featured_limit: usize) -> Section {
    let mut section = Section::new(id, "News");
    let shown = layout(items, featured_limit);
    for item in shown.featured.into_iter().chain(shown.past) {
        section.push_element(ElementRole::ListItem, item.id.clone());
        let tags = Some(item.category.as_str()).filter(|c| !c.is_empty());
        section.items.push(ContentItem::new(item.id.clone(), tags));
        section.text.push(TextBlock::heading(item.title.clone()));
        if !item.description.is_empty() {
            section.text.push(TextBlock::paragraph(item.description.clone()));
        }
    }
    section
}
