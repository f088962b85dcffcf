//! Category filter for a section's content items.
//!
//! Exactly one token is active at a time. An item is visible when the active
//! token is the distinguished "all" token or is a member of the item's tag
//! set. Matching is set membership only; `journal` does not match `journals`.

use log::{debug, warn};
use thiserror::Error;

use crate::types::{ContentItem, FilterControl, Section};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter token: {0}")]
    UnknownToken(String),
}

/// Result of applying a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub token: String,
    pub visible: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
struct ItemState {
    item: ContentItem,
    visible: bool,
}

#[derive(Debug, Clone)]
pub struct FilterEngine {
    all_token: String,
    items: Vec<ItemState>,
    controls: Vec<FilterControl>,
    active: String,
    visible: usize,
}

impl FilterEngine {
    /// Start with the "all" token active and every item visible.
    pub fn new(
        all_token: impl Into<String>,
        items: Vec<ContentItem>,
        controls: Vec<FilterControl>,
    ) -> Self {
        let all_token = all_token.into();
        let items: Vec<ItemState> = items
            .into_iter()
            .map(|item| ItemState {
                item,
                visible: true,
            })
            .collect();
        Self {
            visible: items.len(),
            active: all_token.clone(),
            all_token,
            items,
            controls,
        }
    }

    pub fn from_section(section: &Section, all_token: impl Into<String>) -> Self {
        Self::new(all_token, section.items.clone(), section.filters.clone())
    }

    /// A token is known when it is the all-token, one of the controls, or the
    /// section declares no controls at all.
    pub fn is_known(&self, token: &str) -> bool {
        token == self.all_token
            || self.controls.is_empty()
            || self.controls.iter().any(|c| c.token == token)
    }

    pub fn matches(&self, item: &ContentItem, token: &str) -> bool {
        token == self.all_token || item.has_tag(token)
    }

    /// Make `token` the active filter and recompute visibility.
    ///
    /// An unknown token changes nothing.
    pub fn apply(&mut self, token: &str) -> Result<FilterOutcome, FilterError> {
        if !self.is_known(token) {
            warn!("event=apply module=filter status=ignored token={token}");
            return Err(FilterError::UnknownToken(token.to_string()));
        }
        let mut visible = 0;
        for i in 0..self.items.len() {
            let matched = self.matches(&self.items[i].item, token);
            self.items[i].visible = matched;
            visible += usize::from(matched);
        }
        self.active = token.to_string();
        self.visible = visible;
        debug!(
            "event=apply module=filter token={token} visible={visible} total={}",
            self.items.len()
        );
        Ok(self.outcome())
    }

    /// Re-run the active token (after the section is shown again).
    pub fn reapply(&mut self) -> FilterOutcome {
        let token = self.active.clone();
        match self.apply(&token) {
            Ok(outcome) => outcome,
            // The active token was accepted once and controls never change.
            Err(_) => self.outcome(),
        }
    }

    pub fn active_token(&self) -> &str {
        &self.active
    }

    /// The visible-count display value.
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn is_visible(&self, item_id: &str) -> Option<bool> {
        self.items
            .iter()
            .find(|s| s.item.id == item_id)
            .map(|s| s.visible)
    }

    pub fn visible_ids(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|s| s.visible)
            .map(|s| s.item.id.as_str())
    }

    /// Controls with their active flag; at most one is active.
    pub fn controls(&self) -> impl Iterator<Item = (&FilterControl, bool)> {
        self.controls
            .iter()
            .map(|c| (c, c.token == self.active))
    }

    fn outcome(&self) -> FilterOutcome {
        FilterOutcome {
            token: self.active.clone(),
            visible: self.visible,
            total: self.items.len(),
        }
    }
}
