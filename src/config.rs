//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by an optional `config.toml` in the content root; every key is
//! optional and unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [content]
//! publications_file = "publications.json"
//! news_file = "data/news.json"
//! publications_section = "publications"
//! news_section = "news"
//! featured_news_limit = 5
//!
//! [navigation]
//! # initial_section = "home"   # default: first section in document order
//! scroll_threshold_px = 50
//!
//! [animation]
//! hero_delay_ms = 100
//!
//! [animation.header]
//! base_ms = 200
//! stride_ms = 150
//!
//! [animation.card]
//! base_ms = 300
//! stride_ms = 100
//!
//! [animation.list_item]
//! base_ms = 400
//! stride_ms = 50
//!
//! [animation.filter_control]
//! base_ms = 350
//! stride_ms = 75
//!
//! [animation.sections.publications.list_item]   # per-section override
//! base_ms = 600
//! stride_ms = 60
//!
//! [filter]
//! section = "publications"
//! all_token = "all"
//!
//! [search]
//! section = "search"
//! min_query_chars = 3
//! max_results = 8
//! excerpt_chars = 150
//! paragraph_min_chars = 50
//! default_title = "Content"
//! debounce_ms = 300
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::types::ElementRole;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Where data files live and which sections they feed.
    pub content: ContentConfig,
    /// Initial section and scroll behavior.
    pub navigation: NavigationConfig,
    /// Reveal timings per element role.
    pub animation: AnimationConfig,
    /// The filterable section and its distinguished "all" token.
    pub filter: FilterConfig,
    /// Search index thresholds and input debounce.
    pub search: SearchConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.animation.validate()?;
        if self.filter.all_token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "filter.all_token must not be empty".into(),
            ));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::Validation(
                "search.max_results must be at least 1".into(),
            ));
        }
        if self.search.excerpt_chars == 0 {
            return Err(ConfigError::Validation(
                "search.excerpt_chars must be at least 1".into(),
            ));
        }
        if self.search.min_query_chars == 0 {
            return Err(ConfigError::Validation(
                "search.min_query_chars must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Data file locations, relative to the content root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub publications_file: String,
    pub news_file: String,
    /// Section the publication list is rendered into.
    pub publications_section: String,
    /// Section the news list is rendered into.
    pub news_section: String,
    /// Maximum number of featured news items shown before past news.
    pub featured_news_limit: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            publications_file: "publications.json".to_string(),
            news_file: "data/news.json".to_string(),
            publications_section: "publications".to_string(),
            news_section: "news".to_string(),
            featured_news_limit: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Section activated by `start()`. When absent, the first section wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_section: Option<String>,
    /// Scroll offset past which the navbar is in its "scrolled" state.
    pub scroll_threshold_px: u32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            initial_section: None,
            scroll_threshold_px: 50,
        }
    }
}

/// A base delay plus a per-element stride, applied in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stagger {
    pub base_ms: u64,
    pub stride_ms: u64,
}

impl Stagger {
    pub const fn new(base_ms: u64, stride_ms: u64) -> Self {
        Self { base_ms, stride_ms }
    }

    /// Delay of the `index`-th element of the group. Saturates at `u64::MAX`.
    pub fn delay_for(&self, index: usize) -> u64 {
        self.stride_ms
            .saturating_mul(index as u64)
            .saturating_add(self.base_ms)
    }
}

/// Per-section overrides of the group staggers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionTimings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Stagger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_item: Option<Stagger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_control: Option<Stagger>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Settle delay before the hero block is revealed.
    pub hero_delay_ms: u64,
    pub header: Stagger,
    pub card: Stagger,
    pub list_item: Stagger,
    pub filter_control: Stagger,
    /// Overrides keyed by section id.
    pub sections: BTreeMap<String, SectionTimings>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            hero_delay_ms: 100,
            header: Stagger::new(200, 150),
            card: Stagger::new(300, 100),
            list_item: Stagger::new(400, 50),
            filter_control: Stagger::new(350, 75),
            sections: BTreeMap::new(),
        }
    }
}

impl AnimationConfig {
    /// Stagger for a grouped role within a section, honoring overrides.
    ///
    /// The hero is a single element revealed at `hero_delay_ms`.
    pub fn stagger_for(&self, section: &str, role: ElementRole) -> Stagger {
        let timings = self.sections.get(section);
        let pick = |over: Option<Stagger>, stock: Stagger| over.unwrap_or(stock);
        match role {
            ElementRole::Hero => Stagger::new(self.hero_delay_ms, 0),
            ElementRole::Header => self.header,
            ElementRole::Card => pick(timings.and_then(|t| t.card), self.card),
            ElementRole::ListItem => pick(timings.and_then(|t| t.list_item), self.list_item),
            ElementRole::FilterControl => {
                pick(timings.and_then(|t| t.filter_control), self.filter_control)
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut staggers = vec![
            ("animation.header", self.header),
            ("animation.card", self.card),
            ("animation.list_item", self.list_item),
            ("animation.filter_control", self.filter_control),
        ];
        for timings in self.sections.values() {
            staggers.extend(timings.card.map(|s| ("animation.sections.*.card", s)));
            staggers.extend(timings.list_item.map(|s| ("animation.sections.*.list_item", s)));
            staggers.extend(
                timings
                    .filter_control
                    .map(|s| ("animation.sections.*.filter_control", s)),
            );
        }
        for (key, stagger) in staggers {
            if stagger.stride_ms == 0 {
                return Err(ConfigError::Validation(format!(
                    "{key}.stride_ms must be non-zero"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Section whose content items are filtered.
    pub section: String,
    /// Token that matches every item.
    pub all_token: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            section: "publications".to_string(),
            all_token: "all".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Section hosting the search box and results.
    pub section: String,
    /// Queries shorter than this (after trimming) return no results.
    pub min_query_chars: usize,
    pub max_results: usize,
    /// Excerpt window, centered on the first match.
    pub excerpt_chars: usize,
    /// Paragraphs must be longer than this to be indexed.
    pub paragraph_min_chars: usize,
    /// Result title for paragraphs with no preceding heading.
    pub default_title: String,
    /// Quiet period after the last keystroke before a query runs.
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            section: "search".to_string(),
            min_query_chars: 3,
            max_results: 8,
            excerpt_chars: 150,
            paragraph_min_chars: 50,
            default_title: "Content".to_string(),
            debounce_ms: 300,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Lab Site Configuration
# ======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Content data files (paths relative to the content root)
# ---------------------------------------------------------------------------
[content]
publications_file = "publications.json"
news_file = "data/news.json"

# Sections the data files are rendered into.
publications_section = "publications"
news_section = "news"

# At most this many featured news items are listed before past news.
featured_news_limit = 5

# ---------------------------------------------------------------------------
# Navigation
# ---------------------------------------------------------------------------
[navigation]
# Section shown first. Defaults to the first section in document order.
# initial_section = "home"

# Scroll offset (px) past which the navbar switches to its compact style.
scroll_threshold_px = 50

# ---------------------------------------------------------------------------
# Reveal animation timings (milliseconds)
# ---------------------------------------------------------------------------
[animation]
# Settle delay before the hero block appears.
hero_delay_ms = 100

# Each group reveals its elements at base_ms + stride_ms * index.
[animation.header]
base_ms = 200
stride_ms = 150

[animation.card]
base_ms = 300
stride_ms = 100

[animation.list_item]
base_ms = 400
stride_ms = 50

[animation.filter_control]
base_ms = 350
stride_ms = 75

# Per-section overrides of card / list_item / filter_control, e.g.:
# [animation.sections.publications.list_item]
# base_ms = 600
# stride_ms = 60
[animation.sections]

# ---------------------------------------------------------------------------
# Category filter
# ---------------------------------------------------------------------------
[filter]
section = "publications"
# Token that shows every item.
all_token = "all"

# ---------------------------------------------------------------------------
# Search
# ---------------------------------------------------------------------------
[search]
section = "search"
# Shorter queries (after trimming) return no results.
min_query_chars = 3
max_results = 8
# Excerpt length, centered on the first match.
excerpt_chars = 150
# Paragraphs at or under this length are not indexed.
paragraph_min_chars = 50
# Result title for paragraphs with no heading before them.
default_title = "Content"
# Quiet period after the last keystroke before the query runs.
debounce_ms = 300
"##
}
