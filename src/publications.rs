//! Publication records and the publications section.
//!
//! Records come from `publications.json` (refreshed by an external Scholar
//! fetcher). This module categorizes them for the filter, merges freshly
//! fetched records without duplicating titles, computes impact metrics for the
//! stats counters, and lays the list out as a [`Section`].
//!
//! ## Categorization
//!
//! Topic tags come from case-insensitive keyword containment over
//! `title + " " + abstract`; a topic matches on its first keyword hit. The
//! venue category is exactly one of `ieee`, `journals` or `conferences`:
//!
//! | Venue contains | Category |
//! |----------------|----------|
//! | `ieee` | `ieee` |
//! | conference, proceedings, aaai, ijcai, kdd, ecml | `conferences` |
//! | journal, transactions, technometrics | `journals` |
//! | arxiv, preprint | `conferences` |
//! | anything else | `journals` |

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::types::{ContentItem, ElementRole, FilterControl, Section, TextBlock};

/// Topic table: filter token → keywords.
pub const TOPICS: &[(&str, &[&str])] = &[
    (
        "deep-learning",
        &[
            "deep learning", "neural network", "cnn", "rnn", "lstm", "transformer",
            "attention", "gnn", "graph neural", "convolution", "deep", "learning model",
        ],
    ),
    (
        "machine-learning",
        &[
            "machine learning", "classification", "clustering", "regression",
            "supervised", "unsupervised", "ensemble", "random forest", "svm",
        ],
    ),
    (
        "reinforcement-learning",
        &[
            "reinforcement learning", "q-learning", "policy", "reward", "agent",
            "multi-armed bandit", "thompson sampling", "drl", "deep reinforcement",
        ],
    ),
    (
        "time-series",
        &[
            "time series", "temporal", "forecasting", "prediction", "sequential",
            "arima", "spatiotemporal", "passenger flow", "traffic",
        ],
    ),
    (
        "anomaly-detection",
        &[
            "anomaly detection", "change detection", "outlier", "monitoring",
            "fault detection", "defect", "quality control",
        ],
    ),
    (
        "causal-inference",
        &[
            "causal", "causality", "dag", "directed acyclic", "causal discovery",
            "causal graph", "intervention",
        ],
    ),
    (
        "bayesian-methods",
        &[
            "bayesian", "prior", "posterior", "mcmc", "bayesian network",
            "probabilistic", "belief network",
        ],
    ),
    (
        "tensor-methods",
        &[
            "tensor", "tensor decomposition", "tucker", "cp decomposition",
            "tensor completion", "tensor factorization",
        ],
    ),
    (
        "functional-data",
        &[
            "functional data", "functional", "profile", "curve", "fda",
            "functional principal component",
        ],
    ),
    (
        "graph-learning",
        &[
            "graph", "network", "community detection", "graph learning",
            "relational", "node", "edge", "connectivity",
        ],
    ),
    (
        "statistical-modeling",
        &[
            "statistical", "regression", "hypothesis", "significance",
            "inference", "estimation", "anova", "glm",
        ],
    ),
    (
        "optimization",
        &[
            "optimization", "bilevel", "constraint", "objective function",
            "linear programming", "convex", "optimization problem",
        ],
    ),
    (
        "transportation",
        &[
            "metro", "subway", "transportation", "traffic", "urban",
            "passenger", "mobility", "transit",
        ],
    ),
    (
        "manufacturing",
        &[
            "manufacturing", "production", "industrial", "semiconductor",
            "assembly", "supply chain", "remanufacturing",
        ],
    ),
    (
        "medical-ai",
        &[
            "medical", "clinical", "diagnosis", "patient", "healthcare",
            "disease", "immunofixation", "glaucoma",
        ],
    ),
    (
        "llms",
        &[
            "large language model", "large language models", "llm", "llms",
            "language model", "gpt", "bert", "natural language", "nlp",
            "text generation", "language understanding",
        ],
    ),
];

pub const VENUE_CATEGORIES: &[(&str, &str)] = &[
    ("ieee", "IEEE Transactions"),
    ("journals", "Journals"),
    ("conferences", "Conferences"),
];

/// A publication as stored in `publications.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub citations: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub r#abstract: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub eprint_url: String,
}

impl Publication {
    /// Best link to the paper: the eprint when present.
    pub fn pdf_url(&self) -> Option<&str> {
        [self.eprint_url.as_str(), self.url.as_str()]
            .into_iter()
            .find(|u| !u.is_empty())
    }

    /// Author list with " and " separators normalized to commas.
    pub fn display_authors(&self) -> String {
        let joined = self.authors.replace(" and ", ", ");
        joined
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Title key used to detect duplicates.
    fn dedup_key(&self) -> String {
        self.title.trim().to_lowercase()
    }
}

/// Categories assigned to one publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categories {
    pub topics: BTreeSet<&'static str>,
    pub venue: &'static str,
}

impl Categories {
    /// Filter tags: topics plus the venue category.
    pub fn tags(&self) -> BTreeSet<String> {
        self.topics
            .iter()
            .chain(std::iter::once(&self.venue))
            .map(|t| t.to_string())
            .collect()
    }
}

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

pub fn venue_category(venue: &str) -> &'static str {
    let venue = venue.to_lowercase();
    if venue.contains("ieee") {
        "ieee"
    } else if contains_any(&venue, &["conference", "proceedings", "aaai", "ijcai", "kdd", "ecml"]) {
        "conferences"
    } else if contains_any(&venue, &["journal", "transactions", "technometrics"]) {
        "journals"
    } else if contains_any(&venue, &["arxiv", "preprint"]) {
        "conferences"
    } else {
        "journals"
    }
}

pub fn categorize(publication: &Publication) -> Categories {
    let text = format!("{} {}", publication.title, publication.r#abstract).to_lowercase();
    let topics = TOPICS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(topic, _)| *topic)
        .collect();
    Categories {
        topics,
        venue: venue_category(&publication.venue),
    }
}

/// Filter button label for a topic token.
pub fn topic_label(topic: &str) -> String {
    if topic == "llms" {
        return "LLMs".to_string();
    }
    topic
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Merging fetched records
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub merged: Vec<Publication>,
    pub added: usize,
}

/// Append fetched records whose title is new; existing records keep their order.
///
/// Titles compare trimmed and lowercased. Records with empty titles are dropped.
pub fn merge_publications(existing: Vec<Publication>, fetched: Vec<Publication>) -> MergeOutcome {
    let mut seen: HashSet<String> = existing.iter().map(Publication::dedup_key).collect();
    let mut merged = existing;
    let mut added = 0;
    for publication in fetched {
        let key = publication.dedup_key();
        if !key.is_empty() && seen.insert(key) {
            merged.push(publication);
            added += 1;
        }
    }
    MergeOutcome { merged, added }
}

// =============================================================================
// Metrics
// =============================================================================

/// Impact numbers shown by the home page stats counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PublicationMetrics {
    pub total_publications: usize,
    pub total_citations: u64,
    pub ieee_transactions: usize,
    pub journal_publications: usize,
    pub conference_publications: usize,
    pub recent_publications: usize,
    pub recent_citations: u64,
    pub high_impact_publications: usize,
    pub h_index: usize,
    pub avg_citations: f64,
}

pub const HIGH_IMPACT_CITATIONS: u32 = 50;
pub const RECENT_YEARS: i32 = 5;

impl PublicationMetrics {
    /// Compute metrics; "recent" means the last five years up to `current_year`.
    pub fn compute(publications: &[Publication], current_year: i32) -> Self {
        let total_publications = publications.len();
        let total_citations = publications.iter().map(|p| u64::from(p.citations)).sum();
        let recent_from = current_year - (RECENT_YEARS - 1);
        let recent: Vec<&Publication> = publications
            .iter()
            .filter(|p| (recent_from..=current_year).contains(&p.year))
            .collect();

        let mut journal_publications = 0;
        let mut conference_publications = 0;
        let mut ieee_transactions = 0;
        for p in publications {
            let venue = p.venue.to_lowercase();
            if venue.contains("ieee") && venue.contains("transaction") {
                ieee_transactions += 1;
            }
            if contains_any(&venue, &["journal", "transactions", "technometrics"]) {
                journal_publications += 1;
            } else if contains_any(&venue, &["conference", "proceedings", "aaai", "ijcai"]) {
                conference_publications += 1;
            }
        }

        Self {
            total_publications,
            total_citations,
            ieee_transactions,
            journal_publications,
            conference_publications,
            recent_publications: recent.len(),
            recent_citations: recent.iter().map(|p| u64::from(p.citations)).sum(),
            high_impact_publications: publications
                .iter()
                .filter(|p| p.citations >= HIGH_IMPACT_CITATIONS)
                .count(),
            h_index: h_index(publications.iter().map(|p| p.citations)),
            avg_citations: if total_publications == 0 {
                0.0
            } else {
                total_citations as f64 / total_publications as f64
            },
        }
    }
}

/// Largest `h` such that `h` papers have at least `h` citations each.
pub fn h_index(citations: impl IntoIterator<Item = u32>) -> usize {
    let mut sorted: Vec<u32> = citations.into_iter().collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
        .iter()
        .enumerate()
        .take_while(|(i, c)| **c as usize > *i)
        .count()
}

// =============================================================================
// Section layout
// =============================================================================

/// Lay publications out as a filterable section.
///
/// Newest year first, one header per year, one list row and one content item
/// per publication (ids `pub-001`, ... in display order). Filter controls:
/// the all-token, the venue categories, then every topic.
pub fn publications_section(
    id: &str,
    publications: &[Publication],
    all_token: &str,
) -> Section {
    let mut section = Section::new(id, "Publications");

    section.filters.push(FilterControl::new(all_token, "All Publications"));
    for (token, label) in VENUE_CATEGORIES {
        section.filters.push(FilterControl::new(*token, *label));
    }
    for (topic, _) in TOPICS {
        section.filters.push(FilterControl::new(*topic, topic_label(topic)));
    }
    for control in &section.filters.clone() {
        section.push_element(
            ElementRole::FilterControl,
            format!("{id}/filter-{}", control.token),
        );
    }

    let mut by_year: BTreeMap<i32, Vec<&Publication>> = BTreeMap::new();
    for p in publications {
        by_year.entry(p.year).or_default().push(p);
    }

    let mut n = 0;
    for (year, pubs) in by_year.iter().rev() {
        section.push_element(ElementRole::Header, format!("{id}/year-{year}"));
        section.text.push(TextBlock::heading(format!("{year} Publications")));
        for p in pubs {
            n += 1;
            let item_id = format!("pub-{n:03}");
            section.push_element(ElementRole::ListItem, item_id.clone());
            section.items.push(ContentItem {
                id: item_id,
                tags: categorize(p).tags(),
            });
            section.text.push(TextBlock::paragraph(format!(
                "{}. {}. {} {}",
                p.title.trim(),
                p.display_authors(),
                p.year,
                p.venue
            )));
        }
    }
    section
}
