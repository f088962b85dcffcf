//! Text formatting for page inventories, reports and search results.
//!
//! # Information-First Display
//!
//! Every entity leads with its positional index and title; ids and counts
//! follow as indented context lines. The same shape is used for sections,
//! validation findings and search hits so the output reads as an inventory.
//!
//! # Output Format
//!
//! ## Page inventory
//!
//! ```text
//! Sections
//! 001 SAIL Lab (home)
//!     Hero: home/hero
//!     Headers: 2
//!     Cards: 3
//! 002 Publications (publications)
//!     Headers: 2
//!     List items: 10
//!     Filter controls: 4
//!     Items: 10 (ieee 3, journals 4, conferences 3)
//!
//! 5 sections, 31 animated elements, 12 text blocks
//! ```
//!
//! ## Validation report
//!
//! ```text
//! Errors
//!     Publication 1: Empty title
//! Warnings
//!     News item 0: 'visible' should be true/false
//!
//! Summary: 1 errors, 1 warnings
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use std::collections::BTreeMap;

use crate::publications::PublicationMetrics;
use crate::search::SearchHit;
use crate::types::{ElementRole, PageStructure, Section};
use crate::validate::ValidationReport;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// Plain-text rendering of a search excerpt: highlights become `[...]`.
///
/// Excerpts are escaped by maud, which only ever emits `&amp;`, `&lt;`,
/// `&gt;` and `&quot;`; those four are all that needs decoding. `&amp;` goes
/// last so escaped entity text in the page stays literal.
fn excerpt_text(html: &str) -> String {
    let bracketed = html.replace("<mark>", "[").replace("</mark>", "]");
    strip_html_tags(&bracketed)
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

// ============================================================================
// Page inventory
// ============================================================================

fn section_lines(index: usize, section: &Section) -> Vec<String> {
    let ctx = indent(1);
    let mut lines = Vec::new();
    if section.title.is_empty() || section.title == section.id {
        lines.push(format!("{} {}", format_index(index), section.id));
    } else {
        lines.push(format!(
            "{} {} ({})",
            format_index(index),
            truncate_desc(&section.title, 60),
            section.id
        ));
    }
    if let Some(hero) = &section.hero {
        lines.push(format!("{ctx}Hero: {hero}"));
    }
    let counts = [
        ("Headers", ElementRole::Header),
        ("Cards", ElementRole::Card),
        ("List items", ElementRole::ListItem),
        ("Filter controls", ElementRole::FilterControl),
    ];
    for (label, role) in counts {
        let n = section.group(role).len();
        if n > 0 {
            lines.push(format!("{ctx}{label}: {n}"));
        }
    }
    if !section.items.is_empty() {
        let mut tags: BTreeMap<&str, usize> = BTreeMap::new();
        for item in &section.items {
            for tag in &item.tags {
                *tags.entry(tag.as_str()).or_default() += 1;
            }
        }
        // Control order first, then any remaining tags alphabetically.
        let mut parts = Vec::new();
        for control in &section.filters {
            if let Some(n) = tags.remove(control.token.as_str()) {
                parts.push(format!("{} {n}", control.token));
            }
        }
        parts.extend(tags.iter().map(|(tag, n)| format!("{tag} {n}")));
        if parts.is_empty() {
            lines.push(format!("{ctx}Items: {}", section.items.len()));
        } else {
            lines.push(format!(
                "{ctx}Items: {} ({})",
                section.items.len(),
                parts.join(", ")
            ));
        }
    }
    lines
}

/// Format the inventory of a page: every section with its element counts.
pub fn format_page_inventory(page: &PageStructure) -> Vec<String> {
    let mut lines = vec!["Sections".to_string()];
    let mut elements = 0;
    let mut text = 0;
    for (i, section) in page.sections.iter().enumerate() {
        lines.extend(section_lines(i + 1, section));
        elements += section.element_ids().count();
        text += section.text.len();
    }
    lines.push(String::new());
    lines.push(format!(
        "{} sections, {} animated elements, {} text blocks",
        page.sections.len(),
        elements,
        text
    ));
    lines
}

pub fn print_page_inventory(page: &PageStructure) {
    for line in format_page_inventory(page) {
        println!("{line}");
    }
}

// ============================================================================
// Validation
// ============================================================================

pub fn format_validation_report(report: &ValidationReport) -> Vec<String> {
    let mut lines = Vec::new();
    if !report.errors.is_empty() {
        lines.push("Errors".to_string());
        lines.extend(report.errors.iter().map(|e| format!("{}{e}", indent(1))));
    }
    if !report.warnings.is_empty() {
        lines.push("Warnings".to_string());
        lines.extend(report.warnings.iter().map(|w| format!("{}{w}", indent(1))));
    }
    if report.is_clean() {
        lines.push("All validations passed".to_string());
    }
    lines.push(String::new());
    lines.push(format!(
        "Summary: {} errors, {} warnings",
        report.errors.len(),
        report.warnings.len()
    ));
    lines
}

pub fn print_validation_report(report: &ValidationReport) {
    for line in format_validation_report(report) {
        println!("{line}");
    }
}

// ============================================================================
// Search results
// ============================================================================

/// Format search hits with their section and a plain-text excerpt.
///
/// ```text
/// 001 Our Team (team)
///     ...We study [causal] discovery in multi-agent systems...
/// ```
pub fn format_search_results(query: &str, hits: &[SearchHit]) -> Vec<String> {
    if hits.is_empty() {
        return vec![format!("No results for \"{}\"", query.trim())];
    }
    let mut lines = Vec::new();
    for (i, hit) in hits.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            hit.title,
            hit.section
        ));
        lines.push(format!("{}{}", indent(1), excerpt_text(&hit.excerpt_html)));
    }
    lines
}

// ============================================================================
// Publication metrics
// ============================================================================

pub fn format_metrics(metrics: &PublicationMetrics) -> Vec<String> {
    let ctx = indent(1);
    vec![
        "Publication metrics".to_string(),
        format!("{ctx}Publications: {}", metrics.total_publications),
        format!("{ctx}Citations: {}", metrics.total_citations),
        format!("{ctx}h-index: {}", metrics.h_index),
        format!("{ctx}IEEE Transactions: {}", metrics.ieee_transactions),
        format!(
            "{ctx}Journals / conferences: {} / {}",
            metrics.journal_publications, metrics.conference_publications
        ),
        format!(
            "{ctx}Recent: {} ({} citations)",
            metrics.recent_publications, metrics.recent_citations
        ),
        format!("{ctx}High impact: {}", metrics.high_impact_publications),
        format!("{ctx}Average citations: {:.1}", metrics.avg_citations),
    ]
}

pub fn print_metrics(metrics: &PublicationMetrics) {
    for line in format_metrics(metrics) {
        println!("{line}");
    }
}
