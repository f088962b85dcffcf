//! Data file and page structure checks.
//!
//! Works on raw [`serde_json::Value`]s rather than typed records so that a
//! wrong type is reported instead of aborting the whole file. Problems that
//! break rendering are errors; suspicious values are warnings.

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::types::PageStructure;

pub const NEWS_REQUIRED_FIELDS: &[&str] = &[
    "id",
    "date",
    "month",
    "day",
    "year",
    "icon",
    "category",
    "title",
    "description",
    "visible",
    "featured",
];

pub const PUBLICATION_REQUIRED_FIELDS: &[&str] = &["title", "authors", "venue", "year"];

/// Earliest publication year not flagged as unusual.
pub const EARLIEST_YEAR: i64 = 1990;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

// =============================================================================
// JSON files
// =============================================================================

/// Parse a data file as a JSON array, recording problems in `report`.
fn read_array(path: &Path, report: &mut ValidationReport) -> Option<Vec<Value>> {
    let label = path.display();
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => {
            report.error(format!("File not found: {label}"));
            return None;
        }
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(items)) => Some(items),
        Ok(_) => {
            report.error(format!("{label}: expected a JSON array"));
            None
        }
        Err(e) => {
            report.error(format!("{label}: Invalid JSON - {e}"));
            None
        }
    }
}

fn missing_fields(label: &str, items: &[Value], required: &[&str], report: &mut ValidationReport) {
    for (i, item) in items.iter().enumerate() {
        for field in required {
            if item.get(field).is_none() {
                report.error(format!("{label}[{i}]: Missing required field '{field}'"));
            }
        }
    }
}

// =============================================================================
// News
// =============================================================================

pub fn validate_news(items: &[Value]) -> ValidationReport {
    let mut report = ValidationReport::default();
    missing_fields("news", items, NEWS_REQUIRED_FIELDS, &mut report);

    let mut seen = BTreeSet::new();
    let mut duplicated = false;
    for item in items {
        if let Some(id) = item.get("id").map(Value::to_string) {
            duplicated |= !seen.insert(id);
        }
    }
    if duplicated {
        report.error("Duplicate news IDs found");
    }

    for (i, item) in items.iter().enumerate() {
        let date = item.get("date").and_then(Value::as_str).unwrap_or("");
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            report.error(format!(
                "News item {i}: Invalid date format (should be YYYY-MM-DD)"
            ));
        }
        for field in ["visible", "featured"] {
            if !item.get(field).is_some_and(Value::is_boolean) {
                report.warning(format!("News item {i}: '{field}' should be true/false"));
            }
        }
    }
    report
}

// =============================================================================
// Publications
// =============================================================================

pub fn validate_publications(items: &[Value], current_year: i32) -> ValidationReport {
    let mut report = ValidationReport::default();
    missing_fields("publications", items, PUBLICATION_REQUIRED_FIELDS, &mut report);

    let latest = i64::from(current_year) + 2;
    for (i, item) in items.iter().enumerate() {
        let year = item.get("year");
        let year_ok = year
            .and_then(Value::as_i64)
            .is_some_and(|y| (EARLIEST_YEAR..=latest).contains(&y));
        if !year_ok {
            let shown = year.map_or_else(|| "null".to_string(), Value::to_string);
            report.warning(format!("Publication {i}: Unusual year value: {shown}"));
        }

        let title = item.get("title").and_then(Value::as_str).unwrap_or("");
        if title.trim().is_empty() {
            report.error(format!("Publication {i}: Empty title"));
        }

        if let Some(citations) = item.get("citations") {
            if citations.as_u64().is_none() {
                report.warning(format!(
                    "Publication {i}: Invalid citations count: {citations}"
                ));
            }
        }
    }
    report
}

// =============================================================================
// Page structure
// =============================================================================

pub fn validate_structure(page: &PageStructure, config: &SiteConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen = BTreeSet::new();
    for id in page.section_ids() {
        if !seen.insert(id) {
            report.error(format!("Duplicate section id: {id}"));
        }
    }
    for section in &page.sections {
        let mut elements = BTreeSet::new();
        for element in section.element_ids() {
            if !elements.insert(element) {
                report.error(format!(
                    "Duplicate element id in section '{}': {element}",
                    section.id
                ));
            }
        }
    }
    if page.sections.is_empty() {
        report.error("Page has no sections");
    }
    if page.section(&config.filter.section).is_none() {
        report.warning(format!(
            "Filterable section '{}' not found; filter controls will be inert",
            config.filter.section
        ));
    }
    if let Some(initial) = &config.navigation.initial_section {
        if page.section(initial).is_none() {
            report.error(format!("Initial section '{initial}' not found"));
        }
    }
    report
}

/// Validate the data files under a content root plus the page built from it.
pub fn validate_site(
    root: &Path,
    config: &SiteConfig,
    page: &PageStructure,
    current_year: i32,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    if let Some(items) = read_array(&root.join(&config.content.news_file), &mut report) {
        report.extend(validate_news(&items));
    }
    if let Some(items) = read_array(&root.join(&config.content.publications_file), &mut report) {
        report.extend(validate_publications(&items, current_year));
    }
    report.extend(validate_structure(page, config));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{lab_page, setup_fixtures};
    use crate::types::{ElementRole, Section};
    use serde_json::json;

    fn news_item(id: &str, date: &str) -> Value {
        json!({
            "id": id, "date": date, "month": "May", "day": "01", "year": "2024",
            "icon": "fas fa-trophy", "category": "award", "title": "Award",
            "description": "Won an award", "visible": true, "featured": false
        })
    }

    // =========================================================================
    // News
    // =========================================================================

    #[test]
    fn valid_news_is_clean() {
        let report = validate_news(&[news_item("news-001", "2024-05-01")]);
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn news_missing_fields_are_errors() {
        let report = validate_news(&[json!({"id": "news-001", "date": "2024-05-01"})]);
        assert_eq!(report.errors.len(), NEWS_REQUIRED_FIELDS.len() - 2);
        assert!(report.errors[0].contains("news[0]: Missing required field 'month'"));
    }

    #[test]
    fn duplicate_news_ids_reported_once() {
        let items = [
            news_item("news-001", "2024-05-01"),
            news_item("news-001", "2024-05-02"),
            news_item("news-001", "2024-05-03"),
        ];
        let report = validate_news(&items);
        assert_eq!(report.errors, vec!["Duplicate news IDs found"]);
    }

    #[test]
    fn bad_dates_are_errors() {
        let items = [
            news_item("news-001", "2024-13-01"),
            news_item("news-002", "May 1, 2024"),
        ];
        let report = validate_news(&items);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[1].starts_with("News item 1: Invalid date"));
    }

    #[test]
    fn non_boolean_flags_are_warnings() {
        let mut item = news_item("news-001", "2024-05-01");
        item["visible"] = json!("yes");
        let report = validate_news(&[item]);
        assert!(report.is_valid());
        assert_eq!(report.warnings, vec!["News item 0: 'visible' should be true/false"]);
    }

    // =========================================================================
    // Publications
    // =========================================================================

    #[test]
    fn publication_checks() {
        let items = [
            json!({"title": "Fine", "authors": "A", "venue": "V", "year": 2024, "citations": 3}),
            json!({"title": "  ", "authors": "A", "venue": "V", "year": 1985}),
            json!({"title": "Future", "authors": "A", "venue": "V", "year": 2031, "citations": -1}),
            json!({"title": "Str", "authors": "A", "venue": "V", "year": "2020", "citations": "many"}),
        ];
        let report = validate_publications(&items, 2026);
        assert_eq!(report.errors, vec!["Publication 1: Empty title"]);
        assert_eq!(
            report.warnings,
            vec![
                "Publication 1: Unusual year value: 1985",
                "Publication 2: Unusual year value: 2031",
                "Publication 2: Invalid citations count: -1",
                "Publication 3: Unusual year value: \"2020\"",
                "Publication 3: Invalid citations count: \"many\"",
            ]
        );
    }

    #[test]
    fn year_window_is_inclusive() {
        let items = [
            json!({"title": "Old", "authors": "A", "venue": "V", "year": 1990}),
            json!({"title": "Soon", "authors": "A", "venue": "V", "year": 2028}),
        ];
        assert!(validate_publications(&items, 2026).is_clean());
    }

    // =========================================================================
    // Structure and site
    // =========================================================================

    #[test]
    fn structure_of_lab_page_is_valid() {
        let report = validate_structure(&lab_page(), &SiteConfig::default());
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn duplicate_section_ids_and_missing_filter_section() {
        let page = PageStructure::new(vec![Section::new("home", "Home"), Section::new("home", "Again")]);
        let report = validate_structure(&page, &SiteConfig::default());
        assert_eq!(report.errors, vec!["Duplicate section id: home"]);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("'publications'"));
    }

    #[test]
    fn duplicate_element_ids_within_a_section_are_errors() {
        let mut first = Section::new("team", "Team");
        first.push_element(ElementRole::Header, "team/header-1");
        let mut second = Section::new("team", "Team");
        second.push_element(ElementRole::Header, "team/header-1");
        second.push_element(ElementRole::Card, "team/card-1");
        first.absorb(second);
        let mut people = Section::new("people", "People");
        people.push_element(ElementRole::Header, "team/header-1");
        let page = PageStructure::new(vec![first, people]);

        let report = validate_structure(&page, &SiteConfig::default());
        assert_eq!(
            report.errors,
            vec!["Duplicate element id in section 'team': team/header-1"]
        );
    }

    #[test]
    fn unknown_initial_section_is_error() {
        let mut config = SiteConfig::default();
        config.navigation.initial_section = Some("nowhere".into());
        let report = validate_structure(&lab_page(), &config);
        assert_eq!(report.errors, vec!["Initial section 'nowhere' not found"]);
    }

    #[test]
    fn fixtures_validate() {
        let tmp = setup_fixtures();
        let site = crate::scan::scan(tmp.path()).unwrap();
        let report = validate_site(tmp.path(), &site.config, &site.page, 2026);
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn missing_and_broken_files_are_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("publications.json"), "[{").unwrap();
        let config = SiteConfig::default();
        let report = validate_site(tmp.path(), &config, &lab_page(), 2026);
        assert!(report.errors[0].starts_with("File not found:"));
        assert!(report.errors[1].contains("Invalid JSON"));
    }
}
