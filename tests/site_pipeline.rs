//! Scan the fixture site and drive the controller built from it.

use std::fs;
use std::path::PathBuf;

use labsite::navigation::NavigationController;
use labsite::output::{format_page_inventory, format_validation_report};
use labsite::publications::{PublicationMetrics, merge_publications};
use labsite::scan::scan;
use labsite::types::ElementRole;
use labsite::validate::validate_site;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

#[test]
fn fixture_site_starts_on_home() {
    let site = scan(&fixtures()).unwrap();
    let mut nav = NavigationController::new(site.page, site.config);
    let activation = nav.start().unwrap();
    assert_eq!(activation.current, "home");
    // hero + 2 headers + 3 cards
    assert_eq!(activation.plan.len(), 6);
    nav.advance(10_000);
    assert_eq!(nav.revealed_count("home"), 6);
}

#[test]
fn every_scanned_section_reveals_its_whole_plan() {
    let site = scan(&fixtures()).unwrap();
    let ids: Vec<String> = site.page.section_ids().map(str::to_string).collect();
    let mut nav = NavigationController::new(site.page, site.config);
    for id in ids {
        let plan = nav.activate(&id).unwrap().plan;
        let tick = nav.advance(plan.settle_ms());
        assert_eq!(tick.revealed.len(), plan.len(), "section {id}");
        assert_eq!(nav.revealed_count(&id), plan.len(), "section {id}");
        assert_eq!(nav.pending_reveals(), 0);
    }
}

#[test]
fn split_section_files_reveal_every_element_once() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("010-team.md"), "# Team\n\n## Faculty\n\n### Director\n").unwrap();
    fs::write(tmp.path().join("020-team.md"), "## Students\n\n### Postdoc\n").unwrap();
    let site = scan(tmp.path()).unwrap();
    let mut nav = NavigationController::new(site.page, site.config);

    let plan = nav.start().unwrap().plan;
    // hero + 2 headers + 2 cards
    assert_eq!(plan.len(), 5);
    let tick = nav.advance(plan.settle_ms());
    assert_eq!(tick.revealed.len(), plan.len());
    assert_eq!(nav.revealed_count("team"), plan.len());
}

#[test]
fn publications_section_uses_override_timing() {
    let site = scan(&fixtures()).unwrap();
    let mut nav = NavigationController::new(site.page, site.config);
    let plan = nav.activate("publications").unwrap().plan;
    let rows = plan
        .groups
        .iter()
        .find(|g| g.role == ElementRole::ListItem)
        .unwrap();
    assert_eq!((rows.base_ms, rows.stride_ms), (600, 60));
    assert_eq!(rows.elements.len(), 6);
}

#[test]
fn publication_filters_follow_categories() {
    let site = scan(&fixtures()).unwrap();
    let mut nav = NavigationController::new(site.page, site.config);
    // Two IEEE Transactions papers.
    assert_eq!(nav.select_filter("ieee").unwrap().visible, 2);
    // Technometrics and Journal of Quality Technology.
    assert_eq!(nav.select_filter("journals").unwrap().visible, 2);
    // AAAI proceedings and the arXiv preprint.
    assert_eq!(nav.select_filter("conferences").unwrap().visible, 2);
    assert_eq!(nav.select_filter("llms").unwrap().visible, 1);
    assert_eq!(nav.select_filter("all").unwrap().visible, 6);
}

#[test]
fn search_spans_markdown_and_data_sections() {
    let site = scan(&fixtures()).unwrap();
    let mut nav = NavigationController::new(site.page, site.config);
    let sections: Vec<String> = nav
        .search_now("tensor")
        .iter()
        .map(|h| h.section.clone())
        .collect();
    assert!(sections.contains(&"home".to_string()));
    assert!(sections.contains(&"publications".to_string()));
    assert!(sections.contains(&"news".to_string()));
}

#[test]
fn hidden_news_is_not_listed() {
    let site = scan(&fixtures()).unwrap();
    let news = site.page.section("news").unwrap();
    let rows = news.group(ElementRole::ListItem);
    assert_eq!(rows, ["news-001", "news-002", "news-003"]);
}

#[test]
fn fixture_data_is_valid() {
    let site = scan(&fixtures()).unwrap();
    let report = validate_site(&fixtures(), &site.config, &site.page, 2026);
    assert!(report.is_clean(), "{:#?}", format_validation_report(&report));
}

#[test]
fn inventory_covers_every_section() {
    let site = scan(&fixtures()).unwrap();
    let lines = format_page_inventory(&site.page);
    assert_eq!(lines[1], "001 SAIL Lab (home)");
    assert_eq!(lines.last().unwrap().split(' ').next(), Some("6"));
}

#[test]
fn metrics_and_merge_over_fixture_publications() {
    let site = scan(&fixtures()).unwrap();
    let metrics = PublicationMetrics::compute(&site.publications, 2026);
    assert_eq!(metrics.total_publications, 6);
    assert_eq!(metrics.total_citations, 167);
    assert_eq!(metrics.high_impact_publications, 2);
    assert_eq!(metrics.h_index, 5);

    let refetched = site.publications.clone();
    let outcome = merge_publications(site.publications, refetched);
    assert_eq!(outcome.added, 0);
    assert_eq!(outcome.merged.len(), 6);
}
