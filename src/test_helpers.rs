//! Shared test utilities for the labsite test suite.
//!
//! Provides page builders for controller tests and a fixture copier for
//! scan tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut nav = NavigationController::new(lab_page(), SiteConfig::default());
//! nav.start().unwrap();
//!
//! let tmp = setup_fixtures();
//! let site = scan(tmp.path()).unwrap();
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{ContentItem, ElementRole, FilterControl, PageStructure, Section, TextBlock};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Page builders
// =========================================================================

/// A section with a hero, `headers` headers and `cards` cards.
///
/// Element ids: `<id>/hero`, `<id>/header-N`, `<id>/card-N` (1-based).
pub fn sample_section(id: &str, headers: usize, cards: usize) -> Section {
    let mut section = Section::new(id, id);
    section.push_element(ElementRole::Hero, format!("{id}/hero"));
    for n in 1..=headers {
        section.push_element(ElementRole::Header, format!("{id}/header-{n}"));
    }
    for n in 1..=cards {
        section.push_element(ElementRole::Card, format!("{id}/card-{n}"));
    }
    section
}

/// Publication items tagged only with their venue category, in that order:
/// `ieee` items, then `journals`, then `conferences`.
pub fn venue_items(ieee: usize, journals: usize, conferences: usize) -> Vec<ContentItem> {
    let tags = std::iter::repeat_n("ieee", ieee)
        .chain(std::iter::repeat_n("journals", journals))
        .chain(std::iter::repeat_n("conferences", conferences));
    tags.enumerate()
        .map(|(i, tag)| ContentItem::new(format!("pub-{:03}", i + 1), [tag]))
        .collect()
}

/// A five-section lab page: home, research, team, publications, search.
///
/// The word "causal" appears exactly once, in a team paragraph under the
/// "Our Team" heading. Publications hold 10 items (3 ieee, 4 journals,
/// 3 conferences) with controls for `all` and the three venues.
pub fn lab_page() -> PageStructure {
    let mut home = sample_section("home", 2, 3);
    home.title = "SAIL Lab".into();
    home.text = vec![
        TextBlock::heading("SAIL Lab"),
        TextBlock::paragraph(
            "Statistical and artificial intelligence research for engineering systems.",
        ),
    ];

    let mut research = sample_section("research", 1, 4);
    research.title = "Research".into();
    research.text = vec![
        TextBlock::heading("Research Areas"),
        TextBlock::paragraph(
            "Anomaly detection, reinforcement learning and tensor methods for industrial data.",
        ),
    ];

    let mut team = Section::new("team", "Team");
    team.push_element(ElementRole::Header, "team/header-1");
    for n in 1..=3 {
        team.push_element(ElementRole::Card, format!("team/card-{n}"));
    }
    team.text = vec![
        TextBlock::heading("Our Team"),
        TextBlock::paragraph(
            "We study causal discovery in multi-agent systems and build tools for large-scale inference.",
        ),
    ];

    let mut publications = Section::new("publications", "Publications");
    publications.filters = vec![
        FilterControl::new("all", "All Publications"),
        FilterControl::new("ieee", "IEEE Transactions"),
        FilterControl::new("journals", "Journals"),
        FilterControl::new("conferences", "Conferences"),
    ];
    for control in publications.filters.clone() {
        publications.push_element(
            ElementRole::FilterControl,
            format!("publications/filter-{}", control.token),
        );
    }
    publications.items = venue_items(3, 4, 3);
    for item in publications.items.clone() {
        publications.push_element(ElementRole::ListItem, item.id);
    }
    publications.text = vec![TextBlock::heading("2024 Publications")];

    let mut search = Section::new("search", "Search");
    search.push_element(ElementRole::Header, "search/header-1");

    PageStructure::new(vec![home, research, team, publications, search])
}
