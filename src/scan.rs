//! Content directory scanning.
//!
//! Builds the [`PageStructure`] the controller runs on from a content root:
//!
//! ```text
//! content/
//! ├── config.toml          # Site configuration (optional)
//! ├── 010-home.md          # Section (numbered = ordered by number)
//! ├── 020-research.md
//! ├── 030-team.md
//! ├── 040-publications.md  # Section body; the list comes from publications.json
//! ├── search.md            # Unnumbered sections sort after numbered ones
//! ├── publications.json    # Publication records
//! └── data/
//!     └── news.json        # News records
//! ```
//!
//! ## Markdown sections
//!
//! Each `*.md` file in the root is one section, id and order taken from the
//! file stem ([`crate::naming`]). Inside a file:
//!
//! - a leading `# H1` is the hero and names the section
//! - `## H2` headings are section headers (`<id>/header-N`)
//! - `### H3` headings are cards (`<id>/card-N`)
//! - list items are list rows (`<id>/item-N`)
//!
//! Every heading, paragraph and list item also becomes a text block for search.
//!
//! ## Data files
//!
//! Publication and news records are laid out by [`crate::publications`] and
//! [`crate::news`] and merged into the sections named in `[content]`, which
//! are created when no markdown file declares them. Missing data files are
//! skipped. Individual malformed records are skipped with a warning; a file
//! that is not a JSON array is an error.

use log::{info, warn};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{self, SiteConfig};
use crate::naming::parse_section_name;
use crate::news::{self, NewsItem};
use crate::publications::{self, Publication};
use crate::types::{ElementRole, PageStructure, Section, TextBlock};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Everything read from a content root.
#[derive(Debug, Clone)]
pub struct Site {
    pub config: SiteConfig,
    pub page: PageStructure,
    pub publications: Vec<Publication>,
    pub news: Vec<NewsItem>,
}

/// Scan a content root, loading `config.toml` from it.
pub fn scan(root: &Path) -> Result<Site, ScanError> {
    let config = config::load_config(root)?;
    scan_with_config(root, config)
}

pub fn scan_with_config(root: &Path, config: SiteConfig) -> Result<Site, ScanError> {
    let mut page = PageStructure::new(parse_sections(root)?);

    let publications: Vec<Publication> =
        load_records(&root.join(&config.content.publications_file))?;
    if !publications.is_empty() {
        page.upsert(publications::publications_section(
            &config.content.publications_section,
            &publications,
            &config.filter.all_token,
        ));
    }

    let news: Vec<NewsItem> = load_records(&root.join(&config.content.news_file))?;
    if !news.is_empty() {
        page.upsert(news::news_section(
            &config.content.news_section,
            &news,
            config.content.featured_news_limit,
        ));
    }

    info!(
        "event=scan module=scan root={} sections={} publications={} news={}",
        root.display(),
        page.sections.len(),
        publications.len(),
        news.len()
    );

    Ok(Site {
        config,
        page,
        publications,
        news,
    })
}

/// Parse all markdown files in the root directory into sections.
fn parse_sections(root: &Path) -> Result<Vec<Section>, ScanError> {
    let md_files: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();

    let mut named = Vec::new();
    for path in md_files {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let name = parse_section_name(&stem);
        if name.id.is_empty() {
            warn!(
                "event=skip module=scan file={} reason=no-section-name",
                path.display()
            );
            continue;
        }
        named.push((name, path));
    }
    named.sort_by_key(|(name, _)| name.sort_key());

    let mut sections: Vec<Section> = Vec::new();
    for (name, path) in named {
        let body = fs::read_to_string(&path)?;
        match sections.iter_mut().find(|s| s.id == name.id) {
            // Later files of the same id continue its element numbering.
            Some(existing) => {
                warn!(
                    "event=merge module=scan section={} file={}",
                    name.id,
                    path.display()
                );
                parse_markdown_into(existing, &body);
            }
            None => sections.push(parse_markdown_section(&name.id, &name.title, &body)),
        }
    }
    Ok(sections)
}

#[derive(Clone, Copy, PartialEq)]
enum Block {
    Heading(HeadingLevel),
    Paragraph,
    Item,
}

/// Build one section from its markdown body.
///
/// `fallback_title` is used when the body has no leading H1.
pub fn parse_markdown_section(id: &str, fallback_title: &str, markdown: &str) -> Section {
    let mut section = Section::new(id, fallback_title);
    parse_markdown_into(&mut section, markdown);
    section
}

/// Append the blocks of `markdown` to `section`.
///
/// Element numbers continue from the section's existing groups, and a
/// leading H1 is only the hero when the section is still empty.
pub fn parse_markdown_into(section: &mut Section, markdown: &str) {
    let mut open: Option<(Block, String)> = None;
    let mut seen_block = !section.text.is_empty() || section.element_ids().next().is_some();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                open = Some((Block::Heading(level), String::new()));
            }
            Event::Start(Tag::Paragraph) if open.is_none() => {
                open = Some((Block::Paragraph, String::new()));
            }
            Event::Start(Tag::Item) => {
                // A nested list closes its parent row.
                if let Some((Block::Item, text)) = open.take() {
                    push_block(section, Block::Item, &text, &mut seen_block);
                }
                open = Some((Block::Item, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = open.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, buf)) = open.as_mut() {
                    buf.push(' ');
                }
            }
            Event::End(end) => {
                let closes = matches!(
                    (end, &open),
                    (TagEnd::Heading(_), Some((Block::Heading(_), _)))
                        | (TagEnd::Paragraph, Some((Block::Paragraph, _)))
                        | (TagEnd::Item, Some((Block::Item, _)))
                );
                if closes {
                    if let Some((block, text)) = open.take() {
                        push_block(section, block, &text, &mut seen_block);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_block(section: &mut Section, block: Block, text: &str, seen_block: &mut bool) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let first = !*seen_block;
    *seen_block = true;
    let id = section.id.clone();
    match block {
        Block::Heading(HeadingLevel::H1) if first => {
            section.push_element(ElementRole::Hero, format!("{id}/hero"));
            section.title = text.to_string();
            section.text.push(TextBlock::heading(text));
        }
        Block::Heading(HeadingLevel::H1 | HeadingLevel::H2) => {
            let n = section.headers.len() + 1;
            section.push_element(ElementRole::Header, format!("{id}/header-{n}"));
            section.text.push(TextBlock::heading(text));
        }
        Block::Heading(HeadingLevel::H3) => {
            let n = section.group(ElementRole::Card).len() + 1;
            section.push_element(ElementRole::Card, format!("{id}/card-{n}"));
            section.text.push(TextBlock::heading(text));
        }
        Block::Heading(_) => section.text.push(TextBlock::heading(text)),
        Block::Paragraph => section.text.push(TextBlock::paragraph(text)),
        Block::Item => {
            let n = section.group(ElementRole::ListItem).len() + 1;
            section.push_element(ElementRole::ListItem, format!("{id}/item-{n}"));
            section.text.push(TextBlock::paragraph(text));
        }
    }
}

/// Read a JSON array of records. A missing file yields no records.
fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ScanError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    let raw: Vec<serde_json::Value> =
        serde_json::from_str(&content).map_err(|source| ScanError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    let mut records = Vec::with_capacity(raw.len());
    for (i, value) in raw.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(record) => records.push(record),
            Err(e) => warn!(
                "event=skip module=scan file={} index={i} error={e}",
                path.display()
            ),
        }
    }
    Ok(records)
}
