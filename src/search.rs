//! In-page text search.
//!
//! The index is built once from every section's text blocks: one entry per
//! heading (titled by itself) and one per paragraph longer than
//! `paragraph_min_chars` (titled by the nearest preceding heading in the same
//! section, or the configured default title). Queries are trimmed of
//! surrounding whitespace, then must be at least `min_query_chars` long; the
//! trimmed text is matched as a case-insensitive substring, in index order,
//! capped at `max_results`. Inner whitespace is kept, so `" causal "` finds
//! "causal" but `"causal  discovery"` does not match a single space.
//!
//! Each hit carries an HTML excerpt of about `excerpt_chars` characters
//! centered on the first occurrence, with every occurrence inside the window
//! wrapped in `<mark>`. Excerpt text is escaped with maud, so page text can
//! never inject markup into the results list.

use maud::{Markup, html};

use crate::config::SearchConfig;
use crate::types::{PageStructure, TextKind};

/// One indexed text fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEntry {
    pub section: String,
    pub title: String,
    pub content: String,
    pub kind: TextKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Position of the matched entry in the index.
    pub entry: usize,
    pub section: String,
    pub title: String,
    /// Escaped excerpt with `<mark>` around occurrences.
    pub excerpt_html: String,
}

#[derive(Debug, Clone)]
pub struct SearchIndex {
    config: SearchConfig,
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn build(page: &PageStructure, config: &SearchConfig) -> Self {
        let mut entries = Vec::new();
        for section in &page.sections {
            let mut current_heading: Option<&str> = None;
            for block in &section.text {
                let text = block.text.trim();
                match block.kind {
                    TextKind::Heading => {
                        current_heading = Some(text);
                        entries.push(SearchEntry {
                            section: section.id.clone(),
                            title: text.to_string(),
                            content: text.to_string(),
                            kind: TextKind::Heading,
                        });
                    }
                    TextKind::Paragraph if text.chars().count() > config.paragraph_min_chars => {
                        entries.push(SearchEntry {
                            section: section.id.clone(),
                            title: current_heading
                                .unwrap_or(&config.default_title)
                                .to_string(),
                            content: text.to_string(),
                            kind: TextKind::Paragraph,
                        });
                    }
                    TextKind::Paragraph => {}
                }
            }
        }
        Self {
            config: config.clone(),
            entries,
        }
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run a query. Too-short queries return no results rather than an error.
    pub fn query(&self, text: &str) -> Vec<SearchHit> {
        let needle = text.trim();
        if needle.chars().count() < self.config.min_query_chars {
            return Vec::new();
        }
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                let first = find_ignore_case(&entry.content, needle, 0)?;
                Some(SearchHit {
                    entry: i,
                    section: entry.section.clone(),
                    title: entry.title.clone(),
                    excerpt_html: excerpt(&entry.content, needle, first, self.config.excerpt_chars)
                        .into_string(),
                })
            })
            .take(self.config.max_results)
            .collect()
    }
}

/// Byte range of the first case-insensitive occurrence of `needle` in
/// `haystack` starting at or after byte `from`.
fn find_ignore_case(haystack: &str, needle: &str, from: usize) -> Option<(usize, usize)> {
    let wanted: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if wanted.is_empty() {
        return None;
    }
    for (start, _) in haystack[from..].char_indices() {
        let start = from + start;
        let mut pos = 0;
        for (offset, c) in haystack[start..].char_indices() {
            for lower in c.to_lowercase() {
                if pos < wanted.len() && lower == wanted[pos] {
                    pos += 1;
                } else {
                    pos = usize::MAX;
                    break;
                }
            }
            if pos == usize::MAX {
                break;
            }
            if pos == wanted.len() {
                return Some((start, start + offset + c.len_utf8()));
            }
        }
    }
    None
}

enum Segment<'a> {
    Plain(&'a str),
    Hit(&'a str),
}

/// Window of about `width` chars centered on the match at `first`, with all
/// occurrences inside the window highlighted.
fn excerpt(content: &str, needle: &str, first: (usize, usize), width: usize) -> Markup {
    let total = content.chars().count();
    let (window_start, window_end) = if total <= width {
        (0, content.len())
    } else {
        let match_char = content[..first.0].chars().count();
        let start_char = match_char
            .saturating_sub(width / 2)
            .min(total - width);
        let start = byte_offset(content, start_char);
        let end = byte_offset(content, start_char + width);
        // Never cut through the first match.
        (start.min(first.0), end.max(first.1))
    };

    let window = &content[window_start..window_end];
    let mut segments = Vec::new();
    let mut cursor = 0;
    while let Some((s, e)) = find_ignore_case(window, needle, cursor) {
        if s > cursor {
            segments.push(Segment::Plain(&window[cursor..s]));
        }
        segments.push(Segment::Hit(&window[s..e]));
        cursor = e;
    }
    if cursor < window.len() {
        segments.push(Segment::Plain(&window[cursor..]));
    }

    html! {
        @if window_start > 0 { "..." }
        @for segment in &segments {
            @match segment {
                Segment::Plain(text) => { (text) }
                Segment::Hit(text) => { mark { (text) } }
            }
        }
        @if window_end < content.len() { "..." }
    }
}

fn byte_offset(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
