//! Section file naming: the `NNN-name` convention.
//!
//! Markdown section files in the content root are ordered by an optional
//! numeric prefix. The rest of the stem becomes the section id (lowercased,
//! dashes kept) and, with dashes turned into spaces, its display title:
//!
//! - `010-home.md` → order 10, id `home`, title "home"
//! - `030-Our-Team.md` → order 30, id `our-team`, title "Our Team"
//! - `search.md` → no order, id `search`, title "search"

/// Result of parsing a section file stem like `030-Our-Team`.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionName {
    /// Number prefix if present (`30` from `030-Our-Team`).
    pub order: Option<u32>,
    /// Section id: the name part, lowercased. Empty if the stem is number-only.
    pub id: String,
    /// Display title: name part with dashes converted to spaces.
    pub title: String,
}

impl SectionName {
    /// Sort key: numbered sections first by number, then unnumbered by id.
    pub fn sort_key(&self) -> (u32, String) {
        (self.order.unwrap_or(u32::MAX), self.id.clone())
    }
}

pub fn parse_section_name(stem: &str) -> SectionName {
    let (order, name) = match stem.split_once('-') {
        Some((prefix, rest)) => match prefix.parse::<u32>() {
            Ok(num) => (Some(num), rest),
            Err(_) => (None, stem),
        },
        None => match stem.parse::<u32>() {
            Ok(num) => (Some(num), ""),
            Err(_) => (None, stem),
        },
    };
    SectionName {
        order,
        id: name.to_lowercase(),
        title: name.replace('-', " "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_single_word() {
        let n = parse_section_name("010-home");
        assert_eq!(n.order, Some(10));
        assert_eq!(n.id, "home");
        assert_eq!(n.title, "home");
    }

    #[test]
    fn numbered_multi_word_lowercases_id() {
        let n = parse_section_name("030-Our-Team");
        assert_eq!(n.order, Some(30));
        assert_eq!(n.id, "our-team");
        assert_eq!(n.title, "Our Team");
    }

    #[test]
    fn unnumbered_keeps_dashes_in_id() {
        let n = parse_section_name("open-positions");
        assert_eq!(n.order, None);
        assert_eq!(n.id, "open-positions");
        assert_eq!(n.title, "open positions");
    }

    #[test]
    fn number_only() {
        let n = parse_section_name("007");
        assert_eq!(n.order, Some(7));
        assert_eq!(n.id, "");
    }

    #[test]
    fn sort_key_puts_unnumbered_last() {
        let mut names = vec![
            parse_section_name("search"),
            parse_section_name("020-research"),
            parse_section_name("010-home"),
        ];
        names.sort_by_key(SectionName::sort_key);
        let ids: Vec<&str> = names.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["home", "research", "search"]);
    }
}
