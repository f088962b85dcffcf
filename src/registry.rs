//! Section registry: which page section is visible.
//!
//! At most one section is active. Before the first successful
//! [`SectionRegistry::activate`] none is; afterwards exactly one is, always.
//! Activating an unknown id changes nothing.

use log::warn;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown section: {0}")]
    UnknownSection(String),
}

/// The sections whose active flag flipped during one activation.
///
/// `previous` is `None` on the first activation (one toggle), otherwise the
/// old and new sections were toggled (they may be the same section).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub previous: Option<String>,
    pub current: String,
}

#[derive(Debug, Clone)]
pub struct SectionRegistry {
    sections: Vec<String>,
    active: Option<usize>,
}

impl SectionRegistry {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sections: ids.into_iter().map(Into::into).collect(),
            active: None,
        }
    }

    /// Deactivate the current section (if any) and activate `id`.
    pub fn activate(&mut self, id: &str) -> Result<Transition, RegistryError> {
        let Some(index) = self.sections.iter().position(|s| s == id) else {
            warn!("event=activate module=registry status=ignored section={id}");
            return Err(RegistryError::UnknownSection(id.to_string()));
        };
        let previous = self.active.map(|i| self.sections[i].clone());
        self.active = Some(index);
        Ok(Transition {
            previous,
            current: self.sections[index].clone(),
        })
    }

    /// The active section id, or `None` before the first activation.
    pub fn active(&self) -> Option<&str> {
        self.active.map(|i| self.sections[i].as_str())
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active() == Some(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sections.iter().any(|s| s == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SectionRegistry {
        SectionRegistry::new(["home", "research", "team"])
    }

    #[test]
    fn none_active_before_first_activation() {
        let reg = registry();
        assert_eq!(reg.active(), None);
        assert!(!reg.is_active("home"));
    }

    #[test]
    fn first_activation_has_no_previous() {
        let mut reg = registry();
        let t = reg.activate("home").unwrap();
        assert_eq!(t.previous, None);
        assert_eq!(t.current, "home");
        assert_eq!(reg.active(), Some("home"));
    }

    #[test]
    fn switching_reports_both_sections() {
        let mut reg = registry();
        reg.activate("home").unwrap();
        let t = reg.activate("team").unwrap();
        assert_eq!(t.previous.as_deref(), Some("home"));
        assert_eq!(t.current, "team");
        assert_eq!(reg.ids().filter(|id| reg.is_active(id)).count(), 1);
    }

    #[test]
    fn unknown_id_leaves_state_unchanged() {
        let mut reg = registry();
        reg.activate("research").unwrap();
        let err = reg.activate("bogus").unwrap_err();
        assert_eq!(err, RegistryError::UnknownSection("bogus".into()));
        assert_eq!(reg.active(), Some("research"));
    }

    #[test]
    fn unknown_id_before_first_activation_keeps_none() {
        let mut reg = registry();
        assert!(reg.activate("bogus").is_err());
        assert_eq!(reg.active(), None);
    }

    #[test]
    fn reactivating_same_section_succeeds() {
        let mut reg = registry();
        reg.activate("team").unwrap();
        let t = reg.activate("team").unwrap();
        assert_eq!(t.previous.as_deref(), Some("team"));
        assert_eq!(reg.active(), Some("team"));
    }
}
