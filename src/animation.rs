//! Staggered reveal of a section's elements.
//!
//! When a section activates, its elements go back to "unrevealed" and a
//! deterministic plan reveals them group by group:
//!
//! ```text
//! hero            100ms                        (settle)
//! headers         200, 350, 500, ...           (base 200, stride 150)
//! cards           300, 400, 500, ...           (per-role base/stride,
//! list items      400, 450, 500, ...            overridable per section)
//! filter controls 350, 425, 500, ...
//! ```
//!
//! Each reveal is a cancellable task keyed by `(section, element)`. Scheduling
//! a section first cancels its pending reveals and resets its markers, so
//! re-entry is idempotent. Deactivating a section cancels its pending reveals
//! and hides its elements again, so a reveal from an older activation can
//! never land after a newer section has taken over.

use log::debug;
use std::collections::BTreeMap;

use crate::config::{AnimationConfig, Stagger};
use crate::scheduler::Scheduler;
use crate::types::{ElementRole, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Unrevealed,
    Revealed,
}

/// Scheduler key of one reveal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RevealKey {
    pub section: String,
    pub element: String,
}

impl RevealKey {
    pub fn new(section: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            element: element.into(),
        }
    }
}

/// One group of the plan: its elements share a base delay and stride.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedGroup {
    pub role: ElementRole,
    pub base_ms: u64,
    pub stride_ms: u64,
    pub elements: Vec<String>,
}

impl PlannedGroup {
    /// `(element, delay)` pairs in document order.
    pub fn reveals(&self) -> impl Iterator<Item = (&str, u64)> {
        let stagger = Stagger::new(self.base_ms, self.stride_ms);
        self.elements
            .iter()
            .enumerate()
            .map(move |(i, e)| (e.as_str(), stagger.delay_for(i)))
    }
}

/// Ordered reveal plan for one activation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationPlan {
    pub section: String,
    pub groups: Vec<PlannedGroup>,
}

impl AnimationPlan {
    pub fn reveals(&self) -> impl Iterator<Item = (&str, u64)> {
        self.groups.iter().flat_map(|g| g.reveals())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.elements.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time at which the last reveal lands, 0 for an empty plan.
    pub fn settle_ms(&self) -> u64 {
        self.reveals().map(|(_, delay)| delay).max().unwrap_or(0)
    }
}

#[derive(Debug)]
pub struct AnimationSequencer {
    config: AnimationConfig,
    timers: Scheduler<RevealKey, ()>,
    states: BTreeMap<RevealKey, RevealState>,
}

impl AnimationSequencer {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            timers: Scheduler::new(),
            states: BTreeMap::new(),
        }
    }

    /// Build the reveal plan for `section` without touching any state.
    pub fn plan(&self, section: &Section) -> AnimationPlan {
        let mut groups = Vec::new();
        if let Some(hero) = &section.hero {
            groups.push(PlannedGroup {
                role: ElementRole::Hero,
                base_ms: self.config.hero_delay_ms,
                stride_ms: 0,
                elements: vec![hero.clone()],
            });
        }
        if !section.headers.is_empty() {
            groups.push(PlannedGroup {
                role: ElementRole::Header,
                base_ms: self.config.header.base_ms,
                stride_ms: self.config.header.stride_ms,
                elements: section.headers.clone(),
            });
        }
        for group in section.groups.iter().filter(|g| !g.elements.is_empty()) {
            let stagger = self.config.stagger_for(&section.id, group.role);
            groups.push(PlannedGroup {
                role: group.role,
                base_ms: stagger.base_ms,
                stride_ms: stagger.stride_ms,
                elements: group.elements.clone(),
            });
        }
        AnimationPlan {
            section: section.id.clone(),
            groups,
        }
    }

    /// Reset `section` to unrevealed and schedule its reveal plan.
    pub fn schedule(&mut self, section: &Section) -> AnimationPlan {
        self.reset(section);
        let plan = self.plan(section);
        for (element, delay) in plan.reveals() {
            self.timers
                .schedule(RevealKey::new(&section.id, element), delay, ());
        }
        debug!(
            "event=schedule module=animation section={} reveals={} settle_ms={}",
            section.id,
            plan.len(),
            plan.settle_ms()
        );
        plan
    }

    /// Cancel pending reveals for `section` and hide its elements.
    pub fn deactivate(&mut self, section: &Section) {
        self.reset(section);
    }

    /// Cancel every pending reveal of every section. Returns the count.
    pub fn cancel_all(&mut self) -> usize {
        self.timers.clear()
    }

    /// Advance time and apply due reveals. Returns the revealed keys in order.
    pub fn advance(&mut self, ms: u64) -> Vec<RevealKey> {
        let mut revealed = Vec::new();
        for fired in self.timers.advance(ms) {
            let state = self
                .states
                .entry(fired.key.clone())
                .or_insert(RevealState::Unrevealed);
            // A key fires at most once per schedule; a second firing would mean
            // a stale task survived a reset.
            if *state == RevealState::Unrevealed {
                *state = RevealState::Revealed;
                revealed.push(fired.key);
            }
        }
        revealed
    }

    /// Reveal state of an element, `None` if it was never scheduled.
    pub fn state(&self, section: &str, element: &str) -> Option<RevealState> {
        self.states.get(&RevealKey::new(section, element)).copied()
    }

    pub fn revealed_count(&self, section: &str) -> usize {
        self.states
            .iter()
            .filter(|(k, s)| k.section == section && **s == RevealState::Revealed)
            .count()
    }

    pub fn pending_count(&self) -> usize {
        self.timers.pending_len()
    }

    pub fn is_pending(&self, section: &str, element: &str) -> bool {
        self.timers.is_pending(&RevealKey::new(section, element))
    }

    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    /// Due time of the next pending reveal.
    pub fn next_due(&self) -> Option<u64> {
        self.timers.next_due()
    }

    fn reset(&mut self, section: &Section) {
        let cancelled = self.timers.cancel_where(|k| k.section == section.id);
        for element in section.element_ids() {
            self.states.insert(
                RevealKey::new(&section.id, element),
                RevealState::Unrevealed,
            );
        }
        if cancelled > 0 {
            debug!(
                "event=reset module=animation section={} cancelled={cancelled}",
                section.id
            );
        }
    }
}
