//! Navigation controller: the page session's composition root.
//!
//! One controller lives for the whole page session. It owns the section
//! registry, the animation sequencer, the filter engine for the filterable
//! section, the search index and the search debounce timer, and it is the
//! only path through which any of them is mutated.
//!
//! # State machine
//!
//! ```text
//!            LinkActivated(id)              LinkActivated(id2)
//!   (none) ───────────────────▶ [id] ─────────────────────────▶ [id2]
//!                                │  unknown id: Err, state kept
//!                                ▼
//!            cancel pending reveals → schedule reveals for id
//!            → id is filterable? re-apply active token
//! ```
//!
//! # Events
//!
//! | Event | Handler |
//! |-------|---------|
//! | `LinkActivated(id)` | [`NavigationController::activate`] |
//! | `FilterSelected(token)` | [`NavigationController::select_filter`] |
//! | `SearchInput(text)` | [`NavigationController::search_input`] (debounced) |
//! | `SearchResultSelected(i)` | [`NavigationController::select_result`] |
//! | `Scrolled(y)` | [`NavigationController::scroll`] |
//! | `TimeElapsed(ms)` | [`NavigationController::advance`] |
//!
//! Every failure is reported as `Err(NavError)` with the page state left as
//! it was. None of them is fatal.

use log::{debug, info};
use thiserror::Error;

use crate::animation::{AnimationPlan, AnimationSequencer, RevealKey, RevealState};
use crate::config::SiteConfig;
use crate::filter::{FilterEngine, FilterError, FilterOutcome};
use crate::registry::{RegistryError, SectionRegistry};
use crate::scheduler::Scheduler;
use crate::search::{SearchHit, SearchIndex};
use crate::types::PageStructure;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("unknown section: {0}")]
    UnknownSection(String),
    #[error("unknown filter token: {0}")]
    UnknownFilterToken(String),
    #[error("page has no filterable section")]
    NoFilterableSection,
    #[error("no search result at index {0}")]
    NoSuchResult(usize),
    #[error("page has no sections")]
    EmptyPage,
}

impl From<RegistryError> for NavError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownSection(id) => NavError::UnknownSection(id),
        }
    }
}

impl From<FilterError> for NavError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::UnknownToken(token) => NavError::UnknownFilterToken(token),
        }
    }
}

/// A user interaction or timer tick delivered to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LinkActivated(String),
    FilterSelected(String),
    SearchInput(String),
    SearchResultSelected(usize),
    Scrolled(u32),
    TimeElapsed(u64),
}

/// What handling an event changed.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Activated(Activation),
    Filtered(FilterOutcome),
    /// A search is queued and will run after the debounce delay.
    SearchPending { query: String },
    Scrolled { scrolled: bool },
    Ticked(Tick),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub previous: Option<String>,
    pub current: String,
    pub plan: AnimationPlan,
    /// Present when the activated section is the filterable one.
    pub filter: Option<FilterOutcome>,
}

/// Effects of advancing the clock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tick {
    pub revealed: Vec<RevealKey>,
    /// Set when a debounced query ran; holds its result count.
    pub search_results: Option<usize>,
    /// Everything that fired, in firing order.
    pub effects: Vec<TickEffect>,
}

/// One timer firing during [`NavigationController::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum TickEffect {
    Revealed(RevealKey),
    Searched { query: String, results: usize },
}

#[derive(Debug)]
pub struct NavigationController {
    config: SiteConfig,
    page: PageStructure,
    registry: SectionRegistry,
    sequencer: AnimationSequencer,
    filter: Option<FilterEngine>,
    search: SearchIndex,
    search_timer: Scheduler<(), String>,
    search_query: String,
    search_results: Vec<SearchHit>,
    scrolled: bool,
}

impl NavigationController {
    /// Build the controller and all its parts from the rendered page.
    pub fn new(page: PageStructure, config: SiteConfig) -> Self {
        let registry = SectionRegistry::new(page.section_ids().map(str::to_string));
        let sequencer = AnimationSequencer::new(config.animation.clone());
        let filter = page
            .section(&config.filter.section)
            .map(|s| FilterEngine::from_section(s, config.filter.all_token.as_str()));
        let search = SearchIndex::build(&page, &config.search);
        Self::with_parts(page, config, registry, sequencer, filter, search)
    }

    /// Assemble a controller from parts built elsewhere.
    pub fn with_parts(
        page: PageStructure,
        config: SiteConfig,
        registry: SectionRegistry,
        sequencer: AnimationSequencer,
        filter: Option<FilterEngine>,
        search: SearchIndex,
    ) -> Self {
        info!(
            "event=init module=navigation sections={} filterable={} search_entries={}",
            page.sections.len(),
            filter.is_some(),
            search.len()
        );
        Self {
            config,
            page,
            registry,
            sequencer,
            filter,
            search,
            search_timer: Scheduler::new(),
            search_query: String::new(),
            search_results: Vec::new(),
            scrolled: false,
        }
    }

    /// First render: activate the configured initial section, or the first one.
    pub fn start(&mut self) -> Result<Activation, NavError> {
        let initial = match &self.config.navigation.initial_section {
            Some(id) => id.clone(),
            None => self
                .registry
                .ids()
                .next()
                .map(str::to_string)
                .ok_or(NavError::EmptyPage)?,
        };
        self.activate(&initial)
    }

    /// Dispatch one event to its handler.
    pub fn handle(&mut self, event: Event) -> Result<EventOutcome, NavError> {
        match event {
            Event::LinkActivated(id) => self.activate(&id).map(EventOutcome::Activated),
            Event::FilterSelected(token) => {
                self.select_filter(&token).map(EventOutcome::Filtered)
            }
            Event::SearchInput(text) => {
                self.search_input(&text);
                Ok(EventOutcome::SearchPending { query: text })
            }
            Event::SearchResultSelected(index) => {
                self.select_result(index).map(EventOutcome::Activated)
            }
            Event::Scrolled(y) => Ok(EventOutcome::Scrolled {
                scrolled: self.scroll(y),
            }),
            Event::TimeElapsed(ms) => Ok(EventOutcome::Ticked(self.advance(ms))),
        }
    }

    /// Show section `id`: the single entry point used by links, search
    /// results and external triggers.
    pub fn activate(&mut self, id: &str) -> Result<Activation, NavError> {
        let transition = self.registry.activate(id)?;

        // Pending reveals from any earlier activation must not land now.
        let cancelled = self.sequencer.cancel_all();
        if let Some(previous) = transition.previous.as_deref() {
            if previous != transition.current {
                if let Some(section) = self.page.section(previous) {
                    self.sequencer.deactivate(section);
                }
            }
        }

        let plan = match self.page.section(&transition.current) {
            Some(section) => self.sequencer.schedule(section),
            None => AnimationPlan {
                section: transition.current.clone(),
                groups: Vec::new(),
            },
        };

        let filter = if transition.current == self.config.filter.section {
            self.filter.as_mut().map(FilterEngine::reapply)
        } else {
            None
        };

        debug!(
            "event=activate module=navigation section={} previous={} cancelled={cancelled} reveals={}",
            transition.current,
            transition.previous.as_deref().unwrap_or("none"),
            plan.len()
        );
        Ok(Activation {
            previous: transition.previous,
            current: transition.current,
            plan,
            filter,
        })
    }

    pub fn select_filter(&mut self, token: &str) -> Result<FilterOutcome, NavError> {
        let engine = self.filter.as_mut().ok_or(NavError::NoFilterableSection)?;
        Ok(engine.apply(token)?)
    }

    /// Queue `text` as the latest query. Earlier queued queries are discarded.
    pub fn search_input(&mut self, text: &str) {
        self.search_timer
            .schedule((), self.config.search.debounce_ms, text.to_string());
    }

    /// Run a query immediately, bypassing the debounce.
    pub fn search_now(&mut self, text: &str) -> &[SearchHit] {
        self.search_timer.cancel(&());
        self.run_search(text.to_string());
        &self.search_results
    }

    /// Activate the section owning the `index`-th current search result.
    pub fn select_result(&mut self, index: usize) -> Result<Activation, NavError> {
        let section = self
            .search_results
            .get(index)
            .map(|hit| hit.section.clone())
            .ok_or(NavError::NoSuchResult(index))?;
        self.activate(&section)
    }

    /// Record a scroll offset. Returns whether the navbar is now "scrolled".
    pub fn scroll(&mut self, y: u32) -> bool {
        self.scrolled = y > self.config.navigation.scroll_threshold_px;
        self.scrolled
    }

    /// Move the clock forward, firing due reveals and the debounced query.
    ///
    /// Reveal and search timers fire in due-time order. When both are due at
    /// the same instant the reveals fire first.
    pub fn advance(&mut self, ms: u64) -> Tick {
        let target = self.sequencer.now().saturating_add(ms);
        let mut tick = Tick::default();
        while let Some(due) = self.next_due().filter(|due| *due <= target) {
            self.step_to(due, &mut tick);
        }
        self.step_to(target, &mut tick);
        tick
    }

    fn next_due(&self) -> Option<u64> {
        match (self.sequencer.next_due(), self.search_timer.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Bring both clocks to `at`, recording what fired.
    fn step_to(&mut self, at: u64, tick: &mut Tick) {
        for key in self.sequencer.advance(at.saturating_sub(self.sequencer.now())) {
            tick.effects.push(TickEffect::Revealed(key.clone()));
            tick.revealed.push(key);
        }
        // Only the latest query can be pending, so at most one fires.
        for fired in self
            .search_timer
            .advance(at.saturating_sub(self.search_timer.now()))
        {
            self.run_search(fired.action);
            let results = self.search_results.len();
            tick.search_results = Some(results);
            tick.effects.push(TickEffect::Searched {
                query: self.search_query.clone(),
                results,
            });
        }
    }

    /// Cancel every pending timer. Returns the number cancelled.
    pub fn teardown(&mut self) -> usize {
        let n = self.sequencer.cancel_all() + self.search_timer.clear();
        debug!("event=teardown module=navigation cancelled={n}");
        n
    }

    fn run_search(&mut self, query: String) {
        self.search_results = self.search.query(&query);
        debug!(
            "event=search module=navigation query_chars={} results={}",
            query.chars().count(),
            self.search_results.len()
        );
        self.search_query = query;
    }

    // =========================================================================
    // Read access for collaborators
    // =========================================================================

    pub fn active_section(&self) -> Option<&str> {
        self.registry.active()
    }

    /// Active filter token, `None` when the page has no filterable section.
    pub fn active_filter(&self) -> Option<&str> {
        self.filter.as_ref().map(FilterEngine::active_token)
    }

    pub fn filter(&self) -> Option<&FilterEngine> {
        self.filter.as_ref()
    }

    pub fn search_index(&self) -> &SearchIndex {
        &self.search
    }

    pub fn search_results(&self) -> &[SearchHit] {
        &self.search_results
    }

    /// Query the results currently shown were computed for.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_search_pending(&self) -> bool {
        self.search_timer.is_pending(&())
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn page(&self) -> &PageStructure {
        &self.page
    }

    pub fn reveal_state(&self, section: &str, element: &str) -> Option<RevealState> {
        self.sequencer.state(section, element)
    }

    pub fn revealed_count(&self, section: &str) -> usize {
        self.sequencer.revealed_count(section)
    }

    pub fn pending_reveals(&self) -> usize {
        self.sequencer.pending_count()
    }

    /// Current virtual time.
    pub fn now(&self) -> u64 {
        self.sequencer.now()
    }
}
