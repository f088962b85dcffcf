//! # labsite
//!
//! The page controller of a static academic lab website, as a headless
//! library. The site is a single page split into sections (home, research,
//! team, publications, news, search); exactly one is visible at a time.
//! Activating a section reveals its elements in a staggered sequence, the
//! publications section can be filtered by category, and a search box finds
//! text anywhere on the page.
//!
//! # Architecture
//!
//! ```text
//! content/  →  scan  →  PageStructure  →  NavigationController
//!                          │                 ├── SectionRegistry
//!                          │                 ├── AnimationSequencer
//!                          │                 ├── FilterEngine
//!                          │                 └── SearchIndex
//!                          └── validate / output
//! ```
//!
//! The rendered DOM is represented by [`types::PageStructure`]: sections,
//! their animatable elements grouped by role, filterable content items and
//! searchable text. Time is a virtual millisecond clock that callers move
//! forward with [`navigation::Event::TimeElapsed`], so every delayed reveal
//! and the search debounce are deterministic and observable.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | The page structure shared by every stage |
//! | [`naming`] | `NNN-name` convention for ordering markdown section files |
//! | [`config`] | `config.toml` loading: stock defaults, merge, validation |
//! | [`scheduler`] | Keyed, cancellable delayed tasks on a virtual clock |
//! | [`registry`] | Which section is active |
//! | [`animation`] | Staggered reveal plans and their timers |
//! | [`filter`] | Category filter over a section's content items |
//! | [`search`] | Text index, queries and highlighted excerpts |
//! | [`navigation`] | The controller: events in, state changes out |
//! | [`publications`] | Publication records: categories, merge, metrics, section layout |
//! | [`news`] | News records: featured/past split, section layout |
//! | [`scan`] | Builds the page from markdown sections and JSON data files |
//! | [`validate`] | Data file and page structure checks |
//! | [`output`] | Text formatting of inventories, reports and results |
//!
//! # Design Decisions
//!
//! ## One Activation Cancels Everything
//!
//! Reveal timers are keyed by section and element. Every activation cancels
//! all pending reveals before scheduling the new section, so a quick
//! A → B → A never lets a stale timer from the first visit fire during the
//! second. Re-activating the visible section replays its animation.
//!
//! ## Failures Are Values
//!
//! Unknown section ids, unknown filter tokens and out-of-range search results
//! come back as [`navigation::NavError`] with the controller state untouched.
//! Nothing in the controller panics on bad input.
//!
//! ## Logging
//!
//! Diagnostics go through the `log` facade as `event=… module=… key=value`
//! messages. The library never installs a logger.

pub mod animation;
pub mod config;
pub mod filter;
pub mod naming;
pub mod navigation;
pub mod news;
pub mod output;
pub mod publications;
pub mod registry;
pub mod scan;
pub mod scheduler;
pub mod search;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
