//! # Termfix Architecture
//!
//! Termfix triages the search terms that returned no results in a florist's product
//! search. Every raw term is classified into an immutable [`model::TermRecord`]
//! (issues, category, advice, cleaned replacement, priority), an operator layers
//! corrections on top, and the effective result is exported as a CSV report or a
//! SQL batch-update script.
//!
//! Like any UI-agnostic library, the CLI is just one client of the API.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - Installs the tracing subscriber                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Validates text input (tags, patterns)                    │
//! │  - Schedules debounced saves after every real change        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Operates on a Workspace (records + overrides)            │
//! │  - Returns CmdResult with change events, no I/O             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (rules/, records.rs, overrides.rs, view.rs)           │
//! │  - Pure, total functions: classification and merge          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Sync Layer (sync/)                                         │
//! │  - RemoteStore trait, FileRemote, InMemoryRemote            │
//! │  - Debounced saves, newest-snapshot-wins reconcile          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Base values and overrides
//!
//! A [`model::TermRecord`] is computed once from its raw term and never changes.
//! Operator edits (completion, proposed term, categories) live in
//! [`overrides::OverrideStore`], keyed by record id, and [`view`] merges both into
//! the effective values that listing and exports read. Overrides are scoped to a
//! [`dataset::DatasetKey`] so each input export keeps its own edits.
//!
//! ## Failure model
//!
//! Loading the input is the only fatal failure. A missing or broken remote store
//! degrades the session to local-only work: edits keep applying and the next save
//! retries.
//!
//! ## Module Overview
//!
//! - [`api`]: facade used by every client
//! - [`commands`]: one module per operation family
//! - [`config`]: `TriageConfig` loaded from `config.json`
//! - [`dataset`]: input loading and dataset keys
//! - [`error`]: `TriageError` and the crate `Result`
//! - [`model`]: categories, priorities, issues, term records
//! - [`overrides`]: the override store and its change events
//! - [`records`]: builds term records from input
//! - [`rules`]: detection, categorization, advice, normalization, ranking
//! - [`sync`]: remote persistence
//! - [`view`]: effective values, filtering, sorting, stats

pub mod api;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod error;
pub mod model;
pub mod overrides;
pub mod records;
pub mod rules;
pub mod sync;
pub mod view;
