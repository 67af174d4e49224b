//! # Sync Layer
//!
//! Operator overrides are shared through a remote document store so several
//! sessions (or several operators) see the same completed flags and edits. This
//! module defines the storage abstraction and the rules for keeping the local
//! [`OverrideStore`](crate::overrides::OverrideStore) in step with it.
//!
//! ## Design Rationale
//!
//! The remote side is hidden behind the [`RemoteStore`] trait so that:
//! - the classification core never depends on a transport
//! - tests run against [`memory::InMemoryRemote`] with no filesystem
//! - the CLI can use [`fs::FileRemote`] (one JSON document per dataset)
//!
//! Persistence is best effort. A failing store never makes an edit fail: the
//! [`adapter::SyncAdapter`] logs, flips its status to disconnected and keeps the
//! local state authoritative until the next save succeeds.
//!
//! ## Last Writer Wins
//!
//! Conflicts are resolved at snapshot granularity by [`reconcile`]: an incoming
//! snapshot whose `last_updated` is strictly newer than what the session last
//! applied or saved replaces every override wholesale. Anything else is ignored,
//! which also filters out the echo of our own saves. A newer remote snapshot can
//! overwrite a local edit that has not been saved yet; that is accepted.
//!
//! ## Storage Format
//!
//! ```text
//! <store dir>/
//! └── dataset_<hash>.json   # { completedTerms, editedTerms, editedCategories,
//!                           #   lastUpdated, datasetId }
//! ```

use crate::dataset::DatasetKey;
use crate::error::Result;
use crate::model::RecordId;
use crate::overrides::CategorySet;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc::Receiver;

pub mod adapter;
pub mod debounce;
pub mod document;
pub mod fs;
pub mod memory;

/// Persisted form of every override for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub completed_ids: BTreeSet<RecordId>,
    pub edited_terms: BTreeMap<RecordId, String>,
    pub edited_categories: BTreeMap<RecordId, CategorySet>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Abstract interface to the shared document store.
pub trait RemoteStore {
    /// Fetch the stored snapshot, `None` when the dataset has never been saved.
    fn load_snapshot(&self, key: &DatasetKey) -> Result<Option<Snapshot>>;

    /// Replace the stored snapshot and notify subscribers.
    fn save_snapshot(&mut self, key: &DatasetKey, snapshot: &Snapshot) -> Result<()>;

    /// Receive every snapshot saved for `key` from now on.
    fn subscribe(&mut self, key: &DatasetKey) -> Result<Receiver<Snapshot>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    KeepLocal,
    TakeIncoming,
}

/// Decide between the local state and an incoming snapshot.
///
/// Only a strictly newer timestamp wins. A snapshot without a timestamp never
/// displaces local state.
pub fn reconcile(local: &Snapshot, incoming: &Snapshot) -> Resolution {
    match (incoming.last_updated, local.last_updated) {
        (Some(theirs), Some(ours)) if theirs > ours => Resolution::TakeIncoming,
        (Some(_), None) => Resolution::TakeIncoming,
        _ => Resolution::KeepLocal,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Connected,
    Disconnected(String),
    /// Sync disabled for this session.
    Offline,
}

impl SyncStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, SyncStatus::Connected)
    }
}
