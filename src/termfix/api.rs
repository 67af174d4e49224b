//! # API Facade
//!
//! The single entry point for every triage operation, whatever the UI.
//!
//! The facade:
//! - **Dispatches** to the command functions in `commands/*.rs`
//! - **Normalizes inputs** (category tags and patterns arrive as text and are
//!   validated here, so commands only ever see typed values)
//! - **Drives persistence**: every command result that carries change events
//!   schedules a debounced save through the [`SyncAdapter`]
//!
//! It does no business logic and no terminal I/O.
//!
//! ## Generic Over RemoteStore
//!
//! `TriageApi<R: RemoteStore>` runs against any override store:
//! - Production: `TriageApi<FileRemote>`
//! - Testing: `TriageApi<InMemoryRemote>`
//!
//! An API opened without a remote works purely in memory and reports
//! [`SyncStatus::Offline`].

use crate::commands::{self, Workspace};
use crate::dataset::{DatasetKey, InputTerm};
use crate::error::Result;
use crate::model::{Category, RecordId};
use crate::overrides::{CategoryMode, OverrideChange, OverrideStore, TermEdit};
use crate::records::build_records;
use crate::sync::adapter::SyncAdapter;
use crate::sync::{RemoteStore, SyncStatus};
use crate::view::{RecordFilter, SortOrder};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

pub struct TriageApi<R: RemoteStore> {
    workspace: Workspace,
    key: DatasetKey,
    sync: Option<SyncAdapter<R>>,
}

impl<R: RemoteStore> TriageApi<R> {
    /// Classify `inputs` and, when a remote is given, pull its stored overrides.
    ///
    /// An unreachable remote does not fail the call; the session starts with
    /// empty overrides and a disconnected status.
    pub fn open(inputs: &[InputTerm], remote: Option<R>, quiet: Duration) -> Result<Self> {
        let key = DatasetKey::derive(inputs)?;
        let mut workspace = Workspace::new(build_records(inputs), OverrideStore::new());
        info!(dataset = %key, terms = workspace.records.len(), "dataset loaded");

        let sync = remote.map(|remote| {
            let mut adapter = SyncAdapter::new(remote, key.clone(), quiet);
            adapter.connect(&mut workspace.overrides);
            adapter
        });

        Ok(Self {
            workspace,
            key,
            sync,
        })
    }

    pub fn dataset_key(&self) -> &DatasetKey {
        &self.key
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync
            .as_ref()
            .map_or(SyncStatus::Offline, |s| s.status().clone())
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.sync.as_ref().and_then(SyncAdapter::last_synced)
    }

    pub fn has_pending_save(&self) -> bool {
        self.sync.as_ref().is_some_and(SyncAdapter::has_pending_save)
    }

    // --- Reads ---

    pub fn list(&self, filter: &RecordFilter, sort: SortOrder) -> Result<CmdResult> {
        Ok(commands::list::run(&self.workspace, filter, sort))
    }

    pub fn show(&self, ids: &[RecordId]) -> Result<CmdResult> {
        commands::list::show(&self.workspace, ids)
    }

    pub fn stats(&self) -> Result<CmdResult> {
        Ok(commands::status::run(&self.workspace))
    }

    pub fn export_csv(&self, filter: &RecordFilter, sort: SortOrder) -> Result<CmdResult> {
        Ok(commands::export::csv_report(&self.workspace, filter, sort))
    }

    pub fn export_sql(&self, filter: &RecordFilter, sort: SortOrder) -> Result<CmdResult> {
        Ok(commands::export::sql_script(
            &self.workspace,
            filter,
            sort,
            Utc::now(),
        ))
    }

    // --- Override edits ---

    pub fn complete(&mut self, ids: &[RecordId]) -> Result<CmdResult> {
        let result = commands::complete::complete(&mut self.workspace, ids)?;
        Ok(self.persist(result))
    }

    pub fn reopen(&mut self, ids: &[RecordId]) -> Result<CmdResult> {
        let result = commands::complete::reopen(&mut self.workspace, ids)?;
        Ok(self.persist(result))
    }

    pub fn edit_term(&mut self, id: RecordId, text: &str) -> Result<CmdResult> {
        let result = commands::terms::edit(&mut self.workspace, id, text)?;
        Ok(self.persist(result))
    }

    pub fn add_category(&mut self, id: RecordId, tag: &str) -> Result<CmdResult> {
        let category: Category = tag.parse()?;
        let result = commands::categorize::add(&mut self.workspace, id, category)?;
        Ok(self.persist(result))
    }

    pub fn remove_category(&mut self, id: RecordId, tag: &str) -> Result<CmdResult> {
        let category: Category = tag.parse()?;
        let result = commands::categorize::remove(&mut self.workspace, id, category)?;
        Ok(self.persist(result))
    }

    pub fn replace_category(&mut self, id: RecordId, old: &str, new: &str) -> Result<CmdResult> {
        let old: Category = old.parse()?;
        let new: Category = new.parse()?;
        let result = commands::categorize::replace(&mut self.workspace, id, old, new)?;
        Ok(self.persist(result))
    }

    pub fn bulk_category(
        &mut self,
        ids: &[RecordId],
        tag: &str,
        mode: CategoryMode,
    ) -> Result<CmdResult> {
        let category: Category = tag.parse()?;
        let result = commands::categorize::bulk(&mut self.workspace, ids, category, mode)?;
        Ok(self.persist(result))
    }

    pub fn bulk_edit_terms(&mut self, ids: &[RecordId], edit: &TermEdit) -> Result<CmdResult> {
        let result = commands::terms::bulk(&mut self.workspace, ids, edit)?;
        Ok(self.persist(result))
    }

    /// Find-and-replace over proposed terms. With `use_pattern`, `find` is a
    /// regular expression and `with` may reference its groups.
    pub fn bulk_find_replace(
        &mut self,
        ids: &[RecordId],
        find: &str,
        with: &str,
        use_pattern: bool,
    ) -> Result<CmdResult> {
        let edit = if use_pattern {
            TermEdit::FindReplacePattern {
                pattern: Regex::new(find)?,
                with: with.to_string(),
            }
        } else {
            TermEdit::FindReplace {
                find: find.to_string(),
                with: with.to_string(),
            }
        };
        self.bulk_edit_terms(ids, &edit)
    }

    // --- Selection ---

    pub fn select(&mut self, ids: &[RecordId]) -> Result<CmdResult> {
        commands::select::select(&mut self.workspace, ids)
    }

    pub fn deselect(&mut self, ids: &[RecordId]) -> Result<CmdResult> {
        commands::select::deselect(&mut self.workspace, ids)
    }

    pub fn toggle_selected(&mut self, id: RecordId) -> Result<CmdResult> {
        commands::select::toggle(&mut self.workspace, id)
    }

    pub fn select_all(&mut self, filter: &RecordFilter, selected: bool) -> Result<CmdResult> {
        Ok(commands::select::select_all(&mut self.workspace, filter, selected))
    }

    pub fn clear_selection(&mut self) -> Result<CmdResult> {
        Ok(commands::select::clear(&mut self.workspace))
    }

    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.workspace.overrides.selected_ids()
    }

    // --- Sync ---

    /// Apply snapshots other sessions saved since the last call.
    pub fn sync_incoming(&mut self) -> Vec<OverrideChange> {
        match self.sync.as_mut() {
            Some(sync) => sync.poll_incoming(&mut self.workspace.overrides),
            None => Vec::new(),
        }
    }

    /// Reload the stored overrides and report how the store is doing.
    pub fn refresh(&mut self) -> CmdResult {
        let mut result = CmdResult::default();
        let Some(sync) = self.sync.as_mut() else {
            result.add_message(CmdMessage::warning("Sync is off for this session."));
            return result;
        };

        let changes = sync.refresh(&mut self.workspace.overrides);
        match sync.status() {
            SyncStatus::Disconnected(reason) => {
                result.add_message(CmdMessage::error(format!("Store unavailable: {}", reason)))
            }
            _ if changes.is_empty() => result.add_message(CmdMessage::info("Already up to date.")),
            _ => result.add_message(CmdMessage::success(format!(
                "Applied {} newer snapshot(s)",
                changes.len()
            ))),
        }
        result.changes = changes;
        result
    }

    /// Save if the debounce period has elapsed. Returns whether a save happened.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        match self.sync.as_mut() {
            Some(sync) => sync.tick(&self.workspace.overrides, now),
            None => false,
        }
    }

    /// Save any pending edits right away.
    pub fn flush(&mut self) -> bool {
        match self.sync.as_mut() {
            Some(sync) => sync.flush(&self.workspace.overrides),
            None => false,
        }
    }

    fn persist(&mut self, result: CmdResult) -> CmdResult {
        if result.needs_persist() {
            if let Some(sync) = self.sync.as_mut() {
                debug!(changes = result.changes.len(), "scheduling override save");
                sync.schedule_save(Instant::now());
            }
        }
        result
    }
}
