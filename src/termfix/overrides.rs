//! # Override Store
//!
//! Operator corrections layered over the computed [`TermRecord`]s. Records never
//! change; everything an operator does lands here instead, keyed by record id:
//!
//! - a completion flag
//! - an edited proposed term (replaces the normalizer's output)
//! - an edited category set (replaces the single computed category)
//!
//! Plus the transient selection used for bulk actions.
//!
//! ## Invariants
//!
//! All mutation goes through the methods below so the rules hold everywhere:
//!
//! - An edited category set is ordered, has no duplicates and is never empty.
//!   Removing the last category leaves `[unknown]` behind.
//! - Entries are never deleted one by one. The whole map is only replaced when a
//!   newer remote snapshot is applied.
//!
//! ## Change Events
//!
//! Every mutation returns `Some(OverrideChange)` when it changed something and
//! `None` when it was a no-op. Callers use the events to schedule persistence and
//! to refresh whatever presents the data; the store itself knows nothing about
//! either.

use crate::model::{Category, RecordId, TermRecord};
use crate::sync::Snapshot;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Ordered, duplicate-free, never-empty list of categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet(Vec<Category>);

impl CategorySet {
    pub fn single(category: Category) -> Self {
        Self(vec![category])
    }

    /// Keeps first occurrences in order; an empty input becomes `[unknown]`.
    pub fn from_tags<I: IntoIterator<Item = Category>>(tags: I) -> Self {
        let mut set = Vec::new();
        for tag in tags {
            if !set.contains(&tag) {
                set.push(tag);
            }
        }
        if set.is_empty() {
            set.push(Category::Unknown);
        }
        Self(set)
    }

    pub fn as_slice(&self) -> &[Category] {
        &self.0
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    fn insert(&mut self, category: Category) -> bool {
        if self.contains(category) {
            return false;
        }
        self.0.push(category);
        true
    }

    fn remove(&mut self, category: Category) -> bool {
        let before = self.0.clone();
        self.0.retain(|c| *c != category);
        if self.0.is_empty() {
            self.0.push(Category::Unknown);
        }
        self.0 != before
    }

    fn replace(&mut self, old: Category, new: Category) -> bool {
        let Some(pos) = self.0.iter().position(|c| *c == old) else {
            return false;
        };
        if old == new {
            return false;
        }
        if self.contains(new) {
            self.0.remove(pos);
        } else {
            self.0[pos] = new;
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideEntry {
    pub completed: bool,
    pub edited_proposed_term: Option<String>,
    pub edited_categories: Option<CategorySet>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideChange {
    Completed {
        id: RecordId,
        completed: bool,
    },
    ProposedTerm {
        id: RecordId,
        term: String,
    },
    Categories {
        id: RecordId,
        categories: Vec<Category>,
    },
    /// The whole map was swapped for a remote snapshot.
    Replaced,
}

impl OverrideChange {
    /// Local edits must be saved; a replacement came from the store already.
    pub fn needs_persist(&self) -> bool {
        !matches!(self, OverrideChange::Replaced)
    }

    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            OverrideChange::Completed { id, .. }
            | OverrideChange::ProposedTerm { id, .. }
            | OverrideChange::Categories { id, .. } => Some(*id),
            OverrideChange::Replaced => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryMode {
    Add,
    Remove,
    Replace,
}

/// Bulk rewrite of proposed terms.
#[derive(Debug, Clone)]
pub enum TermEdit {
    Replace(String),
    Prefix(String),
    Suffix(String),
    FindReplace { find: String, with: String },
    FindReplacePattern { pattern: Regex, with: String },
}

impl TermEdit {
    /// The edited term, or `None` when the edit has nothing to apply.
    fn apply(&self, current: &str) -> Option<String> {
        match self {
            TermEdit::Replace(text) if !text.is_empty() => Some(text.clone()),
            TermEdit::Prefix(text) if !text.is_empty() => Some(format!("{}{}", text, current)),
            TermEdit::Suffix(text) if !text.is_empty() => Some(format!("{}{}", current, text)),
            TermEdit::FindReplace { find, with } if !find.is_empty() => {
                Some(current.replace(find.as_str(), with))
            }
            TermEdit::FindReplacePattern { pattern, with } if !pattern.as_str().is_empty() => {
                Some(pattern.replace_all(current, with.as_str()).into_owned())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OverrideStore {
    entries: BTreeMap<RecordId, OverrideEntry>,
    selection: BTreeSet<RecordId>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, id: RecordId) -> Option<&OverrideEntry> {
        self.entries.get(&id)
    }

    pub fn entries(&self) -> &BTreeMap<RecordId, OverrideEntry> {
        &self.entries
    }

    pub fn is_completed(&self, id: RecordId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.completed)
    }

    pub fn completed_count(&self) -> usize {
        self.entries.values().filter(|e| e.completed).count()
    }

    pub fn effective_term<'a>(&'a self, record: &'a TermRecord) -> &'a str {
        self.entries
            .get(&record.id)
            .and_then(|e| e.edited_proposed_term.as_deref())
            .unwrap_or(&record.base_proposed_term)
    }

    pub fn effective_categories(&self, record: &TermRecord) -> CategorySet {
        self.entries
            .get(&record.id)
            .and_then(|e| e.edited_categories.clone())
            .unwrap_or_else(|| CategorySet::single(record.base_category))
    }

    // --- Single-record edits ---

    pub fn set_completed(&mut self, id: RecordId, completed: bool) -> Option<OverrideChange> {
        if self.is_completed(id) == completed {
            return None;
        }
        self.entries.entry(id).or_default().completed = completed;
        Some(OverrideChange::Completed { id, completed })
    }

    /// An empty `text` is stored as-is; it does not clear the override.
    pub fn edit_proposed_term(&mut self, id: RecordId, text: &str) -> Option<OverrideChange> {
        let entry = self.entries.entry(id).or_default();
        if entry.edited_proposed_term.as_deref() == Some(text) {
            return None;
        }
        entry.edited_proposed_term = Some(text.to_string());
        Some(OverrideChange::ProposedTerm {
            id,
            term: text.to_string(),
        })
    }

    pub fn add_category(
        &mut self,
        record: &TermRecord,
        category: Category,
    ) -> Option<OverrideChange> {
        self.update_categories(record, |set| set.insert(category))
    }

    pub fn remove_category(
        &mut self,
        record: &TermRecord,
        category: Category,
    ) -> Option<OverrideChange> {
        self.update_categories(record, |set| set.remove(category))
    }

    pub fn replace_category(
        &mut self,
        record: &TermRecord,
        old: Category,
        new: Category,
    ) -> Option<OverrideChange> {
        self.update_categories(record, |set| set.replace(old, new))
    }

    fn set_categories(&mut self, record: &TermRecord, set: CategorySet) -> Option<OverrideChange> {
        self.update_categories(record, |current| {
            if *current == set {
                return false;
            }
            *current = set.clone();
            true
        })
    }

    fn update_categories<F>(&mut self, record: &TermRecord, mutate: F) -> Option<OverrideChange>
    where
        F: FnOnce(&mut CategorySet) -> bool,
    {
        let mut set = self.effective_categories(record);
        if !mutate(&mut set) {
            return None;
        }
        let categories = set.as_slice().to_vec();
        self.entries.entry(record.id).or_default().edited_categories = Some(set);
        Some(OverrideChange::Categories {
            id: record.id,
            categories,
        })
    }

    // --- Bulk edits ---

    pub fn bulk_apply_category(
        &mut self,
        records: &[&TermRecord],
        category: Category,
        mode: CategoryMode,
    ) -> Vec<OverrideChange> {
        records
            .iter()
            .filter_map(|record| match mode {
                CategoryMode::Add => self.add_category(record, category),
                CategoryMode::Remove => self.remove_category(record, category),
                CategoryMode::Replace => {
                    self.set_categories(record, CategorySet::single(category))
                }
            })
            .collect()
    }

    pub fn bulk_edit_terms(&mut self, records: &[&TermRecord], edit: &TermEdit) -> Vec<OverrideChange> {
        let mut changes = Vec::new();
        for record in records {
            let current = self.effective_term(record).to_string();
            let Some(edited) = edit.apply(&current) else {
                continue;
            };
            if edited == current {
                continue;
            }
            if let Some(change) = self.edit_proposed_term(record.id, &edited) {
                changes.push(change);
            }
        }
        changes
    }

    // --- Selection ---

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selection.contains(&id)
    }

    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selection.iter().copied().collect()
    }

    pub fn select(&mut self, id: RecordId) -> bool {
        self.selection.insert(id)
    }

    pub fn deselect(&mut self, id: RecordId) -> bool {
        self.selection.remove(&id)
    }

    /// Flip one id; returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        if self.selection.remove(&id) {
            false
        } else {
            self.selection.insert(id);
            true
        }
    }

    /// "Select all" over the currently listed ids. Turning it off clears the
    /// whole selection, not only the listed ids.
    pub fn set_all_selected(&mut self, ids: &[RecordId], selected: bool) {
        if selected {
            self.selection.extend(ids.iter().copied());
        } else {
            self.selection.clear();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- Snapshots ---

    pub fn to_snapshot(&self, last_updated: DateTime<Utc>) -> Snapshot {
        let mut snapshot = Snapshot {
            last_updated: Some(last_updated),
            ..Default::default()
        };
        for (id, entry) in &self.entries {
            if entry.completed {
                snapshot.completed_ids.insert(*id);
            }
            if let Some(term) = &entry.edited_proposed_term {
                snapshot.edited_terms.insert(*id, term.clone());
            }
            if let Some(categories) = &entry.edited_categories {
                snapshot.edited_categories.insert(*id, categories.clone());
            }
        }
        snapshot
    }

    /// Swap every override for the snapshot's content. The selection is local and
    /// survives.
    pub fn replace_from_snapshot(&mut self, snapshot: &Snapshot) -> OverrideChange {
        self.entries = entries_from_snapshot(snapshot);
        OverrideChange::Replaced
    }
}

fn entries_from_snapshot(snapshot: &Snapshot) -> BTreeMap<RecordId, OverrideEntry> {
    let mut entries: BTreeMap<RecordId, OverrideEntry> = BTreeMap::new();
    for id in &snapshot.completed_ids {
        entries.entry(*id).or_default().completed = true;
    }
    for (id, term) in &snapshot.edited_terms {
        entries.entry(*id).or_default().edited_proposed_term = Some(term.clone());
    }
    for (id, categories) in &snapshot.edited_categories {
        entries.entry(*id).or_default().edited_categories = Some(categories.clone());
    }
    entries
}
