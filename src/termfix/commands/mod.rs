use crate::model::TermRecord;
use crate::overrides::{OverrideChange, OverrideStore};
use crate::view::{EffectiveRecord, Stats};

pub mod categorize;
pub mod complete;
pub mod export;
pub mod helpers;
pub mod list;
pub mod select;
pub mod status;
pub mod terms;

/// The computed records of one dataset plus the operator's overrides on top.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub records: Vec<TermRecord>,
    pub overrides: OverrideStore,
}

impl Workspace {
    pub fn new(records: Vec<TermRecord>, overrides: OverrideStore) -> Self {
        Self { records, overrides }
    }

    pub fn effective(&self, record: &TermRecord) -> EffectiveRecord {
        EffectiveRecord::new(record, &self.overrides)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Records touched by a mutation, with their values after the change.
    pub affected_records: Vec<EffectiveRecord>,
    pub listed_records: Vec<EffectiveRecord>,
    /// Change events for the persistence layer. Empty when nothing changed.
    pub changes: Vec<OverrideChange>,
    pub stats: Option<Stats>,
    /// Rendered document (CSV, SQL) ready to be written somewhere.
    pub output: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_records(mut self, records: Vec<EffectiveRecord>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_output(mut self, output: String) -> Self {
        self.output = Some(output);
        self
    }

    /// Whether any change must reach the remote store.
    pub fn needs_persist(&self) -> bool {
        self.changes.iter().any(OverrideChange::needs_persist)
    }
}
