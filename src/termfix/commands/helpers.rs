use crate::error::{Result, TriageError};
use crate::model::{RecordId, TermRecord};
use std::collections::BTreeSet;

pub fn find_record(records: &[TermRecord], id: RecordId) -> Result<&TermRecord> {
    records
        .iter()
        .find(|r| r.id == id)
        .ok_or(TriageError::RecordNotFound(id))
}

/// Resolve every id up front so a bad id aborts before anything is mutated.
///
/// Ids form a set: repeats are dropped, first occurrences keep their order.
pub fn resolve_ids<'a>(records: &'a [TermRecord], ids: &[RecordId]) -> Result<Vec<&'a TermRecord>> {
    let mut seen = BTreeSet::new();
    ids.iter()
        .filter(|id| seen.insert(**id))
        .map(|id| find_record(records, *id))
        .collect()
}
