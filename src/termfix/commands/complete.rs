use crate::commands::{CmdMessage, CmdResult, Workspace};
use crate::error::Result;
use crate::model::RecordId;
use crate::view::EffectiveRecord;

use super::helpers::resolve_ids;

pub fn complete(ws: &mut Workspace, ids: &[RecordId]) -> Result<CmdResult> {
    completion_state(ws, ids, true)
}

pub fn reopen(ws: &mut Workspace, ids: &[RecordId]) -> Result<CmdResult> {
    completion_state(ws, ids, false)
}

fn completion_state(ws: &mut Workspace, ids: &[RecordId], completed: bool) -> Result<CmdResult> {
    let records = resolve_ids(&ws.records, ids)?;
    let mut result = CmdResult::default();

    for record in records {
        match ws.overrides.set_completed(record.id, completed) {
            Some(change) => {
                let verb = if completed { "completed" } else { "reopened" };
                result.add_message(CmdMessage::success(format!(
                    "Term {} {}: {}",
                    record.id, verb, record.raw_term
                )));
                result.changes.push(change);
            }
            None => {
                let state = if completed { "completed" } else { "open" };
                result.add_message(CmdMessage::info(format!(
                    "Term {} is already {}",
                    record.id, state
                )));
            }
        }
        result
            .affected_records
            .push(EffectiveRecord::new(record, &ws.overrides));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InputTerm;
    use crate::overrides::{OverrideChange, OverrideStore};
    use crate::records::build_records;

    fn workspace() -> Workspace {
        Workspace::new(
            build_records(&[InputTerm::new("rose", 1), InputTerm::new("tulip", 2)]),
            OverrideStore::new(),
        )
    }

    #[test]
    fn completing_records_a_change() {
        let mut ws = workspace();
        let result = complete(&mut ws, &[2]).unwrap();
        assert_eq!(
            result.changes,
            vec![OverrideChange::Completed {
                id: 2,
                completed: true
            }]
        );
        assert!(result.affected_records[0].completed);
        assert!(ws.overrides.is_completed(2));
    }

    #[test]
    fn completing_twice_is_a_no_op() {
        let mut ws = workspace();
        complete(&mut ws, &[1]).unwrap();
        let again = complete(&mut ws, &[1]).unwrap();
        assert!(again.changes.is_empty());
        assert!(!again.needs_persist());
    }

    #[test]
    fn reopen_clears_completion() {
        let mut ws = workspace();
        complete(&mut ws, &[1, 2]).unwrap();
        reopen(&mut ws, &[1]).unwrap();
        assert!(!ws.overrides.is_completed(1));
        assert!(ws.overrides.is_completed(2));
    }

    #[test]
    fn bad_id_mutates_nothing() {
        let mut ws = workspace();
        assert!(complete(&mut ws, &[1, 5]).is_err());
        assert!(!ws.overrides.is_completed(1));
    }
}
