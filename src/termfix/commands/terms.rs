use crate::commands::{CmdMessage, CmdResult, Workspace};
use crate::error::Result;
use crate::model::RecordId;
use crate::overrides::TermEdit;
use crate::view::EffectiveRecord;

use super::helpers::{find_record, resolve_ids};

/// Override the proposed term of one record. An empty `text` is stored too.
pub fn edit(ws: &mut Workspace, id: RecordId, text: &str) -> Result<CmdResult> {
    let record = find_record(&ws.records, id)?;
    let mut result = CmdResult::default();

    match ws.overrides.edit_proposed_term(id, text) {
        Some(change) => {
            result.add_message(CmdMessage::success(format!(
                "Term {}: {} -> {}",
                id, record.raw_term, text
            )));
            result.changes.push(change);
        }
        None => result.add_message(CmdMessage::info(format!(
            "Term {} already proposes '{}'",
            id, text
        ))),
    }
    result
        .affected_records
        .push(EffectiveRecord::new(record, &ws.overrides));
    Ok(result)
}

pub fn bulk(ws: &mut Workspace, ids: &[RecordId], edit: &TermEdit) -> Result<CmdResult> {
    let records = resolve_ids(&ws.records, ids)?;
    let changes = ws.overrides.bulk_edit_terms(&records, edit);

    let mut result = CmdResult::default();
    if changes.is_empty() {
        result.add_message(CmdMessage::info("No proposed terms changed."));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Updated {} proposed term(s)",
            changes.len()
        )));
    }
    result.affected_records = records
        .iter()
        .map(|r| EffectiveRecord::new(r, &ws.overrides))
        .collect();
    result.changes = changes;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InputTerm;
    use crate::overrides::OverrideStore;
    use crate::records::build_records;
    use regex::Regex;

    fn workspace() -> Workspace {
        Workspace::new(
            build_records(&[
                InputTerm::new("red rose", 3),
                InputTerm::new("\"white rose", 5),
                InputTerm::new("tulip", 1),
            ]),
            OverrideStore::new(),
        )
    }

    fn proposed(result: &CmdResult) -> Vec<&str> {
        result
            .affected_records
            .iter()
            .map(|r| r.proposed_term.as_str())
            .collect()
    }

    #[test]
    fn edit_overrides_proposed_term() {
        let mut ws = workspace();
        let result = edit(&mut ws, 3, "tulips").unwrap();
        assert_eq!(proposed(&result), vec!["tulips"]);
        assert!(result.needs_persist());
    }

    #[test]
    fn empty_edit_is_stored_literally() {
        let mut ws = workspace();
        let result = edit(&mut ws, 1, "").unwrap();
        assert_eq!(proposed(&result), vec![""]);
    }

    #[test]
    fn prefix_builds_on_effective_term() {
        let mut ws = workspace();
        let result = bulk(&mut ws, &[1, 2], &TermEdit::Prefix("fresh ".into())).unwrap();
        assert_eq!(proposed(&result), vec!["fresh red rose", "fresh white rose"]);
    }

    #[test]
    fn repeated_ids_are_edited_once() {
        let mut ws = workspace();
        let result = bulk(&mut ws, &[1, 1], &TermEdit::Prefix("fresh ".into())).unwrap();
        assert_eq!(result.changes.len(), 1);
        assert_eq!(proposed(&result), vec!["fresh red rose"]);
        assert_eq!(ws.overrides.effective_term(&ws.records[0]), "fresh red rose");
    }

    #[test]
    fn empty_suffix_is_a_no_op() {
        let mut ws = workspace();
        let result = bulk(&mut ws, &[1, 2, 3], &TermEdit::Suffix(String::new())).unwrap();
        assert!(result.changes.is_empty());
        assert!(ws.overrides.entries().is_empty());
    }

    #[test]
    fn find_replace_only_counts_real_changes() {
        let mut ws = workspace();
        let edit = TermEdit::FindReplace {
            find: "rose".into(),
            with: "roses".into(),
        };
        let result = bulk(&mut ws, &[1, 2, 3], &edit).unwrap();
        assert_eq!(result.changes.len(), 2);
        assert_eq!(proposed(&result), vec!["red roses", "white roses", "tulip"]);
    }

    #[test]
    fn pattern_replace() {
        let mut ws = workspace();
        let edit = TermEdit::FindReplacePattern {
            pattern: Regex::new(r"^(\w+) rose$").unwrap(),
            with: "rose ($1)".into(),
        };
        let result = bulk(&mut ws, &[1, 2], &edit).unwrap();
        assert_eq!(proposed(&result), vec!["rose (red)", "rose (white)"]);
    }
}
