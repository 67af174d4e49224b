//! Selection is session-local: it never produces change events and is never
//! written to the remote store.

use crate::commands::{CmdMessage, CmdResult, Workspace};
use crate::error::Result;
use crate::model::RecordId;
use crate::view::{query, RecordFilter, SortOrder};

use super::helpers::resolve_ids;

pub fn select(ws: &mut Workspace, ids: &[RecordId]) -> Result<CmdResult> {
    resolve_ids(&ws.records, ids)?;
    for id in ids {
        ws.overrides.select(*id);
    }
    Ok(selection_result(ws))
}

pub fn deselect(ws: &mut Workspace, ids: &[RecordId]) -> Result<CmdResult> {
    resolve_ids(&ws.records, ids)?;
    for id in ids {
        ws.overrides.deselect(*id);
    }
    Ok(selection_result(ws))
}

pub fn toggle(ws: &mut Workspace, id: RecordId) -> Result<CmdResult> {
    resolve_ids(&ws.records, &[id])?;
    ws.overrides.toggle(id);
    Ok(selection_result(ws))
}

/// Select every record the filter lists, or clear the whole selection.
pub fn select_all(ws: &mut Workspace, filter: &RecordFilter, selected: bool) -> CmdResult {
    let ids: Vec<RecordId> = query(&ws.records, &ws.overrides, filter, SortOrder::Id)
        .iter()
        .map(|r| r.record.id)
        .collect();
    ws.overrides.set_all_selected(&ids, selected);
    selection_result(ws)
}

pub fn clear(ws: &mut Workspace) -> CmdResult {
    ws.overrides.clear_selection();
    selection_result(ws)
}

fn selection_result(ws: &Workspace) -> CmdResult {
    let selected = ws.overrides.selected_ids();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!("{} term(s) selected", selected.len())));
    result.listed_records = ws
        .records
        .iter()
        .filter(|r| ws.overrides.is_selected(r.id))
        .map(|r| ws.effective(r))
        .collect();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InputTerm;
    use crate::overrides::OverrideStore;
    use crate::records::build_records;

    fn workspace() -> Workspace {
        Workspace::new(
            build_records(&[
                InputTerm::new("rose", 1),
                InputTerm::new("tulip", 2),
                InputTerm::new("red rose", 3),
            ]),
            OverrideStore::new(),
        )
    }

    #[test]
    fn select_and_toggle() {
        let mut ws = workspace();
        select(&mut ws, &[1, 2]).unwrap();
        let result = toggle(&mut ws, 2).unwrap();
        assert_eq!(ws.overrides.selected_ids(), vec![1]);
        assert!(result.changes.is_empty());
        assert_eq!(result.listed_records.len(), 1);
    }

    #[test]
    fn select_all_follows_filter() {
        let mut ws = workspace();
        let roses = RecordFilter {
            search: Some("rose".into()),
            ..Default::default()
        };
        select_all(&mut ws, &roses, true);
        assert_eq!(ws.overrides.selected_ids(), vec![1, 3]);
    }

    #[test]
    fn deselect_all_clears_everything() {
        let mut ws = workspace();
        select(&mut ws, &[2]).unwrap();
        let roses = RecordFilter {
            search: Some("rose".into()),
            ..Default::default()
        };
        select_all(&mut ws, &roses, false);
        assert!(ws.overrides.selected_ids().is_empty());
    }

    #[test]
    fn selecting_unknown_id_fails() {
        let mut ws = workspace();
        assert!(select(&mut ws, &[1, 7]).is_err());
        assert!(ws.overrides.selected_ids().is_empty());
    }

    #[test]
    fn clear_drops_selection() {
        let mut ws = workspace();
        select(&mut ws, &[1, 2, 3]).unwrap();
        clear(&mut ws);
        assert!(ws.overrides.selected_ids().is_empty());
    }
}
