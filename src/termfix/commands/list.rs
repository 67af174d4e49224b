use crate::commands::{CmdMessage, CmdResult, Workspace};
use crate::error::Result;
use crate::model::RecordId;
use crate::view::{query, RecordFilter, SortOrder};

use super::helpers::resolve_ids;

pub fn run(ws: &Workspace, filter: &RecordFilter, sort: SortOrder) -> CmdResult {
    let listed = query(&ws.records, &ws.overrides, filter, sort);
    let mut result = CmdResult::default();
    if listed.is_empty() {
        result.add_message(CmdMessage::info("No terms match the current filters."));
    }
    result.with_listed_records(listed)
}

pub fn show(ws: &Workspace, ids: &[RecordId]) -> Result<CmdResult> {
    let records = resolve_ids(&ws.records, ids)?;
    Ok(CmdResult::default().with_listed_records(
        records.into_iter().map(|r| ws.effective(r)).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InputTerm;
    use crate::error::TriageError;
    use crate::overrides::OverrideStore;
    use crate::records::build_records;
    use crate::view::StatusFilter;

    fn workspace() -> Workspace {
        let records = build_records(&[
            InputTerm::new("tulip", 2),
            InputTerm::new("\"rose", 12),
            InputTerm::new("lavendar", 30),
        ]);
        Workspace::new(records, OverrideStore::new())
    }

    #[test]
    fn lists_by_impact() {
        let result = run(&workspace(), &RecordFilter::default(), SortOrder::Impact);
        let terms: Vec<&str> = result
            .listed_records
            .iter()
            .map(|r| r.record.raw_term.as_str())
            .collect();
        assert_eq!(terms, vec!["lavendar", "\"rose", "tulip"]);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn empty_listing_reports_it() {
        let mut ws = workspace();
        ws.overrides.set_completed(1, true);
        let filter = RecordFilter {
            search: Some("tulip".into()),
            status: StatusFilter::Pending,
            ..Default::default()
        };
        let result = run(&ws, &filter, SortOrder::Id);
        assert!(result.listed_records.is_empty());
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn show_returns_requested_records() {
        let result = show(&workspace(), &[3, 1]).unwrap();
        assert_eq!(result.listed_records[0].proposed_term, "lavender");
        assert_eq!(result.listed_records[1].record.raw_term, "tulip");
    }

    #[test]
    fn show_unknown_id_fails() {
        assert!(matches!(
            show(&workspace(), &[4]),
            Err(TriageError::RecordNotFound(4))
        ));
    }
}
