use crate::commands::{CmdMessage, CmdResult, Workspace};
use crate::error::Result;
use crate::model::{Category, RecordId, TermRecord};
use crate::overrides::{CategoryMode, OverrideChange};
use crate::view::EffectiveRecord;

use super::helpers::{find_record, resolve_ids};

pub fn add(ws: &mut Workspace, id: RecordId, category: Category) -> Result<CmdResult> {
    let record = find_record(&ws.records, id)?;
    let change = ws.overrides.add_category(record, category);
    Ok(single_result(ws, record, change))
}

pub fn remove(ws: &mut Workspace, id: RecordId, category: Category) -> Result<CmdResult> {
    let record = find_record(&ws.records, id)?;
    let change = ws.overrides.remove_category(record, category);
    Ok(single_result(ws, record, change))
}

pub fn replace(ws: &mut Workspace, id: RecordId, old: Category, new: Category) -> Result<CmdResult> {
    let record = find_record(&ws.records, id)?;
    let change = ws.overrides.replace_category(record, old, new);
    Ok(single_result(ws, record, change))
}

pub fn bulk(
    ws: &mut Workspace,
    ids: &[RecordId],
    category: Category,
    mode: CategoryMode,
) -> Result<CmdResult> {
    let records = resolve_ids(&ws.records, ids)?;
    let changes = ws.overrides.bulk_apply_category(&records, category, mode);

    let mut result = CmdResult::default();
    let verb = match mode {
        CategoryMode::Add => "Added",
        CategoryMode::Remove => "Removed",
        CategoryMode::Replace => "Set",
    };
    if changes.is_empty() {
        result.add_message(CmdMessage::info("No categories changed."));
    } else {
        result.add_message(CmdMessage::success(format!(
            "{} '{}' on {} term(s)",
            verb,
            category,
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

fn single_result(ws: &Workspace, record: &TermRecord, change: Option<OverrideChange>) -> CmdResult {
    let mut result = CmdResult::default();
    let effective = EffectiveRecord::new(record, &ws.overrides);
    let tags: Vec<&str> = effective.categories.iter().map(Category::as_str).collect();
    match change {
        Some(change) => {
            result.add_message(CmdMessage::success(format!(
                "Term {} categories: {}",
                record.id,
                tags.join(", ")
            )));
            result.changes.push(change);
        }
        None => result.add_message(CmdMessage::info(format!(
            "Term {} categories unchanged: {}",
            record.id,
            tags.join(", ")
        ))),
    }
    result.affected_records.push(effective);
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
                InputTerm::new("best by 12/01/2024", 4),
                InputTerm::new("christmas wreath", 9),
                InputTerm::new("tulip", 1),
            ]),
            OverrideStore::new(),
        )
    }

    #[test]
    fn removing_sole_category_falls_back_to_unknown() {
        let mut ws = workspace();
        let result = remove(&mut ws, 1, Category::Bbd).unwrap();
        assert_eq!(result.affected_records[0].categories, vec![Category::Unknown]);
        assert_eq!(result.changes.len(), 1);
    }

    #[test]
    fn adding_present_category_changes_nothing() {
        let mut ws = workspace();
        let result = add(&mut ws, 2, Category::Seasonal).unwrap();
        assert!(result.changes.is_empty());
        assert!(ws.overrides.entry(2).is_none());
    }

    #[test]
    fn replace_keeps_position() {
        let mut ws = workspace();
        add(&mut ws, 2, Category::Synonym).unwrap();
        let result = replace(&mut ws, 2, Category::Seasonal, Category::Bbd).unwrap();
        assert_eq!(
            result.affected_records[0].categories,
            vec![Category::Bbd, Category::Synonym]
        );
    }

    #[test]
    fn bulk_replace_sets_single_category() {
        let mut ws = workspace();
        let result = bulk(&mut ws, &[1, 2, 3], Category::NotAvailable, CategoryMode::Replace).unwrap();
        assert_eq!(result.changes.len(), 3);
        for record in &result.affected_records {
            assert_eq!(record.categories, vec![Category::NotAvailable]);
        }
    }

    #[test]
    fn bulk_add_skips_records_that_have_it() {
        let mut ws = workspace();
        let result = bulk(&mut ws, &[2, 3], Category::Seasonal, CategoryMode::Add).unwrap();
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].record_id(), Some(3));
    }

    #[test]
    fn bulk_with_repeated_ids_reports_each_term_once() {
        let mut ws = workspace();
        let result = bulk(&mut ws, &[3, 3, 3], Category::Bbd, CategoryMode::Add).unwrap();
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.affected_records.len(), 1);
    }

    #[test]
    fn unknown_record_is_an_error() {
        let mut ws = workspace();
        assert!(add(&mut ws, 99, Category::Typo).is_err());
    }
}
