//! Export the effective view of a record set.
//!
//! The CSV report is for humans reviewing the triage; the SQL script is the batch
//! update a DBA runs against the `search_terms` table. Both read effective values
//! only, so overrides always win over computed ones.

use crate::commands::{CmdMessage, CmdResult, Workspace};
use crate::model::Category;
use crate::view::{query, EffectiveRecord, RecordFilter, SortOrder};
use chrono::{DateTime, SecondsFormat, Utc};

const CSV_HEADER: [&str; 9] = [
    "ID",
    "Fixed",
    "Current Database Term",
    "Failed Searches",
    "Issue Type",
    "Specific Problems",
    "Recommended Action",
    "Proposed Corrected Term",
    "Priority",
];

pub fn csv_report(ws: &Workspace, filter: &RecordFilter, sort: SortOrder) -> CmdResult {
    let records = query(&ws.records, &ws.overrides, filter, sort);
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} term(s) to CSV",
        records.len()
    )));
    result.with_output(to_csv(&records))
}

pub fn sql_script(
    ws: &Workspace,
    filter: &RecordFilter,
    sort: SortOrder,
    now: DateTime<Utc>,
) -> CmdResult {
    let records = query(&ws.records, &ws.overrides, filter, sort);
    let script = to_sql(&records, now);
    let fixes = records.iter().filter(|r| r.needs_change()).count();

    let mut result = CmdResult::default();
    if fixes == 0 {
        result.add_message(CmdMessage::warning("No terms need a database change."));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Generated {} UPDATE statement(s)",
            fixes
        )));
    }
    result.with_output(script)
}

pub fn to_csv(records: &[EffectiveRecord]) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(csv_row(CSV_HEADER.iter().map(|h| h.to_string())));

    for rec in records {
        let categories: Vec<&str> = rec.categories.iter().map(Category::as_str).collect();
        let problems: Vec<String> = rec.record.issues.iter().map(|i| i.to_string()).collect();
        let proposed = if rec.needs_change() {
            rec.proposed_term.clone()
        } else {
            String::new()
        };

        rows.push(csv_row([
            rec.record.id.to_string(),
            if rec.completed { "Yes" } else { "No" }.to_string(),
            rec.record.raw_term.clone(),
            rec.record.occurrence_count.to_string(),
            categories.join(", "),
            problems.join("; "),
            rec.record.suggested_fix.clone(),
            proposed,
            rec.record.priority.as_str().to_uppercase(),
        ]));
    }

    rows.join("\n")
}

fn csv_row<I: IntoIterator<Item = String>>(fields: I) -> String {
    fields
        .into_iter()
        .map(|f| format!("\"{}\"", f.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn to_sql(records: &[EffectiveRecord], now: DateTime<Utc>) -> String {
    let fixes: Vec<&EffectiveRecord> = records.iter().filter(|r| r.needs_change()).collect();
    let completed = fixes.iter().filter(|r| r.completed).count();

    let header = [
        "-- Database Cleanup Script".to_string(),
        format!(
            "-- Generated: {}",
            now.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        format!("-- Total terms to fix: {}", fixes.len()),
        format!("-- Completed: {}", completed),
        format!("-- Remaining: {}", fixes.len() - completed),
    ];

    let statements: Vec<String> = fixes.iter().map(|rec| update_statement(rec)).collect();

    let mut script = header.join("\n");
    script.push('\n');
    if !statements.is_empty() {
        script.push('\n');
        script.push_str(&statements.join("\n\n"));
        script.push('\n');
    }
    script
}

fn update_statement(rec: &EffectiveRecord) -> String {
    let mut statement = format!(
        "-- Fix: {} -> {} ({} failed searches)\nUPDATE search_terms SET term = '{}' WHERE term = '{}';",
        rec.record.raw_term,
        rec.proposed_term,
        rec.record.occurrence_count,
        sql_escape(&rec.proposed_term),
        sql_escape(&rec.record.raw_term),
    );
    if rec.completed {
        statement.push_str(" -- COMPLETED");
    }
    statement
}

fn sql_escape(value: &str) -> String {
    value.replace('\'', "''")
}
