use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use termfix::api::{CmdMessage, MessageLevel};
use termfix::model::{Category, Priority};
use termfix::sync::SyncStatus;
use termfix::view::{EffectiveRecord, Stats};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TERM_WIDTH: usize = 32;
const PROPOSED_WIDTH: usize = 32;
const DONE_MARKER: &str = "✓";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_records(records: &[EffectiveRecord]) {
    for rec in records {
        println!("{}", record_line(rec));
    }
}

fn record_line(rec: &EffectiveRecord) -> String {
    let idx = format!("{:>4}. ", rec.record.id);
    let marker = if rec.completed {
        DONE_MARKER.green()
    } else {
        " ".normal()
    };

    let term = pad_to_width(&truncate_to_width(&rec.record.raw_term, TERM_WIDTH), TERM_WIDTH);
    let proposed = if rec.needs_change() {
        pad_to_width(
            &truncate_to_width(&rec.proposed_term, PROPOSED_WIDTH),
            PROPOSED_WIDTH,
        )
        .cyan()
    } else {
        pad_to_width("-", PROPOSED_WIDTH).dimmed()
    };

    format!(
        "{}{} {} {} {:>6} {} {}",
        idx,
        marker,
        term,
        proposed,
        rec.record.occurrence_count,
        priority_label(rec.record.priority),
        category_list(&rec.categories).dimmed()
    )
}

pub(super) fn print_record_details(records: &[EffectiveRecord]) {
    for (i, rec) in records.iter().enumerate() {
        if i > 0 {
            println!("\n--------------------------------\n");
        }
        let state = if rec.completed {
            "completed".green()
        } else {
            "pending".yellow()
        };
        println!(
            "{} {} ({})",
            format!("{}.", rec.record.id).yellow(),
            rec.record.raw_term.bold(),
            state
        );
        println!("  Failed searches:  {}", rec.record.occurrence_count);
        println!("  Priority:         {}", priority_label(rec.record.priority));
        println!("  Categories:       {}", category_list(&rec.categories));
        if rec.record.issues.is_empty() {
            println!("  Issues:           {}", "none".dimmed());
        } else {
            let issues: Vec<String> = rec.record.issues.iter().map(|i| i.to_string()).collect();
            println!("  Issues:           {}", issues.join("; "));
        }
        println!("  Recommendation:   {}", rec.record.suggested_fix);
        println!("  Proposed term:    {}", rec.proposed_term.cyan());
        if rec.proposed_term != rec.record.base_proposed_term {
            println!(
                "  Computed term:    {}",
                rec.record.base_proposed_term.dimmed()
            );
        }
    }
}

pub(super) fn print_stats(stats: &Stats) {
    println!("{}", "Dataset".bold());
    println!("  Total terms:        {}", stats.total_terms);
    println!("  Failed searches:    {}", stats.total_impact);
    println!("  Critical:           {}", stats.critical.to_string().red());
    println!("  Formatting issues:  {}", stats.formatting);
    println!("  Needing a change:   {}", stats.needs_change);
    println!("{}", "Progress".bold());
    println!("  Completed:          {}", stats.completed.to_string().green());
    println!("  Remaining:          {}", stats.remaining);
}

pub(super) fn print_sync_status(status: &SyncStatus, last_synced: Option<DateTime<Utc>>) {
    let label = match status {
        SyncStatus::Connected => "connected".green(),
        SyncStatus::Disconnected(reason) => format!("disconnected ({})", reason).red(),
        SyncStatus::Offline => "offline".yellow(),
    };
    println!("Store:        {}", label);
    match last_synced {
        Some(at) => println!("Last synced:  {}", format_time_ago(at)),
        None => println!("Last synced:  {}", "never".dimmed()),
    }
}

fn priority_label(priority: Priority) -> ColoredString {
    let text = format!("{:<8}", priority.as_str().to_uppercase());
    match priority {
        Priority::Critical => text.red().bold(),
        Priority::High => text.red(),
        Priority::Medium => text.yellow(),
        Priority::Low => text.normal(),
    }
}

fn category_list(categories: &[Category]) -> String {
    categories
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}
