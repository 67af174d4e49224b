//! # CLI Layer
//!
//! One possible client of the triage API. This is the only place that:
//! - Knows about terminal I/O and output files
//! - Decides where config and saved overrides live
//! - Installs the tracing subscriber
//!
//! Every invocation is a short session: load the input, connect to the override
//! store, run one command, then flush any pending save before exiting so no edit
//! waits on a debounce timer that will never fire.

use super::render::{
    print_messages, print_record_details, print_records, print_stats, print_sync_status,
};
use super::setup::{BulkTermAction, CategoryAction, Cli, Commands, ExportFormat, FilterArgs};
use clap::Parser;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use termfix::api::TriageApi;
use termfix::config::TriageConfig;
use termfix::dataset::load_input;
use termfix::error::{Result, TriageError};
use termfix::model::{Category, Priority, RecordId};
use termfix::overrides::{CategoryMode, TermEdit};
use termfix::sync::fs::FileRemote;
use termfix::view::{RecordFilter, SortOrder, StatusFilter};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const PROJECT_DIR: &str = ".termfix";
const LOG_ENV: &str = "TERMFIX_LOG";

struct AppContext {
    api: TriageApi<FileRemote>,
    config: TriageConfig,
    store_dir: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ctx = init_context(&cli)?;

    let outcome = match cli.command {
        Some(Commands::List { filter }) => handle_list(&mut ctx, &filter),
        Some(Commands::Show { ids }) => handle_show(&mut ctx, &ids),
        Some(Commands::Complete { ids }) => handle_complete(&mut ctx, &ids),
        Some(Commands::Reopen { ids }) => handle_reopen(&mut ctx, &ids),
        Some(Commands::Edit { id, text }) => handle_edit(&mut ctx, id, &text),
        Some(Commands::Category { action }) => handle_category(&mut ctx, action),
        Some(Commands::BulkCategory { mode, tag, ids }) => {
            handle_bulk_category(&mut ctx, mode.into(), &tag, &ids)
        }
        Some(Commands::BulkTerm { action }) => handle_bulk_term(&mut ctx, action),
        Some(Commands::Stats) => handle_stats(&mut ctx),
        Some(Commands::Export {
            format,
            output,
            filter,
        }) => handle_export(&mut ctx, format, output, &filter),
        Some(Commands::Sync) => handle_sync(&mut ctx),
        Some(Commands::Key) => {
            println!("{}", ctx.api.dataset_key());
            Ok(())
        }
        None => handle_list(&mut ctx, &FilterArgs::default()),
    };

    finish(&mut ctx);
    outcome
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let project_dir = cwd.join(PROJECT_DIR);

    // A .termfix dir in the working directory wins over the per-user data dir.
    let base_dir = if project_dir.is_dir() {
        project_dir
    } else {
        ProjectDirs::from("com", "termfix", "termfix")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| TriageError::Api("Could not determine data directory".into()))?
    };
    let config = TriageConfig::load(&base_dir)?;

    let input = cli
        .input
        .clone()
        .or_else(|| config.input.clone())
        .ok_or_else(|| {
            TriageError::Api("No input file: pass --input or set \"input\" in config.json".into())
        })?;
    let inputs = load_input(&input)?;

    let (api, store_dir) = if cli.offline {
        (TriageApi::open(&inputs, None, config.debounce())?, None)
    } else {
        let store_dir = cli
            .store
            .clone()
            .unwrap_or_else(|| base_dir.join("overrides"));
        let remote = FileRemote::new(store_dir.clone());
        (
            TriageApi::open(&inputs, Some(remote), config.debounce())?,
            Some(store_dir),
        )
    };

    Ok(AppContext {
        api,
        config,
        store_dir,
    })
}

/// Push out anything still waiting on the debouncer.
fn finish(ctx: &mut AppContext) {
    ctx.api.flush();
    if ctx.api.has_pending_save() {
        warn!(status = ?ctx.api.sync_status(), "edits were not saved");
        eprintln!("Warning: edits could not be saved and are lost when this command exits.");
    }
}

fn build_filter(args: &FilterArgs) -> Result<RecordFilter> {
    Ok(RecordFilter {
        search: args.search.clone(),
        priority: args.priority.as_deref().map(str::parse::<Priority>).transpose()?,
        category: args.category.as_deref().map(str::parse::<Category>).transpose()?,
        status: args
            .status
            .as_deref()
            .map(str::parse::<StatusFilter>)
            .transpose()?
            .unwrap_or_default(),
    })
}

fn sort_order(ctx: &AppContext, args: &FilterArgs) -> Result<SortOrder> {
    match &args.sort {
        Some(sort) => sort.parse(),
        None => ctx.config.sort_order(),
    }
}

fn handle_list(ctx: &mut AppContext, args: &FilterArgs) -> Result<()> {
    let filter = build_filter(args)?;
    let result = ctx.api.list(&filter, sort_order(ctx, args)?)?;
    print_records(&result.listed_records);
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &mut AppContext, ids: &[RecordId]) -> Result<()> {
    let result = ctx.api.show(ids)?;
    print_record_details(&result.listed_records);
    print_messages(&result.messages);
    Ok(())
}

fn handle_complete(ctx: &mut AppContext, ids: &[RecordId]) -> Result<()> {
    let result = ctx.api.complete(ids)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_reopen(ctx: &mut AppContext, ids: &[RecordId]) -> Result<()> {
    let result = ctx.api.reopen(ids)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, id: RecordId, text: &str) -> Result<()> {
    let result = ctx.api.edit_term(id, text)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_category(ctx: &mut AppContext, action: CategoryAction) -> Result<()> {
    let result = match action {
        CategoryAction::Add { id, tag } => ctx.api.add_category(id, &tag)?,
        CategoryAction::Remove { id, tag } => ctx.api.remove_category(id, &tag)?,
        CategoryAction::Replace { id, old, new } => ctx.api.replace_category(id, &old, &new)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_bulk_category(
    ctx: &mut AppContext,
    mode: CategoryMode,
    tag: &str,
    ids: &[RecordId],
) -> Result<()> {
    let result = ctx.api.bulk_category(ids, tag, mode)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_bulk_term(ctx: &mut AppContext, action: BulkTermAction) -> Result<()> {
    let result = match action {
        BulkTermAction::Replace { text, ids } => {
            ctx.api.bulk_edit_terms(&ids, &TermEdit::Replace(text))?
        }
        BulkTermAction::Prefix { text, ids } => {
            ctx.api.bulk_edit_terms(&ids, &TermEdit::Prefix(text))?
        }
        BulkTermAction::Suffix { text, ids } => {
            ctx.api.bulk_edit_terms(&ids, &TermEdit::Suffix(text))?
        }
        BulkTermAction::FindReplace {
            find,
            with,
            regex,
            ids,
        } => ctx.api.bulk_find_replace(&ids, &find, &with, regex)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_stats(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.stats()?;
    if let Some(stats) = &result.stats {
        print_stats(stats);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(
    ctx: &mut AppContext,
    format: ExportFormat,
    output: Option<PathBuf>,
    args: &FilterArgs,
) -> Result<()> {
    let filter = build_filter(args)?;
    let sort = sort_order(ctx, args)?;
    let (result, default_name) = match format {
        ExportFormat::Csv => (ctx.api.export_csv(&filter, sort)?, &ctx.config.csv_filename),
        ExportFormat::Sql => (ctx.api.export_sql(&filter, sort)?, &ctx.config.sql_filename),
    };
    let document = result.output.unwrap_or_default();

    let target = output.unwrap_or_else(|| PathBuf::from(default_name));
    if target == Path::new("-") {
        print!("{}", document);
        return Ok(());
    }

    fs::write(&target, document)?;
    print_messages(&result.messages);
    println!("Wrote {}", target.display());
    Ok(())
}

fn handle_sync(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.refresh();
    println!("Dataset:      {}", ctx.api.dataset_key());
    if let Some(dir) = &ctx.store_dir {
        println!("Directory:    {}", dir.display());
    }
    print_sync_status(&ctx.api.sync_status(), ctx.api.last_synced());
    print_messages(&result.messages);
    Ok(())
}
