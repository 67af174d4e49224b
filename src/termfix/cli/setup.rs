use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use termfix::model::RecordId;
use termfix::overrides::CategoryMode;

#[derive(Parser, Debug)]
#[command(name = "termfix", bin_name = "termfix", version)]
#[command(about = "Triage failed product-search terms and export the fixes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input JSON file of {"term", "count"} entries
    #[arg(short, long, global = true, help_heading = "Options")]
    pub input: Option<PathBuf>,

    /// Directory holding saved overrides
    #[arg(long, global = true, help_heading = "Options")]
    pub store: Option<PathBuf>,

    /// Work in memory only; nothing is loaded or saved
    #[arg(long, global = true, help_heading = "Options")]
    pub offline: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List terms (default command)
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show full details of terms
    Show {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<RecordId>,
    },

    /// Mark terms as fixed
    #[command(alias = "done")]
    Complete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<RecordId>,
    },

    /// Mark terms as not fixed
    Reopen {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<RecordId>,
    },

    /// Override the proposed replacement of one term
    Edit { id: RecordId, text: String },

    /// Change the categories of one term
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Apply one category to many terms
    BulkCategory {
        mode: BulkMode,
        tag: String,
        #[arg(required = true, num_args = 1..)]
        ids: Vec<RecordId>,
    },

    /// Rewrite the proposed replacement of many terms
    BulkTerm {
        #[command(subcommand)]
        action: BulkTermAction,
    },

    /// Show dataset statistics
    Stats,

    /// Export the (filtered) terms as a CSV report or a SQL script
    Export {
        format: ExportFormat,

        /// Output file; "-" prints to stdout. Defaults to the configured filename
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Reload saved overrides from the store and report its status
    Sync,

    /// Print the dataset key overrides are saved under
    Key,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive search on the raw term
    #[arg(short, long)]
    pub search: Option<String>,

    /// low, medium, high or critical
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Only terms carrying this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// all, pending or completed
    #[arg(long)]
    pub status: Option<String>,

    /// impact, alphabetical, category or id
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CategoryAction {
    Add { id: RecordId, tag: String },
    Remove { id: RecordId, tag: String },
    Replace { id: RecordId, old: String, new: String },
}

#[derive(Subcommand, Debug)]
pub enum BulkTermAction {
    /// Set the proposed term to TEXT
    Replace {
        text: String,
        #[arg(required = true, num_args = 1..)]
        ids: Vec<RecordId>,
    },
    Prefix {
        text: String,
        #[arg(required = true, num_args = 1..)]
        ids: Vec<RecordId>,
    },
    Suffix {
        text: String,
        #[arg(required = true, num_args = 1..)]
        ids: Vec<RecordId>,
    },
    /// Replace every occurrence of FIND with WITH
    FindReplace {
        find: String,
        with: String,
        /// Treat FIND as a regular expression
        #[arg(long)]
        regex: bool,
        #[arg(required = true, num_args = 1..)]
        ids: Vec<RecordId>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BulkMode {
    Add,
    Remove,
    Replace,
}

impl From<BulkMode> for CategoryMode {
    fn from(mode: BulkMode) -> Self {
        match mode {
            BulkMode::Add => CategoryMode::Add,
            BulkMode::Remove => CategoryMode::Remove,
            BulkMode::Replace => CategoryMode::Replace,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Sql,
}
