use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use model_manager_core::SortKey;

#[derive(Parser)]
#[command(name = "model-manager")]
#[command(about = "Browse, filter and delete local model weight files")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.model-manager)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Directory to scan (repeatable, overrides configured roots)
    #[arg(long = "root", global = true)]
    pub roots: Vec<PathBuf>,

    /// Launch GUI (requires the `gui` feature)
    #[arg(long)]
    pub gui: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table with category, date and size
    Text,
    /// One `<icon> <name> | <size>` line per model
    Compact,
    /// Detailed HTML fragment
    Html,
    /// JSON array of model records
    Json,
}

/// Search and category filter shared by listing commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive substring of the file name
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Category label (e.g. LoRA, VAE, Checkpoint); "All" disables the filter
    #[arg(short, long, default_value = "All")]
    pub category: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List model files
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Sort order: size, name or date (default: display.sort from config)
        #[arg(long)]
        sort: Option<SortKey>,

        /// Output format (default: from display.view in config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Mark a path as selected (repeatable, affects html output and totals)
        #[arg(long = "select")]
        selected: Vec<PathBuf>,
    },

    /// Show count and size totals
    Stats {
        #[command(flatten)]
        filter: FilterArgs,

        /// Selected path (repeatable)
        #[arg(long = "select")]
        selected: Vec<PathBuf>,
    },

    /// List categories present in the scan with counts
    Categories,

    /// Permanently delete model files
    Delete {
        /// Files to delete
        paths: Vec<PathBuf>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Open the folder containing a model file
    Open {
        /// Model file path
        path: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., scan.roots)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., display.sort)
        key: String,

        /// Value (lists: comma-separated or ["a", "b"])
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with default template
    Init,
}
