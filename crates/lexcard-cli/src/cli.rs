//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lexcard CLI - Turn legal documents into study flashcards.
#[derive(Debug, Parser)]
#[command(name = "lexcard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (questions only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate cards from documents
    Run(RunArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Documents to read (.txt, .pdf, .docx)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Keyword to focus extraction on (repeatable)
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,

    /// Deck name for the exported package
    #[arg(short, long)]
    pub deck: Option<String>,

    /// Write an Anki package after the run
    #[arg(short, long)]
    pub export: bool,

    /// Directory for the exported package
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// API key for the chat completions endpoint
    #[arg(long, env = "LEXCARD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Minimum card quality (0.0-1.0)
    #[arg(long)]
    pub min_quality: Option<f64>,

    /// Near-duplicate threshold (0.5-0.99)
    #[arg(long)]
    pub dedup_threshold: Option<f64>,

    /// Maximum cards per extracted item (1-5)
    #[arg(long)]
    pub max_cards: Option<usize>,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Create or update a profile
    Add {
        /// Profile name
        name: String,
        /// Chat completions base URL
        #[arg(short = 'u', long)]
        api_base: String,
        /// Model used for extraction
        #[arg(long)]
        extract_model: Option<String>,
        /// Model used for card generation
        #[arg(long)]
        card_model: Option<String>,
    },

    /// Switch to a different profile
    Use {
        /// Profile name
        name: String,
    },

    /// Delete a profile
    Remove {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
