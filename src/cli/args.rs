use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::common::config;
use crate::registry::Application;

/// csiclean — remove leftover SAP2000, ETABS and SAFE analysis files
#[derive(Parser, Debug)]
#[command(
    name = "csiclean",
    version,
    about = "Removes leftover analysis files next to SAP2000, ETABS and SAFE models",
    long_about = "csiclean searches a folder for model files (.sdb, .edb, .fdb) and finds the\n\
                   temporary and result files the applications leave beside them.\n\
                   Deletion is permanent: there is no undo.",
    after_help = "EXAMPLES:\n  \
        csiclean scan D:\\Projects                  Scan for all applications\n  \
        csiclean scan . --app etabs,safe           Only ETABS and SAFE models\n  \
        csiclean scan . --no-recursive             Only the folder itself\n  \
        csiclean clean . --dry-run                 Show what would be deleted\n  \
        csiclean clean . -y                        Delete without asking\n  \
        csiclean apps                              List supported applications"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use
    #[arg(long, global = true, env = "CSICLEAN_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (defaults to the config file setting)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode — minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// Which folder to scan and for which applications
#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    /// Folder to search for model files
    pub path: PathBuf,

    /// Applications to clean up after (sap2000, etabs, safe)
    #[arg(long = "app", short, value_delimiter = ',', value_name = "APP")]
    pub apps: Vec<Application>,

    /// Do not descend into subfolders
    #[arg(long)]
    pub no_recursive: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find leftover files without deleting anything
    Scan {
        #[command(flatten)]
        target: ScanArgs,
    },

    /// Find leftover files and delete them
    Clean {
        #[command(flatten)]
        target: ScanArgs,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Simulate — show what would be deleted
        #[arg(long)]
        dry_run: bool,
    },

    /// List supported applications and their file extensions
    Apps,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write the default configuration file
    Init,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

impl From<OutputFormat> for config::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => config::OutputFormat::Human,
            OutputFormat::Json => config::OutputFormat::Json,
            OutputFormat::Quiet => config::OutputFormat::Quiet,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
