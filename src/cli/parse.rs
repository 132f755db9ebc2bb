//! CLI parse: clap types for vrg. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// vrg - VergeOS command-line client
#[derive(Parser, Debug)]
#[command(name = "vrg", version)]
#[command(about = "Command-line client for VergeOS infrastructure management")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Connection profile from the config file
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// VergeOS host (URL or hostname)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Username for basic authentication
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// API token (takes precedence over username/password)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table
    Table,
    /// Table including wide-only columns
    Wide,
    /// JSON document
    Json,
}

impl OutputFormat {
    pub fn parse_config(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage cloud snapshots
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommands,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SnapshotCommands {
    /// List cloud snapshots
    List {
        /// Include snapshots whose expiration has passed
        #[arg(long)]
        include_expired: bool,
    },
    /// Show cloud snapshot details
    Get {
        /// Snapshot name or key
        snapshot: String,
    },
    /// Create a cloud snapshot
    Create {
        /// Snapshot name (defaults to a server-generated name)
        #[arg(long)]
        name: Option<String>,
        /// Retention in seconds
        #[arg(long, value_name = "SECONDS", conflicts_with = "never_expire")]
        retention: Option<u64>,
        /// Keep the snapshot until deleted
        #[arg(long)]
        never_expire: bool,
        /// Lock the snapshot against modification and deletion
        #[arg(long)]
        immutable: bool,
        /// Hide the snapshot from tenants
        #[arg(long)]
        private: bool,
        /// Wait until the snapshot is complete
        #[arg(long)]
        wait: bool,
    },
    /// Delete a cloud snapshot
    Delete {
        /// Snapshot name or key
        snapshot: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// List VMs captured in a cloud snapshot
    Vms {
        /// Snapshot name or key
        snapshot: String,
    },
    /// List tenants captured in a cloud snapshot
    Tenants {
        /// Snapshot name or key
        snapshot: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration (secrets masked)
    Show,
    /// Print the global configuration file path
    Path,
}
