//! CLI command-name contract for logging and routing.

use crate::cli::parse::{Commands, ConfigCommands, SnapshotCommands};

/// Command name string for logs (e.g. "snapshot.list", "config.show").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Snapshot { command } => format!("snapshot.{}", snapshot_command_name(command)),
        Commands::Config { command } => format!("config.{}", config_command_name(command)),
    }
}

pub fn snapshot_command_name(command: &SnapshotCommands) -> &'static str {
    match command {
        SnapshotCommands::List { .. } => "list",
        SnapshotCommands::Get { .. } => "get",
        SnapshotCommands::Create { .. } => "create",
        SnapshotCommands::Delete { .. } => "delete",
        SnapshotCommands::Vms { .. } => "vms",
        SnapshotCommands::Tenants { .. } => "tenants",
    }
}

pub fn config_command_name(command: &ConfigCommands) -> &'static str {
    match command {
        ConfigCommands::Show => "show",
        ConfigCommands::Path => "path",
    }
}
