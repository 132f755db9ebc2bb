//! CLI domain: parse, route, help, output, prompt, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod prompt;
mod route;

pub use help::command_name;
pub use output::{exit_code, map_error};
pub use parse::{Cli, Commands, ConfigCommands, OutputFormat, SnapshotCommands};
pub use presentation::{
    format_config_path, format_config_show, format_section_heading, format_snapshot_created,
    format_snapshot_delete_cancelled, format_snapshot_deleted, format_snapshot_detail,
    format_snapshot_list, format_snapshot_tenants, format_snapshot_vms, OutputOptions,
    SNAPSHOT_COLUMNS, SNAPSHOT_TENANT_COLUMNS, SNAPSHOT_VM_COLUMNS,
};
pub use prompt::{DialoguerPrompter, Prompter};
pub use route::RunContext;
