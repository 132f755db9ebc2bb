//! CLI presentation: column sets and text/json formatters per command family.

mod config;
mod snapshot;

use crate::cli::parse::OutputFormat;
use owo_colors::OwoColorize;

pub use config::{format_config_path, format_config_show};
pub use snapshot::{
    format_snapshot_created, format_snapshot_delete_cancelled, format_snapshot_deleted,
    format_snapshot_detail, format_snapshot_list, format_snapshot_tenants, format_snapshot_vms,
    SNAPSHOT_COLUMNS, SNAPSHOT_TENANT_COLUMNS, SNAPSHOT_VM_COLUMNS,
};

/// How results are printed for this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub color: bool,
}

impl OutputOptions {
    pub fn wide(&self) -> bool {
        self.format == OutputFormat::Wide
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            color: false,
        }
    }
}

/// Section heading; bold only when color is enabled.
pub fn format_section_heading(title: &str, color: bool) -> String {
    if color {
        format!("{}", title.bold())
    } else {
        title.to_string()
    }
}
