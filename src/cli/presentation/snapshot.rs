//! Snapshot column sets and formatters.

use super::{format_section_heading, OutputOptions};
use crate::snapshot::{Snapshot, SnapshotTenant, SnapshotVm};
use crate::table::format::{
    format_bool_yn, format_epoch, format_epoch_or_never, format_megabytes, normalize_lower,
};
use crate::table::{self, ColumnDef, Row, Style};
use serde_json::Value;

const SNAPSHOT_STATUS_STYLES: &[(&str, Style)] = &[
    ("normal", Style::Green),
    ("ready", Style::Green),
    ("creating", Style::Yellow),
    ("pending", Style::Yellow),
    ("initializing", Style::Yellow),
    ("syncing", Style::Yellow),
    ("expired", Style::Dim),
    ("error", Style::Red),
    ("failed", Style::Red),
];

const IMMUTABLE_STYLES: &[(&str, Style)] = &[("Y", Style::Cyan)];

const VM_STATUS_STYLES: &[(&str, Style)] = &[
    ("running", Style::Green),
    ("stopped", Style::Dim),
    ("error", Style::Red),
];

const TENANT_STATUS_STYLES: &[(&str, Style)] = &[
    ("online", Style::Green),
    ("running", Style::Green),
    ("offline", Style::Dim),
    ("stopped", Style::Dim),
    ("error", Style::Red),
];

pub const SNAPSHOT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("key"),
    ColumnDef::new("name"),
    ColumnDef::new("status")
        .normalize(normalize_lower)
        .styles(SNAPSHOT_STATUS_STYLES),
    ColumnDef::new("created").format(format_epoch),
    ColumnDef::new("expires").format(format_epoch_or_never),
    ColumnDef::new("immutable")
        .format(format_bool_yn)
        .normalize(format_bool_yn)
        .styles(IMMUTABLE_STYLES),
    ColumnDef::new("immutable_status").wide_only(),
    ColumnDef::new("private").format(format_bool_yn).wide_only(),
    ColumnDef::new("snapshot_profile").header("Profile").wide_only(),
    ColumnDef::new("created_manually")
        .header("Manual")
        .format(format_bool_yn)
        .wide_only(),
    ColumnDef::new("description").wide_only(),
];

pub const SNAPSHOT_VM_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("key"),
    ColumnDef::new("name"),
    ColumnDef::new("status")
        .normalize(normalize_lower)
        .styles(VM_STATUS_STYLES),
    ColumnDef::new("cpu_cores").header("CPU"),
    ColumnDef::new("ram").header("RAM").format(format_megabytes),
    ColumnDef::new("os_family").header("OS").wide_only(),
    ColumnDef::new("description").wide_only(),
];

pub const SNAPSHOT_TENANT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("key"),
    ColumnDef::new("name"),
    ColumnDef::new("status")
        .normalize(normalize_lower)
        .styles(TENANT_STATUS_STYLES),
    ColumnDef::new("description").wide_only(),
];

fn json_text(value: &Value) -> String {
    format!("{:#}", value)
}

fn json_object(columns: &[ColumnDef], row: &Row) -> Value {
    match table::render_json(columns, std::slice::from_ref(row)) {
        Value::Array(mut items) if !items.is_empty() => items.remove(0),
        _ => Value::Null,
    }
}

fn table_text(columns: &[ColumnDef], rows: &[Row], options: &OutputOptions) -> String {
    table::render_with_color(columns, rows, options.wide(), options.color)
}

pub fn format_snapshot_list(snapshots: &[Snapshot], options: &OutputOptions) -> String {
    let rows: Vec<Row> = snapshots.iter().map(Snapshot::to_row).collect();
    if options.is_json() {
        return json_text(&table::render_json(SNAPSHOT_COLUMNS, &rows));
    }
    if rows.is_empty() {
        return "No snapshots found.".to_string();
    }
    table_text(SNAPSHOT_COLUMNS, &rows, options)
}

pub fn format_snapshot_detail(snapshot: &Snapshot, options: &OutputOptions) -> String {
    let row = snapshot.to_row();
    if options.is_json() {
        return json_text(&json_object(SNAPSHOT_COLUMNS, &row));
    }
    let heading = format_section_heading(
        &format!("Cloud snapshot {} (key {})", snapshot.name, snapshot.key),
        options.color,
    );
    format!(
        "{}\n{}",
        heading,
        table::render_detail(SNAPSHOT_COLUMNS, &row, options.color)
    )
}

pub fn format_snapshot_created(snapshot: &Snapshot, options: &OutputOptions) -> String {
    if options.is_json() {
        return format_snapshot_detail(snapshot, options);
    }
    format!(
        "Created cloud snapshot '{}' (key {})\n{}",
        snapshot.name,
        snapshot.key,
        table::render_detail(SNAPSHOT_COLUMNS, &snapshot.to_row(), options.color)
    )
}

pub fn format_snapshot_deleted(snapshot: &Snapshot, options: &OutputOptions) -> String {
    if options.is_json() {
        return json_text(&serde_json::json!({
            "deleted": true,
            "key": snapshot.key,
            "name": snapshot.name,
        }));
    }
    format!(
        "Deleted cloud snapshot '{}' (key {})",
        snapshot.name, snapshot.key
    )
}

/// Declined confirmation; mirrors [`format_snapshot_deleted`] in JSON mode.
pub fn format_snapshot_delete_cancelled(snapshot: &Snapshot, options: &OutputOptions) -> String {
    if options.is_json() {
        return json_text(&serde_json::json!({
            "deleted": false,
            "key": snapshot.key,
            "name": snapshot.name,
        }));
    }
    "Deletion cancelled".to_string()
}

pub fn format_snapshot_vms(
    snapshot: &Snapshot,
    vms: &[SnapshotVm],
    options: &OutputOptions,
) -> String {
    let rows: Vec<Row> = vms.iter().map(SnapshotVm::to_row).collect();
    if options.is_json() {
        return json_text(&table::render_json(SNAPSHOT_VM_COLUMNS, &rows));
    }
    if rows.is_empty() {
        return format!("No VMs found in snapshot '{}'.", snapshot.name);
    }
    let heading = format_section_heading(
        &format!("VMs in snapshot {} (key {})", snapshot.name, snapshot.key),
        options.color,
    );
    format!(
        "{}\n{}",
        heading,
        table_text(SNAPSHOT_VM_COLUMNS, &rows, options)
    )
}

pub fn format_snapshot_tenants(
    snapshot: &Snapshot,
    tenants: &[SnapshotTenant],
    options: &OutputOptions,
) -> String {
    let rows: Vec<Row> = tenants.iter().map(SnapshotTenant::to_row).collect();
    if options.is_json() {
        return json_text(&table::render_json(SNAPSHOT_TENANT_COLUMNS, &rows));
    }
    if rows.is_empty() {
        return format!("No tenants found in snapshot '{}'.", snapshot.name);
    }
    let heading = format_section_heading(
        &format!("Tenants in snapshot {} (key {})", snapshot.name, snapshot.key),
        options.color,
    );
    format!(
        "{}\n{}",
        heading,
        table_text(SNAPSHOT_TENANT_COLUMNS, &rows, options)
    )
}
