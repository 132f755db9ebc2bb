//! Value formatters and normalizers for column definitions.

use super::value_to_string;
use chrono::{DateTime, Local};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Lowercased, trimmed string form. Used as the style-map key for status
/// columns.
pub fn normalize_lower(value: &Value) -> String {
    value_to_string(value).trim().to_lowercase()
}

/// Epoch seconds to a local date string; null or zero means "never".
pub fn format_epoch_or_never(value: &Value) -> String {
    match epoch_seconds(value) {
        Some(secs) if secs > 0 => format_timestamp(secs).unwrap_or_else(|| value_to_string(value)),
        Some(_) => "never".to_string(),
        None if value.is_null() => "never".to_string(),
        None => value_to_string(value),
    }
}

/// Epoch seconds to a local date string; null or zero renders blank.
pub fn format_epoch(value: &Value) -> String {
    match epoch_seconds(value) {
        Some(secs) if secs > 0 => format_timestamp(secs).unwrap_or_else(|| value_to_string(value)),
        Some(_) => String::new(),
        None => value_to_string(value),
    }
}

/// Booleans as `Y`/`N`. Null stays blank.
pub fn format_bool_yn(value: &Value) -> String {
    let flag = match value {
        Value::Null => return String::new(),
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        Value::Array(_) | Value::Object(_) => return value_to_string(value),
    };
    let text = if flag { "Y" } else { "N" };
    text.to_string()
}

/// Megabytes with a unit, switching to GB at 1024 MB.
pub fn format_megabytes(value: &Value) -> String {
    let Some(mb) = value.as_f64() else {
        return value_to_string(value);
    };
    if mb >= 1024.0 {
        let gb = mb / 1024.0;
        if gb.fract() == 0.0 {
            format!("{} GB", gb as u64)
        } else {
            format!("{:.1} GB", gb)
        }
    } else {
        format!("{} MB", mb as u64)
    }
}

fn epoch_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn format_timestamp(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0)
        .map(|utc| utc.with_timezone(&Local).format(DATE_FORMAT).to_string())
}
