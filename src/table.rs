//! Tabular output.
//!
//! Column sets are static `ColumnDef` slices; rows are flat JSON object maps
//! produced per remote object. Rendering is a pure function of
//! (columns, rows, wide): first into an inspectable [`RenderedTable`], then
//! into comfy-table text. Missing fields never fail; they render blank.

pub mod format;

use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{Attribute, Cell, Color, Table};
use serde_json::Value;
use std::io::IsTerminal;

/// One output row: field name to raw value.
pub type Row = serde_json::Map<String, Value>;

/// Raw value to canonical comparison key (used for style lookup).
pub type NormalizeFn = fn(&Value) -> String;

/// Raw value to display text.
pub type FormatFn = fn(&Value) -> String;

/// Display style for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Green,
    Yellow,
    Red,
    Cyan,
    Dim,
    Bold,
}

impl Style {
    fn apply(self, cell: Cell) -> Cell {
        match self {
            Style::Green => cell.fg(Color::Green),
            Style::Yellow => cell.fg(Color::Yellow),
            Style::Red => cell.fg(Color::Red),
            Style::Cyan => cell.fg(Color::Cyan),
            Style::Dim => cell.add_attribute(Attribute::Dim),
            Style::Bold => cell.add_attribute(Attribute::Bold),
        }
    }
}

/// Column definition. Built with `const fn`s so column sets can live in
/// `const` slices.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub field: &'static str,
    pub header: Option<&'static str>,
    /// Normalized value to style.
    pub style_map: Option<&'static [(&'static str, Style)]>,
    pub normalize: Option<NormalizeFn>,
    pub format: Option<FormatFn>,
    pub wide_only: bool,
}

impl ColumnDef {
    pub const fn new(field: &'static str) -> Self {
        Self {
            field,
            header: None,
            style_map: None,
            normalize: None,
            format: None,
            wide_only: false,
        }
    }

    pub const fn header(self, header: &'static str) -> Self {
        Self {
            header: Some(header),
            ..self
        }
    }

    pub const fn styles(self, style_map: &'static [(&'static str, Style)]) -> Self {
        Self {
            style_map: Some(style_map),
            ..self
        }
    }

    pub const fn normalize(self, normalize: NormalizeFn) -> Self {
        Self {
            normalize: Some(normalize),
            ..self
        }
    }

    pub const fn format(self, format: FormatFn) -> Self {
        Self {
            format: Some(format),
            ..self
        }
    }

    pub const fn wide_only(self) -> Self {
        Self {
            wide_only: true,
            ..self
        }
    }

    /// Header text: the override, or the field name case-adjusted.
    pub fn header_text(&self) -> String {
        match self.header {
            Some(header) => header.to_string(),
            None => header_from_field(self.field),
        }
    }

    /// Render one cell of `row` for this column.
    pub fn cell(&self, row: &Row) -> RenderedCell {
        let Some(raw) = row.get(self.field) else {
            return RenderedCell::blank();
        };

        let text = match self.format {
            Some(format) => format(raw),
            None => value_to_string(raw),
        };

        let style = self.style_map.and_then(|map| {
            let key = match self.normalize {
                Some(normalize) => normalize(raw),
                None => value_to_string(raw),
            };
            map.iter()
                .find(|(candidate, _)| *candidate == key)
                .map(|(_, style)| *style)
        });

        RenderedCell { text, style }
    }
}

/// `created_at` -> `Created At`, `$key` -> `Key`.
pub fn header_from_field(field: &str) -> String {
    field
        .trim_start_matches('$')
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Default string form of a raw value. Null is blank; strings are unquoted.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell {
    pub text: String,
    pub style: Option<Style>,
}

impl RenderedCell {
    pub fn blank() -> Self {
        Self {
            text: String::new(),
            style: None,
        }
    }

    fn to_cell(&self, color: bool) -> Cell {
        let cell = Cell::new(&self.text);
        match (self.style, color) {
            (Some(style), true) => style.apply(cell),
            _ => cell,
        }
    }
}

/// Table after column filtering and per-cell formatting, before layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RenderedCell>>,
}

impl RenderedTable {
    /// Column-aligned text. ANSI styling only when `color` is set.
    pub fn to_text(&self, color: bool) -> String {
        if self.headers.is_empty() {
            return String::new();
        }
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        if color {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        table.set_header(self.headers.clone());
        for row in &self.rows {
            table.add_row(row.iter().map(|c| c.to_cell(color)).collect::<Vec<_>>());
        }
        table.to_string()
    }

    /// Cell in row `index` under the column whose header text is `header`.
    pub fn cell(&self, index: usize, header: &str) -> Option<&RenderedCell> {
        let col = self.headers.iter().position(|h| h == header)?;
        self.rows.get(index)?.get(col)
    }
}

/// Columns retained for the requested width.
pub fn visible_columns(columns: &[ColumnDef], wide: bool) -> Vec<&ColumnDef> {
    columns.iter().filter(|c| wide || !c.wide_only).collect()
}

pub fn build(columns: &[ColumnDef], rows: &[Row], wide: bool) -> RenderedTable {
    let visible = visible_columns(columns, wide);
    RenderedTable {
        headers: visible.iter().map(|c| c.header_text()).collect(),
        rows: rows
            .iter()
            .map(|row| visible.iter().map(|c| c.cell(row)).collect())
            .collect(),
    }
}

/// Plain (unstyled) table text.
pub fn render(columns: &[ColumnDef], rows: &[Row], wide: bool) -> String {
    build(columns, rows, wide).to_text(false)
}

pub fn render_with_color(columns: &[ColumnDef], rows: &[Row], wide: bool, color: bool) -> String {
    build(columns, rows, wide).to_text(color)
}

/// Field/value view of a single row. Every column is shown, wide or not.
pub fn render_detail(columns: &[ColumnDef], row: &Row, color: bool) -> String {
    let rendered = RenderedTable {
        headers: vec!["Field".to_string(), "Value".to_string()],
        rows: columns
            .iter()
            .map(|c| {
                vec![
                    RenderedCell {
                        text: c.header_text(),
                        style: Some(Style::Bold),
                    },
                    c.cell(row),
                ]
            })
            .collect(),
    };
    rendered.to_text(color)
}

/// Machine-readable rows: every column's field with its raw value, `null`
/// when missing.
pub fn render_json(columns: &[ColumnDef], rows: &[Row]) -> Value {
    Value::Array(
        rows.iter()
            .map(|row| {
                let object: Row = columns
                    .iter()
                    .map(|c| {
                        (
                            c.field.to_string(),
                            row.get(c.field).cloned().unwrap_or(Value::Null),
                        )
                    })
                    .collect();
                Value::Object(object)
            })
            .collect(),
    )
}

/// Whether stdout output should carry ANSI styling. Respects `NO_COLOR`.
pub fn should_color(no_color_flag: bool) -> bool {
    if no_color_flag || std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}
