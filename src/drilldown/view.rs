//! View construction and plain-text rendering for drill-down payloads.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::DrillValue;

/// Column used when sequence items are not records
pub const VALUE_COLUMN: &str = "value";

pub type CellFormatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Explicit column for table rendering
#[derive(Clone)]
pub struct ColumnSpec {
    /// Field looked up in each row
    pub key: String,
    pub header: String,
    /// Falls back to [`default_format_cell`]
    pub formatter: Option<CellFormatter>,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            header: key.clone(),
            key,
            formatter: None,
        }
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    fn format(&self, value: &Value) -> String {
        match &self.formatter {
            Some(f) => f(value),
            None => default_format_cell(value),
        }
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

/// Primitives pass through (strings unquoted, null empty); nested
/// structures become compact JSON.
pub fn default_format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum DrillView {
    Table(TableView),
    KeyValue(Vec<(String, String)>),
    Raw(String),
}

/// Decide the rendering for a classified payload.
///
/// Without explicit columns, a table takes its columns from the first
/// element's keys.
pub fn build_view(value: &DrillValue, columns: Option<&[ColumnSpec]>) -> DrillView {
    match value {
        DrillValue::Sequence(items) => {
            let derived;
            let columns = match columns {
                Some(explicit) => explicit,
                None => {
                    derived = derive_columns(items);
                    &derived[..]
                }
            };
            DrillView::Table(TableView {
                columns: columns.iter().map(|c| c.header.clone()).collect(),
                rows: items
                    .iter()
                    .map(|item| columns.iter().map(|c| c.format(cell(item, &c.key))).collect())
                    .collect(),
            })
        }
        DrillValue::Record(map) => DrillView::KeyValue(
            map.iter()
                .map(|(k, v)| (k.clone(), default_format_cell(v)))
                .collect(),
        ),
        DrillValue::Scalar(v) => {
            DrillView::Raw(serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()))
        }
    }
}

fn derive_columns(items: &[Value]) -> Vec<ColumnSpec> {
    match items.first() {
        Some(Value::Object(first)) => first.keys().map(ColumnSpec::new).collect(),
        Some(_) => vec![ColumnSpec::new(VALUE_COLUMN)],
        None => Vec::new(),
    }
}

fn cell<'a>(item: &'a Value, key: &str) -> &'a Value {
    match item {
        Value::Object(map) => map.get(key).unwrap_or(&Value::Null),
        other if key == VALUE_COLUMN => other,
        _ => &Value::Null,
    }
}

/// Aligned plain-text rendering
pub fn render_text(view: &DrillView) -> String {
    match view {
        DrillView::Table(table) => render_table(table),
        DrillView::KeyValue(rows) => {
            let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
            rows.iter()
                .map(|(k, v)| format!("{}  {}", pad(k, width), v))
                .collect::<Vec<_>>()
                .join("\n")
        }
        DrillView::Raw(text) => text.clone(),
    }
}

fn render_table(table: &TableView) -> String {
    if table.rows.is_empty() {
        return "(no rows)".to_string();
    }

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &table.rows {
        for (i, value) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(value.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(&table.columns)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.extend(table.rows.iter().map(|row| line(row)));
    out.join("\n")
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}
