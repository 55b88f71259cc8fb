//! Drill-down panel: a titled view over one payload with export.

use std::fmt;

use serde_json::json;

use super::view::{build_view, render_text, ColumnSpec, DrillView};
use super::DrillValue;
use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

type CloseCallback = Box<dyn FnOnce() + Send>;

pub struct DrillDownPanel {
    title: String,
    value: DrillValue,
    columns: Option<Vec<ColumnSpec>>,
    on_close: Option<CloseCallback>,
}

impl DrillDownPanel {
    pub fn new(title: impl Into<String>, value: impl Into<DrillValue>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            columns: None,
            on_close: None,
        }
    }

    pub fn columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn on_close<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_close = Some(Box::new(callback));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn value(&self) -> &DrillValue {
        &self.value
    }

    pub fn view(&self) -> DrillView {
        build_view(&self.value, self.columns.as_deref())
    }

    /// Title line followed by the rendered view
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.title, render_text(&self.view()))
    }

    /// Runs the close callback. Later calls do nothing.
    pub fn close(&mut self) {
        if let Some(callback) = self.on_close.take() {
            callback();
        }
    }

    /// CSV covers tables and key-value lists; JSON covers every view.
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => serde_json::to_string_pretty(&json!({
                "title": self.title,
                "view": self.view(),
            }))
            .map_err(|e| DashboardError::Export(e.to_string())),
            ExportFormat::Csv => match self.view() {
                DrillView::Table(table) => {
                    write_csv(std::iter::once(table.columns).chain(table.rows))
                }
                DrillView::KeyValue(rows) => write_csv(
                    std::iter::once(vec!["key".to_string(), "value".to_string()])
                        .chain(rows.into_iter().map(|(k, v)| vec![k, v])),
                ),
                DrillView::Raw(_) => Err(DashboardError::Export(format!(
                    "'{}' is a {} and has no tabular form",
                    self.title,
                    self.value.kind()
                ))),
            },
        }
    }
}

fn write_csv(records: impl IntoIterator<Item = Vec<String>>) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for record in records {
        writer.write_record(&record).map_err(export_err)?;
    }
    let bytes = writer.into_inner().map_err(export_err)?;
    String::from_utf8(bytes).map_err(export_err)
}

fn export_err(e: impl fmt::Display) -> DashboardError {
    DashboardError::Export(e.to_string())
}

impl fmt::Debug for DrillDownPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrillDownPanel")
            .field("title", &self.title)
            .field("kind", &self.value.kind())
            .field("columns", &self.columns)
            .field("has_on_close", &self.on_close.is_some())
            .finish()
    }
}
