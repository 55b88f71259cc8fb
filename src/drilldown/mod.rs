//! Generic drill-down rendering
//!
//! Any JSON payload is classified by shape and rendered accordingly:
//!
//! | Shape | View |
//! |-------|------|
//! | array | table (columns from explicit specs or the first element's keys) |
//! | object | key-value list |
//! | anything else | raw pretty-printed JSON |

pub mod panel;
pub mod value;
pub mod view;

pub use panel::{DrillDownPanel, ExportFormat};
pub use value::DrillValue;
pub use view::{
    build_view, default_format_cell, render_text, CellFormatter, ColumnSpec, DrillView, TableView,
    VALUE_COLUMN,
};
