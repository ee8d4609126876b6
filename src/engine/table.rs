//! Derived view types: a titled, chart-ready table.
//!
//! A `DerivedView` never tells a renderer how to draw; `ChartKind` only names
//! the semantic shape and `ChartEncoding` names which table columns feed which
//! chart channel.

use serde::Serialize;

use crate::domain::Month;

pub const COL_YEAR: &str = "year";
pub const COL_MONTH: &str = "month";
pub const COL_VEHICLE_TYPE: &str = "vehicle_type";
pub const COL_SALES: &str = "automobile_sales";
pub const COL_ADVERTISING: &str = "advertising_expenditure";
pub const COL_UNEMPLOYMENT: &str = "unemployment_rate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    GroupedBar,
    Pie,
    BubbleScatter,
}

impl ChartKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::GroupedBar => "grouped bar",
            ChartKind::Pie => "pie",
            ChartKind::BubbleScatter => "bubble scatter",
        }
    }
}

/// Column-to-channel mapping.
///
/// For pie views `x` names the slice labels and `y` the slice values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartEncoding {
    pub x: &'static str,
    pub y: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'static str>,
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Year(i32),
    Month(Month),
    Label(String),
    Number(f64),
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Year(y) => Some(f64::from(*y)),
            _ => None,
        }
    }

    /// Short text form used for axis labels and text tables.
    pub fn label(&self) -> String {
        match self {
            Cell::Year(y) => y.to_string(),
            Cell::Month(m) => m.short_name().to_string(),
            Cell::Label(s) => s.clone(),
            Cell::Number(v) => format!("{v:.2}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl ViewTable {
    pub fn new(columns: Vec<&'static str>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == name)
    }

    /// Cells of one column, in row order.
    pub fn column(&self, name: &str) -> Vec<&Cell> {
        let Some(idx) = self.column_index(name) else {
            return Vec::new();
        };
        self.rows.iter().filter_map(|row| row.get(idx)).collect()
    }

    /// Numeric values of one column; non-numeric cells are skipped.
    pub fn numbers(&self, name: &str) -> Vec<f64> {
        self.column(name).into_iter().filter_map(Cell::as_number).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One aggregation result for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    pub title: String,
    pub kind: ChartKind,
    pub encoding: ChartEncoding,
    pub table: ViewTable,
}
