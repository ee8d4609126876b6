//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - held in memory by the record store for the whole session
//! - embedded in derived view tables
//! - exported to JSON for an external renderer

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// First year offered by the year selector.
pub const YEAR_MIN: i32 = 1980;
/// Last year offered by the year selector.
pub const YEAR_MAX: i32 = 2023;

/// Years the year selector offers, ascending.
pub fn year_options() -> impl DoubleEndedIterator<Item = i32> + Clone {
    YEAR_MIN..=YEAR_MAX
}

/// Calendar month.
///
/// The derived `Ord` follows declaration order, which is the canonical
/// calendar order (January first). Every month-keyed view sorts by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Zero-based position in the calendar (Jan = 0).
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Look up a month by its zero-based calendar position.
    pub fn from_ordinal(idx: usize) -> Option<Month> {
        Month::ALL.get(idx).copied()
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Month {
    type Err = String;

    /// Accepts "Jan" / "January" in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .trim()
            .parse::<chrono::Month>()
            .map_err(|_| format!("unknown month '{s}'"))?;
        let idx = parsed.number_from_month() as usize - 1;
        Month::from_ordinal(idx).ok_or_else(|| format!("unknown month '{s}'"))
    }
}

/// Report category offered by the first selector.
///
/// "No category chosen" is modelled as `Option<ReportCategory>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    YearlyStatistics,
    RecessionStatistics,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 2] = [ReportCategory::YearlyStatistics, ReportCategory::RecessionStatistics];

    /// Human-readable label for selectors and headings.
    pub fn display_name(self) -> &'static str {
        match self {
            ReportCategory::YearlyStatistics => "Yearly Statistics",
            ReportCategory::RecessionStatistics => "Recession Period Statistics",
        }
    }

    /// Whether this category makes the year selector meaningful.
    pub fn uses_year(self) -> bool {
        matches!(self, ReportCategory::YearlyStatistics)
    }
}

/// One row of the historical sales dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub year: i32,
    pub month: Month,
    /// Opaque category key (e.g. "Supperminicar", "SUV").
    pub vehicle_type: String,
    /// Units sold.
    pub automobile_sales: f64,
    pub advertising_expenditure: f64,
    /// Percentage.
    pub unemployment_rate: f64,
    pub is_recession: bool,
}
