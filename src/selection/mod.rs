//! Selector state: report category plus an optional year.
//!
//! The year selector is only enabled for `YearlyStatistics`. Aggregation never
//! reads the raw stored year; it only receives a [`ReadySelection`], which can
//! carry a year solely on the yearly branch.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ReportCategory;

/// Events the UI shell sends when a selector changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Category(Option<ReportCategory>),
    Year(Option<i32>),
}

/// Availability of the year widget, derived from the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearSelector {
    pub enabled: bool,
}

/// Observable state of the selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    CategorySelected(ReportCategory),
    FullySpecified(ReportCategory, i32),
}

/// A selection complete enough to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ReadySelection {
    Recession,
    Yearly { year: i32 },
}

impl ReadySelection {
    pub fn category(self) -> ReportCategory {
        match self {
            ReadySelection::Recession => ReportCategory::RecessionStatistics,
            ReadySelection::Yearly { .. } => ReportCategory::YearlyStatistics,
        }
    }
}

/// Long-lived selector state machine; one per session.
#[derive(Debug, Clone, Default)]
pub struct SelectionStateMachine {
    category: Option<ReportCategory>,
    year: Option<i32>,
}

impl SelectionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self) -> Option<ReportCategory> {
        self.category
    }

    /// The year as it is meaningful to aggregation: `None` unless the
    /// category is `YearlyStatistics`, even if a stale value is stored.
    pub fn effective_year(&self) -> Option<i32> {
        match self.category {
            Some(ReportCategory::YearlyStatistics) => self.year,
            _ => None,
        }
    }

    /// The raw stored year, which may be stale.
    pub fn stored_year(&self) -> Option<i32> {
        self.year
    }

    pub fn year_selector(&self) -> YearSelector {
        YearSelector {
            enabled: self.category.is_some_and(ReportCategory::uses_year),
        }
    }

    pub fn state(&self) -> SelectionState {
        match (self.category, self.effective_year()) {
            (None, _) => SelectionState::Empty,
            (Some(category), Some(year)) => SelectionState::FullySpecified(category, year),
            (Some(category), None) => SelectionState::CategorySelected(category),
        }
    }

    pub fn set_category(&mut self, category: Option<ReportCategory>) -> YearSelector {
        if category == Some(ReportCategory::RecessionStatistics) {
            self.year = None;
        }
        self.category = category;
        debug!(category = ?category, state = ?self.state(), "category changed");
        self.year_selector()
    }

    /// Store the chosen year. While the selector is disabled the value is kept
    /// but has no effect on aggregation.
    pub fn set_year(&mut self, year: Option<i32>) -> YearSelector {
        self.year = year;
        debug!(year = ?year, state = ?self.state(), "year changed");
        self.year_selector()
    }

    pub fn handle(&mut self, event: SelectionEvent) -> YearSelector {
        match event {
            SelectionEvent::Category(category) => self.set_category(category),
            SelectionEvent::Year(year) => self.set_year(year),
        }
    }

    /// `Some` iff the selection is ready for aggregation.
    pub fn ready(&self) -> Option<ReadySelection> {
        match self.state() {
            SelectionState::CategorySelected(ReportCategory::RecessionStatistics)
            | SelectionState::FullySpecified(ReportCategory::RecessionStatistics, _) => {
                Some(ReadySelection::Recession)
            }
            SelectionState::FullySpecified(ReportCategory::YearlyStatistics, year) => {
                Some(ReadySelection::Yearly { year })
            }
            SelectionState::Empty | SelectionState::CategorySelected(ReportCategory::YearlyStatistics) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready().is_some()
    }
}
