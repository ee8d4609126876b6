//! `auto-sales-dashboard` library crate.
//!
//! The binary (`autodash`) is a thin wrapper around this library so that:
//!
//! - the selection and aggregation logic is testable without a terminal
//! - the same session drives both the text report and the TUI
//! - the core stays independent of how views are finally drawn

pub mod app;
pub mod cli;
pub mod compose;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod selection;
pub mod store;
pub mod tui;
