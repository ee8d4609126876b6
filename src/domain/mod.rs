//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the raw dataset row (`SalesRecord`)
//! - selector values (`ReportCategory`, the year range)
//! - the canonical calendar ordering (`Month`)

pub mod types;

pub use types::*;
