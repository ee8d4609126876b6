//! Reporting utilities: plain-text rendering of the dataset summary and of
//! composed dashboard bundles.

pub mod format;

pub use format::*;
