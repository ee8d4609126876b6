//! Terminal plotting helpers for the non-interactive report.

pub mod ascii;

pub use ascii::*;
