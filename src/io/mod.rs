//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - bundle export to JSON (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
