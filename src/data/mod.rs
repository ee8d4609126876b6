//! Dataset sources: a local CSV file or the published CSV over HTTP.

pub mod source;

pub use source::*;
