//! Export a presentation bundle as JSON.
//!
//! The JSON mirrors `compose::PresentationBundle` so an external renderer can
//! draw the same panels the terminal shows.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::compose::PresentationBundle;
use crate::error::AppError;

/// Write the bundle to `path` as pretty-printed JSON.
pub fn write_bundle_json(path: &Path, bundle: &PresentationBundle) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, bundle)
        .map_err(|e| AppError::new(4, format!("Failed to write export JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to write export JSON: {e}")))?;

    info!(path = %path.display(), panels = bundle.panels().len(), "exported bundle");
    Ok(())
}
