//! Plain-text export of the typed buffer.

use std::path::PathBuf;

use tracing::debug;

use crate::application::interaction_loop::{ExportError, TextExporter};

/// Writes the buffer verbatim as UTF-8, replacing any previous contents.
/// No header, no trailing newline beyond what was typed.
#[derive(Debug, Clone)]
pub struct FileTextExporter {
    path: PathBuf,
}

impl FileTextExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TextExporter for FileTextExporter {
    fn export(&self, text: &str) -> Result<(), ExportError> {
        std::fs::write(&self.path, text).map_err(|source| ExportError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), bytes = text.len(), "text exported");
        Ok(())
    }
}
