//! Writing the PDF export to disk.

use crate::db::{EntryStore, SortOrder};
use crate::errors::{AppResult, ExportError};
use crate::export::{layout_document, render_pdf};
use chrono::FixedOffset;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub entries: usize,
    pub pages: usize,
    pub bytes: usize,
}

fn write_error(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Write {
        path: path.display().to_string(),
        source,
    }
}

/// Renders every stored entry in `order` and writes the PDF to `path`.
///
/// The document is written to a temporary file next to `path` and moved into
/// place once complete, so an interrupted export never leaves a truncated
/// file behind.
///
/// # Errors
///
/// Returns store errors, `ExportError::Pdf` if rendering fails and
/// `ExportError::Write` if the file cannot be written.
pub fn export_pdf(
    store: &dyn EntryStore,
    order: SortOrder,
    offset: FixedOffset,
    path: &Path,
) -> AppResult<ExportSummary> {
    let entries = store.query_all(order)?;
    let pages = layout_document(&entries, offset);
    let bytes = render_pdf(&pages)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
    temp.write_all(&bytes).map_err(|e| write_error(path, e))?;
    temp.flush().map_err(|e| write_error(path, e))?;
    temp.persist(path).map_err(|e| write_error(path, e.error))?;

    info!("Exported {} entries to {:?}", entries.len(), path);
    Ok(ExportSummary {
        path: path.to_path_buf(),
        entries: entries.len(),
        pages: pages.len(),
        bytes: bytes.len(),
    })
}
