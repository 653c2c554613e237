//! Read-back view of stored entries.
//!
//! Renders entries as plain text: a header with time and location, every
//! answer with its 1-based ordinal, and a line describing the photo. A photo
//! that fails to decode never aborts rendering; it is reported with a generic
//! message and the next entry follows.

use crate::constants::DISPLAY_TIMESTAMP_FORMAT;
use crate::entry::photo::{decode_photo, PhotoFormat};
use crate::entry::StoredEntry;
use crate::errors::AppResult;
use chrono::FixedOffset;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Message shown in place of a photo that cannot be decoded.
pub const PHOTO_DISPLAY_ERROR: &str = "Photo: could not be displayed";

/// Options for rendering history.
#[derive(Debug, Clone, Copy)]
pub struct HistoryOptions<'a> {
    /// Offset timestamps are shown in.
    pub offset: FixedOffset,
    /// When set, decoded photos are written here as `<entry-id>.<ext>`.
    pub photo_dir: Option<&'a Path>,
}

/// Writes every entry in the order given.
///
/// # Errors
///
/// Returns an error if writing to `out` fails or a decoded photo cannot be
/// saved to the photo directory.
pub fn render_history<W: Write>(
    out: &mut W,
    entries: &[StoredEntry],
    options: HistoryOptions<'_>,
) -> AppResult<()> {
    if entries.is_empty() {
        writeln!(out, "No entries recorded yet.")?;
        return Ok(());
    }

    for (i, stored) in entries.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        render_entry(out, stored, options)?;
    }
    Ok(())
}

/// Writes a single entry.
pub fn render_entry<W: Write>(
    out: &mut W,
    stored: &StoredEntry,
    options: HistoryOptions<'_>,
) -> AppResult<()> {
    let entry = &stored.entry;
    let when = entry
        .timestamp
        .with_timezone(&options.offset)
        .format(DISPLAY_TIMESTAMP_FORMAT);

    writeln!(out, "{} — {}", when, entry.display_location())?;
    writeln!(out, "  Entry {}", stored.id)?;
    if let Some(revises) = entry.revises {
        writeln!(out, "  Revises {}", revises)?;
    }

    for (section, answers) in entry.sections() {
        writeln!(out, "  {}", section.title())?;
        for (i, answer) in answers.iter().enumerate() {
            writeln!(out, "    {}. {}", i + 1, answer.trim_end())?;
        }
    }

    if let Some(encoded) = &entry.photo {
        match decode_photo(encoded) {
            Ok(bytes) => {
                let format = PhotoFormat::sniff(&bytes);
                writeln!(out, "  Photo: {} bytes ({})", bytes.len(), format)?;
                if let Some(dir) = options.photo_dir {
                    let path = dir.join(format!("{}.{}", stored.id, format.extension()));
                    fs::create_dir_all(dir)?;
                    fs::write(&path, &bytes)?;
                    debug!("Wrote photo for entry {} to {:?}", stored.id, path);
                    writeln!(out, "  Saved to {}", path.display())?;
                }
            }
            Err(e) => {
                warn!("Stored photo for entry {} is not valid base64: {}", stored.id, e);
                writeln!(out, "  {}", PHOTO_DISPLAY_ERROR)?;
            }
        }
    }

    Ok(())
}
