//! Entry insert and query operations.
//!
//! Entries are append-only. There is deliberately no update or delete here;
//! amending an entry goes through `insert_entry` with a `revises` link.

use super::SortOrder;
use crate::entry::{EntryId, JournalEntry, StoredEntry};
use crate::errors::{AppResult, DatabaseError};
use chrono::DateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

const SELECT_COLUMNS: &str = r#"
    SELECT id, recorded_at, location, context_answers, research_answers,
           intervention_answers, photo, revises
    FROM entries
"#;

/// Column values of one row, before they are checked and decoded.
struct RawRow {
    id: String,
    recorded_at: String,
    location: String,
    context_answers: String,
    research_answers: String,
    intervention_answers: String,
    photo: Option<String>,
    revises: Option<String>,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawRow {
            id: row.get(0)?,
            recorded_at: row.get(1)?,
            location: row.get(2)?,
            context_answers: row.get(3)?,
            research_answers: row.get(4)?,
            intervention_answers: row.get(5)?,
            photo: row.get(6)?,
            revises: row.get(7)?,
        })
    }

    fn corrupt(&self, message: impl Into<String>) -> DatabaseError {
        DatabaseError::CorruptRecord {
            id: self.id.clone(),
            message: message.into(),
        }
    }

    fn answers<const N: usize>(
        &self,
        raw: &str,
        section: &str,
    ) -> Result<[String; N], DatabaseError> {
        let values: Vec<String> = serde_json::from_str(raw).map_err(|e| {
            self.corrupt(format!("{} answers are not a JSON string array: {}", section, e))
        })?;
        <[String; N]>::try_from(values).map_err(|values| {
            self.corrupt(format!(
                "expected {} {} answers, found {}",
                N,
                section,
                values.len()
            ))
        })
    }

    fn into_stored(self) -> Result<StoredEntry, DatabaseError> {
        let id = self
            .id
            .parse::<EntryId>()
            .map_err(|e| self.corrupt(format!("invalid id: {}", e)))?;
        let timestamp = DateTime::parse_from_rfc3339(&self.recorded_at)
            .map_err(|e| self.corrupt(format!("invalid timestamp: {}", e)))?;
        let revises = match &self.revises {
            Some(raw) => Some(
                raw.parse::<EntryId>()
                    .map_err(|e| self.corrupt(format!("invalid revises link: {}", e)))?,
            ),
            None => None,
        };

        let entry = JournalEntry {
            timestamp,
            location: self.location.clone(),
            context_answers: self.answers(&self.context_answers, "context")?,
            research_answers: self.answers(&self.research_answers, "research")?,
            intervention_answers: self.answers(&self.intervention_answers, "intervention")?,
            photo: self.photo.clone(),
            revises,
        };

        Ok(StoredEntry { id, entry })
    }
}

fn to_json(answers: &[String]) -> Result<String, DatabaseError> {
    serde_json::to_string(answers).map_err(|e| DatabaseError::CorruptRecord {
        id: "(new)".to_string(),
        message: format!("failed to serialize answers: {}", e),
    })
}

fn collect_rows(conn: &Connection, sql: &str) -> AppResult<Vec<StoredEntry>> {
    let mut stmt = conn.prepare(sql).map_err(DatabaseError::Sqlite)?;
    let raw_rows = stmt
        .query_map([], RawRow::from_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    let entries = raw_rows
        .into_iter()
        .map(RawRow::into_stored)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

/// Inserts a new entry and returns its identifier.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_entry(conn: &Connection, entry: &JournalEntry) -> AppResult<EntryId> {
    let id = EntryId::new();
    debug!("Inserting entry {} at {}", id, entry.timestamp);

    conn.execute(
        r#"
        INSERT INTO entries (
            id, recorded_at, recorded_at_ms, location,
            context_answers, research_answers, intervention_answers,
            photo, revises
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            id.to_string(),
            entry.timestamp.to_rfc3339(),
            entry.timestamp.timestamp_millis(),
            entry.location,
            to_json(&entry.context_answers)?,
            to_json(&entry.research_answers)?,
            to_json(&entry.intervention_answers)?,
            entry.photo,
            entry.revises.map(|r| r.to_string()),
        ],
    )
    .map_err(DatabaseError::Sqlite)?;

    debug!("Entry {} inserted", id);
    Ok(id)
}

/// Lists every entry ordered by timestamp, ties broken by insertion order.
pub fn list_entries(conn: &Connection, order: SortOrder) -> AppResult<Vec<StoredEntry>> {
    debug!("Listing entries ({:?})", order);
    let order_clause = match order {
        SortOrder::Ascending => "ORDER BY recorded_at_ms ASC, seq ASC",
        SortOrder::Descending => "ORDER BY recorded_at_ms DESC, seq DESC",
    };
    collect_rows(conn, &format!("{} {}", SELECT_COLUMNS, order_clause))
}

/// Finds entries whose location contains `needle`, ignoring case, newest first.
///
/// Matching uses Unicode lowercase on both sides, which SQLite's own
/// `LIKE`/`lower()` only do for ASCII, so the filter runs here.
pub fn find_by_location(conn: &Connection, needle: &str) -> AppResult<Vec<StoredEntry>> {
    let needle = needle.to_lowercase();
    debug!("Finding entries with location containing {:?}", needle);

    let matches: Vec<StoredEntry> = list_entries(conn, SortOrder::Descending)?
        .into_iter()
        .filter(|stored| stored.entry.location.to_lowercase().contains(&needle))
        .collect();

    debug!("{} entries matched", matches.len());
    Ok(matches)
}

/// Retrieves an entry by identifier.
///
/// Returns `Ok(None)` if no entry has that identifier.
pub fn get_entry(conn: &Connection, id: EntryId) -> AppResult<Option<StoredEntry>> {
    debug!("Getting entry {}", id);

    let raw = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            params![id.to_string()],
            RawRow::from_row,
        )
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    match raw {
        Some(raw) => Ok(Some(raw.into_stored()?)),
        None => Ok(None),
    }
}
