//! Amending stored entries.
//!
//! Stored entries are never rewritten. An amendment is stored as a new entry
//! that links back to the one it revises, so earlier versions stay in history.

use crate::db::EntryStore;
use crate::entry::{EntryId, FormState, Section};
use crate::errors::{AppError, AppResult, DatabaseError};
use chrono::{DateTime, FixedOffset};
use std::str::FromStr;
use tracing::info;

/// A single answer replacement, written `section.N=text` with a 1-based `N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerEdit {
    pub section: Section,
    /// 0-based slot
    pub index: usize,
    pub text: String,
}

fn parse_section(raw: &str) -> Option<Section> {
    Section::ALL
        .into_iter()
        .find(|section| section.title().eq_ignore_ascii_case(raw.trim()))
}

impl FromStr for AnswerEdit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::Validation(format!("expected SECTION.N=TEXT, got \"{}\"", s));

        let (target, text) = s.split_once('=').ok_or_else(invalid)?;
        let (section, ordinal) = target.split_once('.').ok_or_else(invalid)?;
        let section = parse_section(section).ok_or_else(|| {
            AppError::Validation(format!(
                "unknown section \"{}\" (expected context, research or intervention)",
                section.trim()
            ))
        })?;
        let ordinal: usize = ordinal.trim().parse().map_err(|_| invalid())?;
        if ordinal == 0 || ordinal > section.len() {
            return Err(AppError::Validation(format!(
                "{} answers are numbered 1 to {}, got {}",
                section,
                section.len(),
                ordinal
            )));
        }

        Ok(AnswerEdit {
            section,
            index: ordinal - 1,
            text: text.to_string(),
        })
    }
}

/// Stores a revised copy of entry `id` with `edits` applied.
///
/// The new entry carries the original photo, is stamped with `now` and
/// records `id` in its `revises` field.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` for an unknown id and
/// `AppError::Validation` if the revised entry would be blank.
pub fn amend_entry(
    store: &dyn EntryStore,
    id: EntryId,
    edits: &[AnswerEdit],
    location: Option<&str>,
    now: DateTime<FixedOffset>,
) -> AppResult<EntryId> {
    let original = store
        .get(id)?
        .ok_or_else(|| DatabaseError::NotFound(format!("entry {}", id)))?;

    let mut form = FormState::from_entry(&original.entry);
    if let Some(location) = location {
        form.location = location.to_string();
    }
    for edit in edits {
        form.set_answer(edit.section, edit.index, edit.text.clone())?;
    }

    let mut entry = form.build(now)?;
    entry.photo = original.entry.photo.clone();
    entry.revises = Some(id);

    let new_id = store.insert(&entry)?;
    info!(entry_id = %new_id, revises = %id, edits = edits.len(), "Entry amended");
    Ok(new_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, SortOrder};
    use crate::entry::test_support::sample_entry;

    fn now() -> DateTime<FixedOffset> {
        use chrono::TimeZone;
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 15, 8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_edit() {
        let edit: AnswerEdit = "Research.3=new text = with equals".parse().unwrap();
        assert_eq!(edit.section, Section::Research);
        assert_eq!(edit.index, 2);
        assert_eq!(edit.text, "new text = with equals");
    }

    #[test]
    fn test_parse_edit_rejects_bad_input() {
        assert!("context=missing ordinal".parse::<AnswerEdit>().is_err());
        assert!("context.0=zero".parse::<AnswerEdit>().is_err());
        assert!("research.4=too far".parse::<AnswerEdit>().is_err());
        assert!("weather.1=unknown".parse::<AnswerEdit>().is_err());
        assert!("context.1".parse::<AnswerEdit>().is_err());
    }

    #[test]
    fn test_amend_inserts_linked_revision() {
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        let mut original = sample_entry("Viveros", 0);
        original.photo = Some("/9j/AAA=".to_string());
        let id = db.insert(&original).unwrap();

        let edits = vec!["context.2=revised".parse().unwrap()];
        let new_id = amend_entry(&db, id, &edits, Some(" Viveros Norte "), now()).unwrap();
        assert_ne!(new_id, id);

        let all = db.query_all(SortOrder::Ascending).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].entry, original);

        let revised = &all[1].entry;
        assert_eq!(revised.revises, Some(id));
        assert_eq!(revised.location, "Viveros Norte");
        assert_eq!(revised.context_answers[1], "revised");
        assert_eq!(revised.context_answers[0], "context 1");
        assert_eq!(revised.photo, original.photo);
        assert_eq!(revised.timestamp, now());
    }

    #[test]
    fn test_amend_unknown_entry() {
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        let result = amend_entry(&db, EntryId::new(), &[], None, now());
        assert!(matches!(result, Err(AppError::Database(DatabaseError::NotFound(_)))));
    }
}
