//! Submitting the journal form.

use crate::db::EntryStore;
use crate::entry::{EntryId, FormState};
use crate::errors::AppResult;
use chrono::{DateTime, FixedOffset, Utc};
use tracing::info;

/// Current time in the configured civil offset.
pub fn current_time(offset: FixedOffset) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset)
}

/// Builds an entry from the form, stores it and resets the form.
///
/// The form is only reset once the store has acknowledged the write, so a
/// failed submit leaves the user's input in place.
///
/// # Errors
///
/// Returns `AppError::Validation` for a blank form and propagates store
/// errors unchanged.
pub fn submit_form(
    store: &dyn EntryStore,
    form: &mut FormState,
    now: DateTime<FixedOffset>,
) -> AppResult<EntryId> {
    let entry = form.build(now)?;
    let id = store.insert(&entry)?;
    info!(entry_id = %id, has_photo = entry.photo.is_some(), "Entry saved");
    form.reset();
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, SortOrder};
    use crate::entry::Section;
    use crate::errors::AppError;

    fn store() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        db
    }

    #[test]
    fn test_submit_stores_and_resets() {
        let db = store();
        let mut form = FormState::new();
        form.location = " Viveros ".to_string();
        form.set_answers(Section::Intervention, vec!["i1"]).unwrap();

        let now = current_time(FixedOffset::west_opt(18000).unwrap());
        let id = submit_form(&db, &mut form, now).unwrap();

        assert_eq!(form, FormState::default());
        let stored = db.get(id).unwrap().unwrap();
        assert_eq!(stored.entry.location, "Viveros");
        assert_eq!(stored.entry.timestamp.offset().local_minus_utc(), -18000);
    }

    #[test]
    fn test_blank_submit_stores_nothing_and_keeps_form() {
        let db = store();
        let mut form = FormState::new();
        form.photo = Some(vec![1, 2, 3]);

        let result = submit_form(&db, &mut form, current_time(FixedOffset::east_opt(0).unwrap()));
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(form.photo, Some(vec![1, 2, 3]));
        assert!(db.query_all(SortOrder::Ascending).unwrap().is_empty());
    }
}
