//! Merging every visit to one location into a single account.

use super::reformat::{generate_inline, ReformatOutput};
use crate::ai::prompts::{merge_prompt, MERGE_INSTRUCTION};
use crate::ai::{GenerationRequest, TextGenerator};
use crate::db::EntryStore;
use crate::errors::{AppError, AppResult, DatabaseError};
use crate::export::visit_blocks;
use tracing::info;

/// Merges the notes of every entry whose location contains `location`.
///
/// Visits are presented to the model oldest first; visits sharing a
/// timestamp keep insertion order.
///
/// # Errors
///
/// Returns `AppError::Validation` for a blank location,
/// `DatabaseError::NotFound` when no entry matches, and propagates store
/// errors. Generation errors come back inline as [`ReformatOutput::Failed`].
pub fn merge_location(
    store: &dyn EntryStore,
    generator: &dyn TextGenerator,
    model: &str,
    location: &str,
) -> AppResult<ReformatOutput> {
    let location = location.trim();
    if location.is_empty() {
        return Err(AppError::Validation("location to merge is blank".to_string()));
    }

    // Newest first, with later inserts ahead on ties
    let mut entries = store.query_by_location(location)?;
    if entries.is_empty() {
        let message = format!("no entries for location \"{}\"", location);
        return Err(DatabaseError::NotFound(message).into());
    }
    entries.reverse();

    info!("Merging {} visit(s) to {:?}", entries.len(), location);
    let blocks = visit_blocks(&entries);
    let prompt = merge_prompt(location, &blocks);
    let request = GenerationRequest::new(model, MERGE_INSTRUCTION, prompt);
    Ok(generate_inline(generator, &request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::entry::test_support::sample_entry;
    use crate::ops::reformat::fakes::ScriptedGenerator;

    fn store() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        let mut late = sample_entry("Viveros", 40);
        late.context_answers[0] = "second visit".to_string();
        let mut early = sample_entry("viveros", 5);
        early.context_answers[0] = "first visit".to_string();
        db.insert(&late).unwrap();
        db.insert(&early).unwrap();
        db.insert(&sample_entry("Centro", 20)).unwrap();
        db
    }

    #[test]
    fn test_merge_sends_visits_oldest_first() {
        let db = store();
        let generator = ScriptedGenerator::replying("merged");

        let output = merge_location(&db, &generator, "m", " Viveros ").unwrap();
        assert_eq!(output, ReformatOutput::Generated("merged".to_string()));

        let requests = generator.requests.borrow();
        assert_eq!(requests.len(), 1);
        let prompt = &requests[0].prompt;
        assert!(prompt.contains("2 visit(s)"));
        let first = prompt.find("first visit").unwrap();
        let second = prompt.find("second visit").unwrap();
        assert!(first < second);
        assert!(!prompt.contains("Centro"));
    }

    #[test]
    fn test_unknown_location_is_not_found() {
        let db = store();
        let generator = ScriptedGenerator::replying("unused");

        let result = merge_location(&db, &generator, "m", "Moravia");
        assert!(matches!(result, Err(AppError::Database(DatabaseError::NotFound(_)))));
        assert!(generator.requests.borrow().is_empty());
    }

    #[test]
    fn test_blank_location_is_rejected() {
        let db = store();
        let generator = ScriptedGenerator::replying("unused");

        let result = merge_location(&db, &generator, "m", "   ");
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(generator.requests.borrow().is_empty());
    }

    #[test]
    fn test_equal_timestamps_follow_insertion_order() {
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        let mut first = sample_entry("Moravia", 10);
        first.context_answers[0] = "inserted first".to_string();
        let mut second = sample_entry("Moravia", 10);
        second.context_answers[0] = "inserted second".to_string();
        db.insert(&first).unwrap();
        db.insert(&second).unwrap();
        let generator = ScriptedGenerator::replying("merged");

        merge_location(&db, &generator, "m", "moravia").unwrap();

        let requests = generator.requests.borrow();
        let prompt = &requests[0].prompt;
        let first_at = prompt.find("inserted first").unwrap();
        let second_at = prompt.find("inserted second").unwrap();
        assert!(first_at < second_at);
    }

    #[test]
    fn test_generation_failure_is_inline() {
        let db = store();
        let generator = ScriptedGenerator::failing("slow down");

        let output = merge_location(&db, &generator, "m", "Viveros").unwrap();
        assert!(output.to_string().contains("slow down"));
    }
}
