//! Model-assisted reformatting of stored entries.
//!
//! Generation failures never escape these functions as errors. They are
//! turned into [`ReformatOutput::Failed`] so one unreachable service or bad
//! key shows up next to the entry it affected. Store failures still propagate.

use crate::ai::prompts::{reformat_prompt, REFORMAT_INSTRUCTION};
use crate::ai::{GenerationRequest, TextGenerator};
use crate::db::{EntryStore, SortOrder};
use crate::entry::StoredEntry;
use crate::errors::AppResult;
use crate::export::entry_text_block;
use std::fmt;
use tracing::{debug, warn};

/// Result of one generation attempt, ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReformatOutput {
    /// Text returned by the service, unmodified.
    Generated(String),
    /// The call failed; holds the error message.
    Failed(String),
    /// Nothing was sent because there was no text to work on.
    Skipped(String),
}

impl fmt::Display for ReformatOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReformatOutput::Generated(text) => f.write_str(text),
            ReformatOutput::Failed(message) => write!(f, "Error: {}", message),
            ReformatOutput::Skipped(reason) => write!(f, "Skipped: {}", reason),
        }
    }
}

/// Sends a request and converts any failure into inline text.
pub(crate) fn generate_inline(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
) -> ReformatOutput {
    match generator.generate(request) {
        Ok(text) => ReformatOutput::Generated(text),
        Err(e) => {
            warn!("Text generation failed: {}", e);
            ReformatOutput::Failed(e.to_string())
        }
    }
}

/// Reformats a single entry.
pub fn reformat_entry(
    generator: &dyn TextGenerator,
    model: &str,
    stored: &StoredEntry,
) -> ReformatOutput {
    let block = entry_text_block(&stored.entry);
    if block.is_empty() {
        return ReformatOutput::Skipped("entry has no answers".to_string());
    }

    debug!("Reformatting entry {} ({} chars)", stored.id, block.len());
    let request = GenerationRequest::new(
        model,
        REFORMAT_INSTRUCTION,
        reformat_prompt(stored.entry.display_location(), &block),
    );
    generate_inline(generator, &request)
}

/// Reformats every entry, newest first, optionally limited to a location.
///
/// # Errors
///
/// Only store errors are returned; generation errors are inline.
pub fn reformat_entries(
    store: &dyn EntryStore,
    generator: &dyn TextGenerator,
    model: &str,
    location: Option<&str>,
) -> AppResult<Vec<(StoredEntry, ReformatOutput)>> {
    let entries = match location {
        Some(needle) => store.query_by_location(needle)?,
        None => store.query_all(SortOrder::Descending)?,
    };

    Ok(entries
        .into_iter()
        .map(|stored| {
            let output = reformat_entry(generator, model, &stored);
            (stored, output)
        })
        .collect())
}


#[cfg(test)]
mod tests {
    use super::fakes::ScriptedGenerator;
    use super::*;
    use crate::db::Database;
    use crate::entry::test_support::sample_entry;

    fn store_with(locations: &[&str]) -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        for (i, location) in locations.iter().enumerate() {
            db.insert(&sample_entry(location, i as u32)).unwrap();
        }
        db
    }

    #[test]
    fn test_generated_text_is_verbatim() {
        let db = store_with(&["Viveros"]);
        let generator = ScriptedGenerator::replying("  **Tidy** notes\n\n");

        let results = reformat_entries(&db, &generator, "test-model", None).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].1, ReformatOutput::Generated("  **Tidy** notes\n\n".to_string()));
        assert_eq!(results[0].1.to_string(), "  **Tidy** notes\n\n");

        let requests = generator.requests.borrow();
        assert_eq!(requests[0].model, "test-model");
        assert_eq!(requests[0].instruction, REFORMAT_INSTRUCTION);
        assert!(requests[0].prompt.contains("1. context 1"));
    }

    #[test]
    fn test_failures_become_inline_text() {
        let db = store_with(&["Viveros", "Centro"]);
        let generator = ScriptedGenerator::failing("quota exceeded");

        let results = reformat_entries(&db, &generator, "m", None).unwrap();
        assert_eq!(results.len(), 2);
        for (_, output) in &results {
            let shown = output.to_string();
            assert!(shown.starts_with("Error: "));
            assert!(shown.contains("quota exceeded"));
        }
        // No retries: one call per entry
        assert_eq!(generator.requests.borrow().len(), 2);
    }

    #[test]
    fn test_location_filter() {
        let db = store_with(&["Viveros", "Centro", "viveros bajos"]);
        let generator = ScriptedGenerator::replying("ok");

        let results = reformat_entries(&db, &generator, "m", Some("VIVEROS")).unwrap();
        let locations: Vec<&str> = results.iter().map(|(s, _)| s.entry.location.as_str()).collect();
        assert_eq!(locations, vec!["viveros bajos", "Viveros"]);
    }

    #[test]
    fn test_blank_entry_is_skipped_without_call() {
        let db = store_with(&[]);
        let mut entry = sample_entry("Viveros", 0);
        entry.context_answers = Default::default();
        entry.research_answers = Default::default();
        entry.intervention_answers = Default::default();
        db.insert(&entry).unwrap();
        let generator = ScriptedGenerator::replying("unused");

        let results = reformat_entries(&db, &generator, "m", None).unwrap();
        assert!(matches!(results[0].1, ReformatOutput::Skipped(_)));
        assert!(generator.requests.borrow().is_empty());
    }
}
