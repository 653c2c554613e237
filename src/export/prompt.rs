//! Serialization of entries into model-ready text.

use crate::constants::DISPLAY_TIMESTAMP_FORMAT;
use crate::entry::{JournalEntry, StoredEntry};

/// Concatenates the non-blank answers of an entry, grouped by section.
///
/// Answers keep their questionnaire ordinal so the model can tell which
/// question each refers to. Sections with no answers are left out entirely.
pub fn entry_text_block(entry: &JournalEntry) -> String {
    let mut sections = Vec::new();

    for (section, answers) in entry.sections() {
        let lines: Vec<String> = answers
            .iter()
            .enumerate()
            .filter(|(_, answer)| !answer.trim().is_empty())
            .map(|(i, answer)| format!("{}. {}", i + 1, answer.trim()))
            .collect();

        if !lines.is_empty() {
            sections.push(format!("{}\n{}", section.title(), lines.join("\n")));
        }
    }

    sections.join("\n\n")
}

/// One text block per visit, in the order given, each headed by its timestamp.
pub fn visit_blocks(entries: &[StoredEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|stored| {
            format!(
                "Recorded {}\n{}",
                stored.entry.timestamp.format(DISPLAY_TIMESTAMP_FORMAT),
                entry_text_block(&stored.entry)
            )
        })
        .collect()
}
