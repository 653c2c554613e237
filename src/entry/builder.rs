//! Assembling form input into an entry.

use super::photo::encode_photo;
use super::{JournalEntry, Section, CONTEXT_LEN, INTERVENTION_LEN, RESEARCH_LEN};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Local input state of the journal form.
///
/// Holds what the user has typed so far. After a successful submit the
/// caller resets it instead of discarding the whole value, so the same form
/// can be reused for the next stop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub location: String,
    pub context: [String; CONTEXT_LEN],
    pub research: [String; RESEARCH_LEN],
    pub intervention: [String; INTERVENTION_LEN],
    pub photo: Option<Vec<u8>>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a form with the contents of an existing entry.
    ///
    /// The photo stays encoded on the entry; it is not loaded back into the form.
    pub fn from_entry(entry: &JournalEntry) -> Self {
        FormState {
            location: entry.location.clone(),
            context: entry.context_answers.clone(),
            research: entry.research_answers.clone(),
            intervention: entry.intervention_answers.clone(),
            photo: None,
        }
    }

    fn slots_mut(&mut self, section: Section) -> &mut [String] {
        match section {
            Section::Context => &mut self.context,
            Section::Research => &mut self.research,
            Section::Intervention => &mut self.intervention,
        }
    }

    /// Sets one answer by its 0-based position.
    pub fn set_answer(
        &mut self,
        section: Section,
        index: usize,
        answer: impl Into<String>,
    ) -> AppResult<()> {
        let slots = self.slots_mut(section);
        let len = slots.len();
        let slot = slots.get_mut(index).ok_or_else(|| {
            AppError::Validation(format!(
                "{} has {} questions, no answer slot {}",
                section,
                len,
                index + 1
            ))
        })?;
        *slot = answer.into();
        Ok(())
    }

    /// Fills a section from the front. Missing answers are left as they are.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if more answers are given than the
    /// section has questions. The form is unchanged in that case.
    pub fn set_answers<S: Into<String>>(
        &mut self,
        section: Section,
        answers: Vec<S>,
    ) -> AppResult<()> {
        if answers.len() > section.len() {
            return Err(AppError::Validation(format!(
                "{} accepts at most {} answers, got {}",
                section,
                section.len(),
                answers.len()
            )));
        }
        for (index, answer) in answers.into_iter().enumerate() {
            self.set_answer(section, index, answer)?;
        }
        Ok(())
    }

    /// Attaches a photo read from disk.
    pub fn attach_photo_file(&mut self, path: &Path) -> AppResult<()> {
        let bytes = fs::read(path)?;
        debug!("Read {} photo bytes from {:?}", bytes.len(), path);
        self.photo = Some(bytes);
        Ok(())
    }

    /// Clears every input slot.
    pub fn reset(&mut self) {
        *self = FormState::default();
    }

    /// Builds an entry stamped with `now`.
    ///
    /// The location is trimmed, the photo is base64-encoded when present and
    /// non-empty. Answers are kept exactly as typed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when the location and every answer are
    /// blank. A photo on its own does not count as content.
    pub fn build(&self, now: DateTime<FixedOffset>) -> AppResult<JournalEntry> {
        let entry = JournalEntry {
            timestamp: now,
            location: self.location.trim().to_string(),
            context_answers: self.context.clone(),
            research_answers: self.research.clone(),
            intervention_answers: self.intervention.clone(),
            photo: self.photo.as_deref().and_then(encode_photo),
            revises: None,
        };

        if entry.is_blank() {
            return Err(AppError::Validation(
                "at least one field must be filled in before saving".to_string(),
            ));
        }

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::photo::decode_photo;
    use chrono::TimeZone;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 14, 10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_build_trims_location_only() {
        let mut form = FormState::new();
        form.location = "  Centro Cultural de Moravia \n".to_string();
        form.set_answers(Section::Context, vec!["  padded answer  "]).unwrap();

        let entry = form.build(now()).unwrap();
        assert_eq!(entry.location, "Centro Cultural de Moravia");
        assert_eq!(entry.context_answers[0], "  padded answer  ");
        assert_eq!(entry.timestamp, now());
    }

    #[test]
    fn test_build_keeps_fixed_lengths_and_order() {
        let mut form = FormState::new();
        form.set_answers(Section::Context, vec!["c1", "c2", "c3", "c4", "c5", "c6"]).unwrap();
        form.set_answers(Section::Research, vec!["r1", "r2", "r3"]).unwrap();
        form.set_answers(Section::Intervention, vec!["i1", "i2", "i3", "i4", "i5"]).unwrap();

        let entry = form.build(now()).unwrap();
        assert_eq!(entry.context_answers.len(), 6);
        assert_eq!(entry.research_answers, ["r1", "r2", "r3"].map(String::from));
        assert_eq!(entry.intervention_answers[4], "i5");
    }

    #[test]
    fn test_partial_section_leaves_remaining_slots_empty() {
        let mut form = FormState::new();
        form.set_answers(Section::Research, vec!["only the first"]).unwrap();

        let entry = form.build(now()).unwrap();
        assert_eq!(entry.research_answers[0], "only the first");
        assert!(entry.research_answers[1].is_empty());
        assert!(entry.research_answers[2].is_empty());
    }

    #[test]
    fn test_too_many_answers_rejected() {
        let mut form = FormState::new();
        let result = form.set_answers(Section::Research, vec!["a", "b", "c", "d"]);
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(form, FormState::new());
    }

    #[test]
    fn test_blank_submission_rejected() {
        let mut form = FormState::new();
        form.location = "   ".to_string();
        form.set_answers(Section::Context, vec!["", " \t "]).unwrap();
        form.photo = Some(vec![1, 2, 3]);

        match form.build(now()) {
            Err(AppError::Validation(msg)) => assert!(msg.contains("at least one field")),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_photo_encoded_when_present() {
        let mut form = FormState::new();
        form.location = "Viveros".to_string();
        form.photo = Some(vec![0xFF, 0xD8, 0xFF, 0x00, 0x10]);

        let entry = form.build(now()).unwrap();
        let decoded = decode_photo(entry.photo.as_deref().unwrap()).unwrap();
        assert_eq!(decoded, vec![0xFF, 0xD8, 0xFF, 0x00, 0x10]);
    }

    #[test]
    fn test_empty_photo_is_absent() {
        let mut form = FormState::new();
        form.location = "Viveros".to_string();
        form.photo = Some(Vec::new());

        let entry = form.build(now()).unwrap();
        assert!(entry.photo.is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut form = FormState::new();
        form.location = "Viveros".to_string();
        form.set_answer(Section::Intervention, 4, "last").unwrap();
        form.photo = Some(vec![1]);

        form.reset();
        assert_eq!(form, FormState::default());
    }

    #[test]
    fn test_set_answer_out_of_range() {
        let mut form = FormState::new();
        let result = form.set_answer(Section::Research, 3, "x");
        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("no answer slot 4")),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}
