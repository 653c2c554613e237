//! Journal entry model and the fixed field questionnaire.
//!
//! An entry covers one stop on a field visit: a location label, the answers
//! to the three questionnaire sections and an optional photo. Entries are
//! immutable once built; amending produces a new entry that points back at
//! the one it supersedes.

pub mod builder;
pub mod photo;

use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub use builder::FormState;

/// Number of context questions.
pub const CONTEXT_LEN: usize = 6;
/// Number of research questions.
pub const RESEARCH_LEN: usize = 3;
/// Number of intervention questions.
pub const INTERVENTION_LEN: usize = 5;

/// Guiding questions about the territory and its actors.
pub const CONTEXT_QUESTIONS: [&str; CONTEXT_LEN] = [
    "Main milestones in the territorial transformation",
    "Individual and collective actors key to shaping the territory",
    "Main urban transformations and their social impact",
    "Intergenerational and intercultural relationships",
    "Tensions or conflicts in how the territory is conceived",
    "Matrices of oppression identified in the territory",
];

/// Guiding questions about research carried out in the territory.
pub const RESEARCH_QUESTIONS: [&str; RESEARCH_LEN] = [
    "Particularities of research here (techniques, relation to social groups, place of the subject, scope, who researches)",
    "Interests that drive the research",
    "Links between research, action and transformation",
];

/// Guiding questions about interventions in the neighbourhood.
pub const INTERVENTION_QUESTIONS: [&str; INTERVENTION_LEN] = [
    "Actors that drive neighbourhood intervention processes",
    "Community intervention proposals (type, characteristics)",
    "Institutional intervention proposals (type, characteristics)",
    "Role of memory in territorial transformation",
    "Contradictions in intervention processes",
];

/// One questionnaire section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Context,
    Research,
    Intervention,
}

impl Section {
    /// All sections in questionnaire order.
    pub const ALL: [Section; 3] = [Section::Context, Section::Research, Section::Intervention];

    /// Heading shown in history and exports.
    pub fn title(self) -> &'static str {
        match self {
            Section::Context => "Context",
            Section::Research => "Research",
            Section::Intervention => "Intervention",
        }
    }

    /// The fixed questions of this section.
    pub fn questions(self) -> &'static [&'static str] {
        match self {
            Section::Context => &CONTEXT_QUESTIONS,
            Section::Research => &RESEARCH_QUESTIONS,
            Section::Intervention => &INTERVENTION_QUESTIONS,
        }
    }

    /// Number of answer slots in this section.
    pub fn len(self) -> usize {
        self.questions().len()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Identifier assigned to an entry when it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        EntryId(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(EntryId)
    }
}

/// A submitted journal record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// Creation time in the configured civil offset.
    pub timestamp: DateTime<FixedOffset>,
    /// Trimmed location label.
    pub location: String,
    pub context_answers: [String; CONTEXT_LEN],
    pub research_answers: [String; RESEARCH_LEN],
    pub intervention_answers: [String; INTERVENTION_LEN],
    /// Base64 of the uploaded photo bytes.
    pub photo: Option<String>,
    /// Entry this one supersedes, when produced by an amendment.
    pub revises: Option<EntryId>,
}

impl JournalEntry {
    /// Answers of one section, in questionnaire order.
    pub fn answers(&self, section: Section) -> &[String] {
        match section {
            Section::Context => &self.context_answers,
            Section::Research => &self.research_answers,
            Section::Intervention => &self.intervention_answers,
        }
    }

    /// Iterates over every section with its answers.
    pub fn sections(&self) -> impl Iterator<Item = (Section, &[String])> {
        Section::ALL.into_iter().map(move |s| (s, self.answers(s)))
    }

    /// True when the location and every answer are blank.
    pub fn is_blank(&self) -> bool {
        self.location.trim().is_empty()
            && self
                .sections()
                .all(|(_, answers)| answers.iter().all(|a| a.trim().is_empty()))
    }

    /// Location for display, with a placeholder when none was given.
    pub fn display_location(&self) -> &str {
        if self.location.is_empty() {
            "(no location)"
        } else {
            &self.location
        }
    }
}

/// An entry together with the identifier the store assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub id: EntryId,
    pub entry: JournalEntry,
}
