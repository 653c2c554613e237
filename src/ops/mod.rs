//! User-facing operations.
//!
//! Each operation ties the store, the entry model, the export stage and the
//! text generation layer together for one CLI command.

pub mod amend;
pub mod export;
pub mod merge;
pub mod reformat;
pub mod submit;

pub use amend::{amend_entry, AnswerEdit};
pub use export::{export_pdf, ExportSummary};
pub use merge::merge_location;
pub use reformat::{reformat_entries, reformat_entry, ReformatOutput};
pub use submit::{current_time, submit_form};
