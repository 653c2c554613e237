//! Export stage: turning stored entries into artifacts.
//!
//! - `pdf`: paginated PDF document
//! - `metrics`: Helvetica glyph widths used to wrap PDF lines
//! - `prompt`: plain text blocks for text generation

pub mod metrics;
pub mod pdf;
pub mod prompt;

pub use pdf::{layout_document, render_pdf};
pub use prompt::{entry_text_block, visit_blocks};
