/*!
# fieldnotes

fieldnotes is a guided field journal. Each entry answers a fixed questionnaire
about one place (six context questions, three research questions and five
intervention questions), optionally with a photo, and is stamped with the time
in a configured civil offset.

## Core Features

- Record entries from command-line answers or an interactive questionnaire
- Read back the full history, newest or oldest first
- Filter entries by location, ignoring case
- Export every entry to a paginated PDF document
- Reformat entries, or merge visits to one place, with a text generation service

## Architecture

- `entry`: Entry model and the form that builds entries
- `db`: Record store (SQLite with optional SQLCipher encryption)
- `history`: Plain-text rendering of stored entries
- `export`: PDF layout and model-ready text blocks
- `ai`: Text generation clients (OpenAI-compatible and Ollama)
- `ops`: One operation per CLI command
- `cli`, `config`, `errors`, `constants`: Application plumbing

## Usage Example

```rust,no_run
use fieldnotes::db::{Database, EntryStore, SortOrder};
use fieldnotes::entry::{FormState, Section};
use fieldnotes::{ops, Config};

fn main() -> fieldnotes::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let db = Database::open(&config.db_path, config.db_key.as_deref())?;
    db.initialize_schema()?;

    let mut form = FormState::new();
    form.location = "Vivero comunitario".to_string();
    form.set_answers(Section::Context, vec!["Community garden behind the school"])?;
    ops::submit_form(&db, &mut form, ops::current_time(config.utc_offset))?;

    for stored in db.query_all(SortOrder::Descending)? {
        println!("{} {}", stored.id, stored.entry.location);
    }
    Ok(())
}
```
*/

/// Text generation clients and prompt templates
pub mod ai;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Record store
pub mod db;
/// Entry model and form state
pub mod entry;
/// Error types and utilities for error handling
pub mod errors;
/// PDF export and text serialization
pub mod export;
/// Interactive questionnaire
pub mod form;
/// History rendering
pub mod history;
/// User-facing operations
pub mod ops;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use db::{Database, EntryStore, SortOrder};
pub use entry::{EntryId, FormState, JournalEntry, StoredEntry};
pub use errors::{AppError, AppResult};
