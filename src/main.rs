/*!
# fieldnotes

A command-line field journal. Each entry records where the notes were taken,
answers to a fixed questionnaire (context, research and intervention) and an
optional photo. Entries can be read back, filtered by location, exported to a
PDF document, and reformatted or merged by a text generation service.

## Usage

```text
fieldnotes [OPTIONS] <COMMAND>

Commands:
  add        Record a new entry
  history    Show every stored entry
  search     Show entries whose location contains the given text
  export     Write every entry to a PDF document
  reformat   Ask the configured model to tidy up each entry
  merge      Merge every visit to a location into one account
  amend      Store a revised copy of an entry

Options:
  -v, --verbose              Print verbose output
      --log-format <FORMAT>  Log output format [default: text] [possible values: text, json]
```

## Configuration

- `FIELDNOTES_DB`: database file (defaults to `~/Documents/fieldnotes/fieldnotes.db`)
- `FIELDNOTES_DB_KEY`: SQLCipher key; the database is unencrypted when unset
- `FIELDNOTES_AI_PROVIDER`: `openai` (default) or `ollama`
- `FIELDNOTES_AI_URL`, `FIELDNOTES_MODEL`: service base URL and model
- `FIELDNOTES_API_KEY` or `OPENAI_API_KEY`: bearer credential
- `FIELDNOTES_UTC_OFFSET`: civil offset for timestamps (defaults to `-05:00`)
*/

use fieldnotes::ai::build_generator;
use fieldnotes::cli::{CliArgs, Commands};
use fieldnotes::constants::{
    DEFAULT_LOG_LEVEL, DISPLAY_TIMESTAMP_FORMAT, LOG_FORMAT_JSON, TRACING_ROOT_SPAN_NAME,
    TRACING_SERVICE_NAME,
};
use fieldnotes::db::{Database, EntryStore};
use fieldnotes::entry::{EntryId, FormState, Section, StoredEntry};
use fieldnotes::errors::{AppError, AppResult};
use fieldnotes::form::prompt_form;
use fieldnotes::history::{render_history, HistoryOptions};
use fieldnotes::ops::{self, AnswerEdit};
use fieldnotes::Config;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Sets up the global subscriber. Logs always go to stderr so command
/// output on stdout stays clean.
fn init_tracing(log_format: &str, verbose: bool) -> AppResult<()> {
    let default_level = if verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_timer(ChronoUtc::rfc_3339())
        .with_target(false);

    let result = if log_format == LOG_FORMAT_JSON {
        builder.json().try_init()
    } else {
        builder.with_ansi(false).try_init()
    };
    result.map_err(|e| AppError::Config(format!("Failed to initialize logging: {}", e)))
}

fn open_store(config: &Config) -> AppResult<Database> {
    if let Some(parent) = config.db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let db = Database::open(&config.db_path, config.db_key.as_deref())?;
    db.initialize_schema()?;
    Ok(db)
}

fn entry_heading(stored: &StoredEntry, config: &Config) -> String {
    format!(
        "== {} — {} ({})",
        stored
            .entry
            .timestamp
            .with_timezone(&config.utc_offset)
            .format(DISPLAY_TIMESTAMP_FORMAT),
        stored.entry.display_location(),
        stored.id
    )
}

#[allow(clippy::too_many_arguments)]
fn add_entry(
    db: &Database,
    config: &Config,
    location: Option<String>,
    context: Vec<String>,
    research: Vec<String>,
    intervention: Vec<String>,
    photo: Option<&Path>,
    interactive: bool,
) -> AppResult<()> {
    let mut form = FormState::new();
    if let Some(location) = location {
        form.location = location;
    }
    form.set_answers(Section::Context, context)?;
    form.set_answers(Section::Research, research)?;
    form.set_answers(Section::Intervention, intervention)?;
    if let Some(path) = photo {
        form.attach_photo_file(path)?;
    }

    if interactive {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut prompts = io::stdout();
        prompt_form(&mut input, &mut prompts, &mut form)?;
    }

    let id = ops::submit_form(db, &mut form, ops::current_time(config.utc_offset))?;
    println!("Saved entry {}", id);
    Ok(())
}

fn run(args: CliArgs, config: &Config) -> AppResult<()> {
    let db = open_store(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::Add {
            location,
            context,
            research,
            intervention,
            photo,
            interactive,
        } => {
            drop(out);
            add_entry(
                &db,
                config,
                location,
                context,
                research,
                intervention,
                photo.as_deref(),
                interactive,
            )?;
        }

        Commands::History { order, photos_dir } => {
            let entries = db.query_all(order.into())?;
            let options = HistoryOptions {
                offset: config.utc_offset,
                photo_dir: photos_dir.as_deref(),
            };
            render_history(&mut out, &entries, options)?;
        }

        Commands::Search { location } => {
            let entries = db.query_by_location(&location)?;
            if entries.is_empty() {
                writeln!(out, "No entries match \"{}\".", location.trim())?;
            } else {
                let options = HistoryOptions {
                    offset: config.utc_offset,
                    photo_dir: None,
                };
                render_history(&mut out, &entries, options)?;
            }
        }

        Commands::Export { order, output } => {
            let summary = ops::export_pdf(&db, order.into(), config.utc_offset, &output)?;
            writeln!(
                out,
                "Exported {} entries ({} pages) to {}",
                summary.entries,
                summary.pages,
                summary.path.display()
            )?;
        }

        Commands::Reformat { location } => {
            let generator = build_generator(config)?;
            let results =
                ops::reformat_entries(&db, generator.as_ref(), &config.model, location.as_deref())?;
            if results.is_empty() {
                writeln!(out, "No entries recorded yet.")?;
            }
            for (i, (stored, output)) in results.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                writeln!(out, "{}", entry_heading(stored, config))?;
                writeln!(out, "{}", output)?;
            }
        }

        Commands::Merge { location } => {
            let generator = build_generator(config)?;
            let output = ops::merge_location(&db, generator.as_ref(), &config.model, &location)?;
            writeln!(out, "{}", output)?;
        }

        Commands::Amend { id, location, edits } => {
            let id: EntryId = id
                .parse()
                .map_err(|e| AppError::Validation(format!("Invalid entry id \"{}\": {}", id, e)))?;
            let edits = edits
                .iter()
                .map(|raw| raw.parse::<AnswerEdit>())
                .collect::<AppResult<Vec<_>>>()?;
            let new_id = ops::amend_entry(
                &db,
                id,
                &edits,
                location.as_deref(),
                ops::current_time(config.utc_offset),
            )?;
            writeln!(out, "Saved entry {} (revises {})", new_id, id)?;
        }
    }

    Ok(())
}

/// Entry point: parses arguments, sets up logging, loads configuration and
/// dispatches the command. Errors are logged once here and turn into a
/// non-zero exit status.
fn main() {
    let args = CliArgs::parse();

    if let Err(e) = init_tracing(&args.log_format, args.verbose) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let correlation_id = Uuid::new_v4();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();

    info!("Starting fieldnotes");
    debug!("CLI arguments: {:?}", args);

    let result = Config::load().and_then(|config| {
        config.validate()?;
        debug!("Configuration: {:?}", config);
        run(args, &config)
    });

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
