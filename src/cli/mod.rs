use crate::constants::{
    APP_DESCRIPTION, APP_NAME, DEFAULT_PDF_FILENAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT,
};
use crate::db::SortOrder;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// A guided field journal: record stops, read them back, export and reformat.
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION)]
#[command(author, version, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    /// Print verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(
        long,
        global = true,
        value_name = "FORMAT",
        default_value = LOG_FORMAT_TEXT,
        value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON]
    )]
    pub log_format: String,
}

/// Listing order for commands that show every entry.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OrderArg {
    /// Oldest first
    Asc,
    /// Newest first
    #[default]
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Asc => SortOrder::Ascending,
            OrderArg::Desc => SortOrder::Descending,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new entry
    Add {
        /// Where the notes were taken
        #[arg(short = 'l', long)]
        location: Option<String>,

        /// Context answer, in question order (repeat up to 6 times)
        #[arg(short = 'c', long = "context", value_name = "ANSWER")]
        context: Vec<String>,

        /// Research answer, in question order (repeat up to 3 times)
        #[arg(short = 'r', long = "research", value_name = "ANSWER")]
        research: Vec<String>,

        /// Intervention answer, in question order (repeat up to 5 times)
        #[arg(short = 'i', long = "intervention", value_name = "ANSWER")]
        intervention: Vec<String>,

        /// Image file to attach
        #[arg(short = 'p', long)]
        photo: Option<PathBuf>,

        /// Ask each question in turn on the terminal
        #[arg(long, conflicts_with_all = ["context", "research", "intervention"])]
        interactive: bool,
    },

    /// Show every stored entry
    History {
        #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
        order: OrderArg,

        /// Save decoded photos into this directory
        #[arg(long, value_name = "DIR")]
        photos_dir: Option<PathBuf>,
    },

    /// Show entries whose location contains the given text (case-insensitive)
    Search {
        location: String,
    },

    /// Write every entry to a PDF document
    Export {
        #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
        order: OrderArg,

        /// Output file
        #[arg(short = 'o', long, default_value = DEFAULT_PDF_FILENAME)]
        output: PathBuf,
    },

    /// Ask the configured model to tidy up each entry
    Reformat {
        /// Only entries whose location contains this text
        #[arg(short = 'l', long)]
        location: Option<String>,
    },

    /// Merge every visit to a location into one account
    Merge {
        location: String,
    },

    /// Store a revised copy of an entry
    Amend {
        /// Id of the entry to revise
        id: String,

        /// Replace the location
        #[arg(short = 'l', long)]
        location: Option<String>,

        /// Replace one answer, written SECTION.N=TEXT (for example context.2=...)
        #[arg(short = 's', long = "set", value_name = "SECTION.N=TEXT")]
        edits: Vec<String>,
    },
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        <CliArgs as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_add_with_answers() {
        let args = parse(&[
            "fieldnotes",
            "add",
            "--location",
            "Viveros",
            "-c",
            "first",
            "-c",
            "second",
            "--research",
            "r1",
            "--photo",
            "stop.jpg",
        ]);
        match args.command {
            Commands::Add {
                location,
                context,
                research,
                intervention,
                photo,
                interactive,
            } => {
                assert_eq!(location.as_deref(), Some("Viveros"));
                assert_eq!(context, vec!["first", "second"]);
                assert_eq!(research, vec!["r1"]);
                assert!(intervention.is_empty());
                assert_eq!(photo, Some(PathBuf::from("stop.jpg")));
                assert!(!interactive);
            }
            other => panic!("Expected add, got {:?}", other),
        }
    }

    #[test]
    fn test_interactive_conflicts_with_answers() {
        let result = CliArgs::try_parse_from(["fieldnotes", "add", "--interactive", "-c", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_history_defaults_to_newest_first() {
        let args = parse(&["fieldnotes", "history"]);
        match args.command {
            Commands::History { order, photos_dir } => {
                assert_eq!(SortOrder::from(order), SortOrder::Descending);
                assert!(photos_dir.is_none());
            }
            other => panic!("Expected history, got {:?}", other),
        }
    }

    #[test]
    fn test_export_defaults() {
        let args = parse(&["fieldnotes", "export", "--order", "asc"]);
        match args.command {
            Commands::Export { order, output } => {
                assert_eq!(order, OrderArg::Asc);
                assert_eq!(output, PathBuf::from(DEFAULT_PDF_FILENAME));
            }
            other => panic!("Expected export, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["fieldnotes", "search", "viveros", "--verbose", "--log-format", "json"]);
        assert!(args.verbose);
        assert_eq!(args.log_format, LOG_FORMAT_JSON);
        assert!(matches!(args.command, Commands::Search { ref location } if location == "viveros"));
    }

    #[test]
    fn test_log_format_rejects_unknown() {
        assert!(CliArgs::try_parse_from(["fieldnotes", "history", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn test_amend_edits() {
        let args = parse(&[
            "fieldnotes",
            "amend",
            "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "-s",
            "context.1=new",
            "--set",
            "intervention.5=last",
        ]);
        match args.command {
            Commands::Amend { id, location, edits } => {
                assert!(id.starts_with("1b4e28ba"));
                assert!(location.is_none());
                assert_eq!(edits.len(), 2);
            }
            other => panic!("Expected amend, got {:?}", other),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(CliArgs::try_parse_from(["fieldnotes"]).is_err());
    }
}
