//! Console command parsing
//!
//! Each stdin line is one command, parsed with clap as if it were an argument
//! list without a binary name.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
pub struct ConsoleLine {
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Start the job
    Run,
    /// Ask the server to stop the running job
    Stop,
    /// Show the result of the last run
    Fetch,
    /// Copy the output view to the clipboard
    Copy,
    /// Save the output view to a dated file
    Save,
    /// Open or close the schedule panel
    Panel {
        #[arg(value_enum)]
        action: PanelAction,
    },
    /// Reload and show the schedule list
    #[command(alias = "ls")]
    List,
    /// Submit the schedule form (creates, or updates while editing)
    Schedule {
        /// RFC 3339, or local "YYYY-MM-DD HH:MM[:SS]"
        #[arg(required = true, num_args = 1..)]
        time: Vec<String>,
    },
    /// Edit an upcoming schedule
    Edit { selector: String },
    /// Leave edit mode
    Cancel,
    /// Delete a schedule
    #[command(alias = "rm")]
    Delete { selector: String },
    /// Show a schedule's stored output
    Report { selector: String },
    /// List commands
    Help,
    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PanelAction {
    Open,
    Close,
}

/// Parses one input line; `Ok(None)` for a blank line
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }

    ConsoleLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

/// Parses a schedule time typed by the operator
///
/// RFC 3339 input carries its own offset. Anything else is read as local
/// wall-clock time.
pub fn parse_time(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(input) {
        return Ok(time.with_timezone(&Utc));
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .with_context(|| format!("Unrecognized time '{}'", input))?;

    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => Ok(local.with_timezone(&Utc)),
        None => bail!("'{}' does not exist in the local time zone", input),
    }
}

/// Help text for the `help` command
pub fn help_text() -> String {
    use clap::CommandFactory;

    ConsoleLine::command()
        .override_usage("<command> [args]")
        .render_help()
        .to_string()
}
