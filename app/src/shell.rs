//! Line commands understood by the `tasklist` binary.
//!
//! Plain text types into the add-task field. Lines starting with `/` are
//! commands; a leading `//` types text that itself starts with `/`:
//!
//! ```text
//! //etc cleanup   type "/etc cleanup"
//! /add            press Add
//! /tap N          tap row N (1-based)
//! /search TEXT    type into the search field
//! /dump           print the current state as JSON
//! /help           list commands
//! /quit           leave
//! ```

use std::borrow::Cow;

use crate::view::UiEvent;

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward an event to the view
    Ui(UiEvent),
    /// Tap the row at this 1-based position
    Tap(usize),
    /// Print the current state as JSON
    Dump,
    /// Print the command list
    Help,
    /// Leave the shell
    Quit,
    /// Unrecognised or malformed command
    Unknown(String),
}

/// Command list shown by `/help`
pub const HELP: &str = "\
Type text to fill the Task field (start with // to type a leading /).
  /add            press Add
  /tap N          tap row N to remove it
  /search TEXT    set the search field
  /dump           print state as JSON
  /quit           exit
";

impl Command {
    /// Parse one input line (without its trailing newline)
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let Some(command) = line.strip_prefix('/') else {
            return Self::Ui(UiEvent::TextChanged(line.to_string()));
        };
        if command.starts_with('/') {
            return Self::Ui(UiEvent::TextChanged(command.to_string()));
        }

        let (name, argument) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, rest)| (name, rest.trim()));

        match name {
            "add" => Self::Ui(UiEvent::AddPressed),
            "search" => Self::Ui(UiEvent::SearchChanged(argument.to_string())),
            "tap" => match argument.parse::<usize>() {
                Ok(row) if row >= 1 => Self::Tap(row),
                _ => Self::Unknown(line.to_string()),
            },
            "dump" => Self::Dump,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Decode one raw input line, dropping the line terminator
///
/// Invalid UTF-8 is replaced with U+FFFD rather than rejected.
#[must_use]
pub fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}
