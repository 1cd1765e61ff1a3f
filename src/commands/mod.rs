//! Terminal commands
//!
//! One command per input line. Parsing is separate from execution so the
//! shell can report input mistakes without touching the store.

pub mod feed;

pub use feed::*;

use flickrer_core::CommandError;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search by free text; empty text falls back to the recent feed
    Search(String),
    /// Filter by one tag
    Tag(String),
    /// Filter by several tags
    Tags(Vec<String>),
    /// Load the next page
    More,
    /// Toggle a photo open or closed
    Expand(String),
    /// Clear filters and reload
    Refresh,
    /// Print the current feed
    Show,
    Help,
    Quit,
}

fn input_error(message: impl Into<String>) -> CommandError {
    CommandError {
        code: "E_INPUT".to_string(),
        message: message.into(),
    }
}

/// Parse one line of input. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "search" | "s" => Command::Search(rest.to_string()),
        "tag" | "t" => {
            if rest.is_empty() {
                return Err(input_error("usage: tag <name>"));
            }
            Command::Tag(rest.to_string())
        }
        "tags" => Command::Tags(
            rest.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect(),
        ),
        "more" | "m" => Command::More,
        "expand" | "e" => {
            if rest.is_empty() {
                return Err(input_error("usage: expand <photo id>"));
            }
            Command::Expand(rest.to_string())
        }
        "refresh" | "r" => Command::Refresh,
        "show" | "ls" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(input_error(format!("unknown command: {}", other))),
    };

    Ok(Some(command))
}

pub const HELP: &str = "\
commands:
  search <text>     search photos (empty text shows recent photos)
  tag <name>        filter by one tag
  tags <a,b,...>    filter by several tags
  more              load the next page
  expand <id>       open or close a photo; tags load in the background
  refresh           clear filters and reload
  show              print the feed
  quit";
