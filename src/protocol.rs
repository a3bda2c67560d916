//! Line-oriented move protocol.
//!
//! A small text protocol in the style of GTP, carrying boards in their
//! canonical serialization. Each request is one line:
//!
//! ```text
//! [id] command [arguments]
//! ```
//!
//! Responses are `={id} result` on success or `?{id} error` on failure,
//! each followed by a blank line.
//!
//! Board arguments run verbatim to the end of the line. They are never
//! trimmed, since spaces are empty cells.
//!
//! ## Supported Commands
//!
//! - `name` - Return engine name
//! - `version` - Return engine version
//! - `protocol_version` - Return protocol version (1)
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `genmove <board>` - Return the engine's next board
//! - `play <index> <board>` - Mark `index` for the player to move, return the new board
//! - `status <board>` - `win`, `draw` or `ongoing`
//! - `showboard <board>` - Render the board as a grid
//! - `clear_cache` - Drop all memoized search results and reset the counters
//!
//! ## Example
//!
//! ```
//! use tictac_rust::protocol::MoveServer;
//!
//! let mut server = MoveServer::new();
//! let mut out = Vec::new();
//! server.run("1 genmove XX OO    \nquit\n".as_bytes(), &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("=1 XXXOO    \n"));
//! ```

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::board::{BoardError, Outcome, from_string};
use crate::cell::MoveError;
use crate::search::Searcher;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "clear_cache",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "status",
    "version",
];

/// A request that could not be carried out.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("missing command")]
    MissingCommand,
    #[error("missing argument")]
    MissingArgument,
    #[error("invalid cell index: {0}")]
    InvalidIndex(String),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Protocol front end around a [`Searcher`].
///
/// The server owns its searcher, so the memo cache lives as long as the
/// server and is only touched from the thread running it.
#[derive(Debug, Default)]
pub struct MoveServer {
    searcher: Searcher,
}

impl MoveServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    /// Serve requests from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.strip_suffix('\r').unwrap_or(&line);

            // Skip blank lines and comments
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let (command, args) = Self::split_command(command_line);
            let command = command.to_lowercase();

            let response = if command.is_empty() {
                Err(CommandError::MissingCommand)
            } else {
                self.execute(&command, args)
            };
            let (prefix, message) = match response {
                Ok(message) => ('=', message),
                Err(err) => ('?', err.to_string()),
            };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim_start();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end == 0 {
            return (None, trimmed);
        }
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim_start()),
            Err(_) => (None, trimmed),
        }
    }

    /// Split off the command word. Arguments keep their inner and trailing
    /// spaces; only the single separating space is dropped.
    fn split_command(line: &str) -> (&str, &str) {
        match line.split_once(' ') {
            Some((command, args)) => (command, args),
            None => (line, ""),
        }
    }

    /// Execute a command and return its response text.
    fn execute(&mut self, command: &str, args: &str) -> Result<String, CommandError> {
        debug!(command, args, "executing command");
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("1".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let name = args.trim();
                if name.is_empty() {
                    return Err(CommandError::MissingArgument);
                }
                let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => Ok(String::new()),

            "clear_cache" => {
                self.searcher.clear_cache();
                self.searcher.reset_stats();
                Ok(String::new())
            }

            "genmove" => Ok(self.searcher.next_move(args)?),

            "play" => {
                let (index, serialized) = Self::split_command(args.trim_start());
                if index.is_empty() {
                    return Err(CommandError::MissingArgument);
                }
                let index = index
                    .parse::<usize>()
                    .map_err(|_| CommandError::InvalidIndex(index.to_string()))?;
                let mut board = from_string(serialized)?;
                board.play(index)?;
                Ok(board.to_string())
            }

            "status" => {
                let status = match from_string(args)?.outcome() {
                    Outcome::Win => "win",
                    Outcome::Draw => "draw",
                    Outcome::Ongoing => "ongoing",
                };
                Ok(status.to_string())
            }

            "showboard" => Ok(format!("\n{}", from_string(args)?.render())),

            _ => Err(CommandError::UnknownCommand(command.to_string())),
        }
    }
}
