//! Client request lines.

use std::str::FromStr;

/// One request line from a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    /// `MOVE:<row>,<col>` with zero-based coordinates.
    Move {
        /// Row.
        row: usize,
        /// Column.
        col: usize,
    },
    /// `RESTART`
    Restart,
    /// `QUIT`
    Quit,
}

/// A request line that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CommandError {
    /// Blank line.
    #[display("Empty command")]
    Empty,
    /// Unrecognised verb.
    #[display("Unknown command: {}", verb)]
    Unknown {
        /// The verb as received.
        verb: String,
    },
    /// `MOVE` without two numeric coordinates.
    #[display("Malformed move: {}", args)]
    MalformedMove {
        /// The argument text as received.
        args: String,
    },
}

impl FromStr for ClientCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let (verb, args) = line.split_once(':').unwrap_or((line, ""));
        match verb.trim().to_ascii_uppercase().as_str() {
            "MOVE" => parse_coords(args).ok_or_else(|| CommandError::MalformedMove {
                args: args.to_string(),
            }),
            "RESTART" => Ok(ClientCommand::Restart),
            "QUIT" => Ok(ClientCommand::Quit),
            _ => Err(CommandError::Unknown {
                verb: verb.to_string(),
            }),
        }
    }
}

fn parse_coords(args: &str) -> Option<ClientCommand> {
    let (row, col) = args.split_once(',')?;
    Some(ClientCommand::Move {
        row: row.trim().parse().ok()?,
        col: col.trim().parse().ok()?,
    })
}
