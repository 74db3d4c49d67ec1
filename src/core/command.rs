//! Command documents sent to printers.
//!
//! Every document wraps one [PrintCommand] under a top-level `print` key:
//!
//! ```text
//! {"print": {"command": "home", "sequence_id": "1"}}
//! {"print": {"command": "calibration", "sequence_id": "2", "option": 6}}
//! ```

use crate::core::option::OptionMask;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::ser::Formatter;
use std::fmt::{self, Display};
use std::io;

/// Identifies a command within one printer's command sequence. Serialized as a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceId(u32);

impl SequenceId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for SequenceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Hands out [SequenceId]s for one printer's command sequence, starting at 1.
///
/// Create a fresh counter for each printer. IDs are never reused within a counter.
#[derive(Debug)]
pub struct SequenceCounter {
    next: u32,
}

impl SequenceCounter {
    pub fn new() -> Self {
        SequenceCounter { next: 1 }
    }

    pub fn next_id(&mut self) -> SequenceId {
        let id = SequenceId(self.next);
        self.next += 1;
        id
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// The commands this tool knows how to send.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum PrintCommand {
    /// Home all axes.
    Home { sequence_id: SequenceId },

    /// Run the calibration routine with the sub-tests in `option`.
    Calibration {
        sequence_id: SequenceId,
        option: OptionMask,
    },
}

impl PrintCommand {
    pub fn sequence_id(&self) -> SequenceId {
        match self {
            PrintCommand::Home { sequence_id } | PrintCommand::Calibration { sequence_id, .. } => {
                *sequence_id
            }
        }
    }
}

/// A complete message for a printer's request topic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandDocument {
    pub print: PrintCommand,
}

impl CommandDocument {
    /// Builds a home command.
    pub fn home(sequence_id: SequenceId) -> Self {
        CommandDocument {
            print: PrintCommand::Home { sequence_id },
        }
    }

    /// Builds a calibration command. `option` is sent as-is.
    pub fn calibration(sequence_id: SequenceId, option: OptionMask) -> Self {
        CommandDocument {
            print: PrintCommand::Calibration {
                sequence_id,
                option,
            },
        }
    }

    /// Serializes the document as it is printed and published.
    ///
    /// The layout has a space after every `:` and `,`, e.g.
    /// `{"print": {"command": "home", "sequence_id": "1"}}`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, SpacedFormatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buffer).map_err(serde_json::Error::custom)
    }
}

/// A single-line [Formatter] that separates members with `", "` and keys from values with `": "`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}
