//! Errors that abort a whole invocation, as opposed to failures of a single printer.
//!
//! Failures that happen while talking to one printer are plain [anyhow::Error] values; they are
//! reported against that printer and never reach this module. See [mod@crate::run_plan].

use crate::config::DeviceId;
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit statuses.
///
/// Every failure category shares [exit_code::FAILURE]. Scripts that need to tell them apart
/// should read the console output.
pub mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
}

/// The roster file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("printer ID {id} is listed more than once")]
    DuplicateId { id: DeviceId },
}

/// A token from a comma-separated ID list that isn't an integer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid printer ID {token:?}")]
pub struct InvalidTargetId {
    pub token: String,
}

/// One or more requested IDs are absent from the roster.
///
/// Lists every missing ID in request order, not just the first.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Unknown printer ID(s): {}", IdList(.ids))]
pub struct UnknownTargets {
    pub ids: Vec<DeviceId>,
}

/// A calibration run was requested with no sub-tests selected and without `--home-only`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("Nothing to calibrate: choose at least one option or use --home-only.")]
pub struct NothingToCalibrate;

/// Everything that can end an invocation with a non-zero status.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No printers in config.")]
    EmptyRoster,

    #[error(transparent)]
    InvalidTargetId(#[from] InvalidTargetId),

    #[error(transparent)]
    UnknownTargets(#[from] UnknownTargets),

    #[error(transparent)]
    NothingToCalibrate(#[from] NothingToCalibrate),

    #[error("{failed} printer(s) failed")]
    TargetsFailed { failed: usize },

    #[error("could not write output: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// The process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        exit_code::FAILURE
    }
}

/// Formats IDs the way the console has always shown them: `[4, 9]`.
struct IdList<'a>(&'a [DeviceId]);

impl Display for IdList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
        }
        write!(f, "]")
    }
}
