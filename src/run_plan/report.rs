//! Reports progress and outcomes for each printer.
//!
//! As with the rest of [mod@crate::run_plan], the user chooses a real or fake [Report]
//! implementation. Both call the same private-by-convention functions in this module, which
//! contain all of the formatting logic and write to any [Write]r. The real [Reporter] locks stdout
//! for each line, so lines are never interleaved.

use crate::config::{DeviceEntry, DeviceId};
use crate::core::CommandDocument;
use std::io::{self, Write};
use std::time::Duration;

/// Prints feedback about each printer to keep the user informed.
pub trait Report {
    /// Reports that `action`, e.g. `HOME`, is starting on a printer.
    fn progress(&mut self, entry: &DeviceEntry, action: &str) -> io::Result<()>;

    /// Shows a document that would have been sent. Used in dry runs.
    fn document(&mut self, document: &CommandDocument) -> io::Result<()>;

    /// Shows a pause that would have happened. Used in dry runs.
    fn wait(&mut self, duration: Duration) -> io::Result<()>;

    /// Reports that a printer finished successfully.
    fn ok(&mut self, entry: &DeviceEntry) -> io::Result<()>;

    /// Reports that a printer failed.
    fn failed(&mut self, entry: &DeviceEntry, error: &anyhow::Error) -> io::Result<()>;
}

/// The real, production-ready [Report] implementation. Uses the real stdout.
#[derive(Clone, Debug, Default)]
pub struct Reporter;

impl Report for Reporter {
    fn progress(&mut self, entry: &DeviceEntry, action: &str) -> io::Result<()> {
        _progress(io::stdout().lock(), entry, action)
    }

    fn document(&mut self, document: &CommandDocument) -> io::Result<()> {
        _document(io::stdout().lock(), document)
    }

    fn wait(&mut self, duration: Duration) -> io::Result<()> {
        _wait(io::stdout().lock(), duration)
    }

    fn ok(&mut self, entry: &DeviceEntry) -> io::Result<()> {
        _ok(io::stdout().lock(), entry)
    }

    fn failed(&mut self, entry: &DeviceEntry, error: &anyhow::Error) -> io::Result<()> {
        _failed(io::stdout().lock(), entry, error)
    }
}

/// `[1] left: HOME`
pub fn _progress(mut out: impl Write, entry: &DeviceEntry, action: &str) -> io::Result<()> {
    writeln!(out, "[{}] {}: {action}", entry.id, entry.name)
}

/// The document's JSON on a line of its own.
pub fn _document(mut out: impl Write, document: &CommandDocument) -> io::Result<()> {
    let json = document.to_json().map_err(io::Error::other)?;
    writeln!(out, "{json}")
}

/// `wait 3.0s`
pub fn _wait(mut out: impl Write, duration: Duration) -> io::Result<()> {
    writeln!(out, "wait {}s", seconds(duration))
}

/// Formats seconds as the shortest decimal that round-trips, keeping at least one decimal place
/// (`3.0`, `2.5`). Below 1e-4 and from 1e16 up, scientific notation is used with a signed,
/// two-digit exponent: `1e-05`, `1.5e+16`.
fn seconds(duration: Duration) -> String {
    // Debug switches to scientific notation at the same magnitudes, but writes `1e-5`.
    let debug = format!("{:?}", duration.as_secs_f64());
    match debug.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exponent) => format!("{mantissa}e{exponent:+03}"),
            Err(_) => debug,
        },
        None => debug,
    }
}

/// `[1] OK`
pub fn _ok(mut out: impl Write, entry: &DeviceEntry) -> io::Result<()> {
    writeln!(out, "[{}] OK", entry.id)
}

/// `[1] FAILED: <error and its causes>`
pub fn _failed(mut out: impl Write, entry: &DeviceEntry, error: &anyhow::Error) -> io::Result<()> {
    writeln!(out, "[{}] FAILED: {error:#}", entry.id)
}

/// How a single printer's run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    Failed(String),

    /// Nothing was sent, e.g. in a dry run.
    Skipped(String),
}

/// The [Status] of one requested printer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub id: DeviceId,
    pub status: Status,
}

/// Every [RunOutcome] of a run, in execution order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    outcomes: Vec<RunOutcome>,
}

impl Summary {
    pub fn push(&mut self, outcome: RunOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[RunOutcome] {
        &self.outcomes
    }

    /// The number of printers with [Status::Failed].
    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, Status::Failed(_)))
    }

    /// The number of printers with [Status::Ok].
    pub fn succeeded(&self) -> usize {
        self.count(|status| matches!(status, Status::Ok))
    }

    /// The number of printers with [Status::Skipped].
    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, Status::Skipped(_)))
    }

    /// True if no printer failed. Skipped printers don't count as failures.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, predicate: impl Fn(&Status) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }
}
