//! Command-line interface of the `bambusy` binary.
//!
//! Parsing is done by [Cli]; [run] carries out the parsed command and [print_error] shows the user
//! why an invocation failed.

use crate::config::{load_roster, Roster, DEFAULT_CONFIG_PATH};
use crate::core::target::{parse_ids, select};
use crate::core::{CalibrationOptions, Plan};
use crate::error::Error;
use crate::run_plan::{run_plan, RunOptions, Timing};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Home and calibrate a fleet of Bambu printers over the local network.
#[derive(Debug, Parser)]
#[command(
    name = "bambusy",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Printer roster (JSON, or YAML with a .yaml/.yml extension)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Seconds to wait after connecting before sending commands
    #[arg(long, default_value = "2.0", value_parser = parse_seconds, global = true)]
    pub connect_wait: Duration,

    /// Seconds to wait after the last command before disconnecting
    #[arg(long, default_value = "1.0", value_parser = parse_seconds, global = true)]
    pub post_wait: Duration,

    /// Print the commands that would be sent without connecting to any printer
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity on stderr (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl GlobalOpts {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            timing: Timing {
                connect_wait: self.connect_wait,
                post_wait: self.post_wait,
            },
            dry_run: self.dry_run,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the printers in the roster
    List,

    /// Home the axes of the selected printers
    Home(HomeArgs),

    /// Home the selected printers, then run calibration
    Calibrate(CalibrateArgs),
}

#[derive(Debug, Args)]
pub struct HomeArgs {
    /// Comma-separated printer IDs, e.g. 1,2,5
    #[arg(long)]
    pub printers: String,
}

#[derive(Debug, Args)]
pub struct CalibrateArgs {
    /// Comma-separated printer IDs, e.g. 1,2,5
    #[arg(long)]
    pub printers: String,

    /// Run bed leveling
    #[arg(long)]
    pub bed_leveling: bool,

    /// Run vibration compensation
    #[arg(long)]
    pub vibration: bool,

    /// Run motor noise cancellation
    #[arg(long)]
    pub motor_noise: bool,

    /// Only home, skipping calibration
    #[arg(long)]
    pub home_only: bool,

    /// Seconds to wait between homing and calibration
    #[arg(long, default_value = "3.0", value_parser = parse_seconds)]
    pub calibration_delay: Duration,
}

impl CalibrateArgs {
    pub fn options(&self) -> CalibrationOptions {
        CalibrationOptions {
            bed_leveling: self.bed_leveling,
            vibration: self.vibration,
            motor_noise: self.motor_noise,
        }
    }
}

/// Parses a non-negative, finite number of seconds such as `2`, `0.5` or `3.0`.
fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let seconds: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{raw:?} is not a number of seconds"))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("{raw:?} must be a non-negative, finite number of seconds"))
}

/// Carries out `cli.command`.
///
/// Per-printer failures are shown as they happen; if any printer failed, this returns
/// [Error::TargetsFailed] once every printer has had its turn.
pub async fn run(cli: Cli) -> Result<(), Error> {
    let roster = load_roster(&cli.global.config)?;
    let options = cli.global.run_options();

    let (printers, plan) = match &cli.command {
        Command::List => return list(io::stdout().lock(), &roster),
        Command::Home(args) => (&args.printers, None),
        Command::Calibrate(args) => (&args.printers, Some(args)),
    };

    let requested = parse_ids(printers)?;
    let targets = select(&roster, &requested)?;
    let plan = match plan {
        None => Plan::home(),
        Some(args) => Plan::calibrate(args.options(), args.home_only, args.calibration_delay)?,
    };
    tracing::debug!(?plan, targets = targets.len(), ?options, "running plan");

    let summary = run_plan(&plan, &targets, options).await;
    if summary.is_success() {
        Ok(())
    } else {
        Err(Error::TargetsFailed {
            failed: summary.failed(),
        })
    }
}

/// Writes every roster entry in roster order. An empty roster is an error.
pub fn list(mut out: impl Write, roster: &Roster) -> Result<(), Error> {
    if roster.is_empty() {
        return Err(Error::EmptyRoster);
    }
    writeln!(out, "Configured printers:")?;
    for entry in roster.entries() {
        writeln!(
            out,
            "  {}: {} ({}, serial: {})",
            entry.id, entry.name, entry.host, entry.serial
        )?;
    }
    Ok(())
}

/// Explains `err` to the user.
///
/// Failed printers were already reported one by one, so [Error::TargetsFailed] is only logged.
pub fn print_error(mut out: impl Write, err: &Error) -> io::Result<()> {
    match err {
        Error::Config(err) => writeln!(out, "Config error: {err}"),
        Error::EmptyRoster | Error::NothingToCalibrate(_) => writeln!(out, "{err}"),
        Error::TargetsFailed { failed } => {
            tracing::warn!(failed, "some printers failed");
            Ok(())
        }
        _ => writeln!(out, "Error: {err}"),
    }
}
