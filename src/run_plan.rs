//! Runs a [Plan] on each selected printer, one printer at a time.
//!
//! For each printer, in the order requested:
//!
//! 1. Report the printer and the action.
//! 2. In a dry run, show every [Step] and stop.
//! 3. Otherwise open a session and wait for it to settle.
//! 4. Run the steps: publish each document, pausing where the plan says to.
//! 5. Wait for the last command to settle and report OK.
//! 6. Close the session, whatever happened in steps 3 to 5.
//!
//! A failure on one printer is reported against that printer and the run moves on to the next.

pub mod client;
pub mod report;

use crate::config::DeviceEntry;
use crate::core::{Plan, PrintCommand, Step};
use anyhow::Context;
use client::{DeviceSession, ManageSession};
use report::{Report, RunOutcome, Status, Summary};
use std::time::Duration;
use tokio::time;

/// The progress label for the first step on every printer.
const HOME: &str = "HOME";

/// Pauses around each session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// How long to wait after opening a session before publishing.
    pub connect_wait: Duration,

    /// How long to wait after the last publish before closing the session.
    pub post_wait: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            connect_wait: Duration::from_secs(2),
            post_wait: Duration::from_secs(1),
        }
    }
}

/// How to run a [Plan].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub timing: Timing,

    /// Print what would be sent instead of connecting to anything.
    pub dry_run: bool,
}

/// Runs `plan` on `targets` over MQTT and prints progress to stdout.
#[cfg(feature = "mqtt")]
pub async fn run_plan(plan: &Plan, targets: &[&DeviceEntry], options: RunOptions) -> Summary {
    _run_plan(
        plan,
        targets,
        options,
        &mut client::MqttConnector,
        &mut report::Reporter,
    )
    .await
}

/// Runs `plan` on each of `targets` in order, using the given session manager and reporter.
///
/// Never fails as a whole: each printer's outcome is recorded in the returned [Summary].
pub async fn _run_plan<S, M, R>(
    plan: &Plan,
    targets: &[&DeviceEntry],
    options: RunOptions,
    sessions: &mut M,
    reporter: &mut R,
) -> Summary
where
    S: DeviceSession + Send,
    M: ManageSession<S> + Send,
    R: Report + Send,
{
    let mut summary = Summary::default();

    for entry in targets {
        let status = match run_host_plan(plan, entry, options, sessions, reporter).await {
            Ok(status) => status,
            Err(err) => {
                if let Err(report_err) = reporter.failed(entry, &err) {
                    tracing::error!(id = entry.id, error = %report_err, "could not report failure");
                }
                Status::Failed(format!("{err:#}"))
            }
        };
        tracing::info!(id = entry.id, ?status, "printer done");
        summary.push(RunOutcome {
            id: entry.id,
            status,
        });
    }

    tracing::info!(
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        skipped = summary.skipped(),
        "run complete"
    );
    summary
}

/// Runs `plan` on one printer. Any error is this printer's failure alone.
async fn run_host_plan<S, M, R>(
    plan: &Plan,
    entry: &DeviceEntry,
    options: RunOptions,
    sessions: &mut M,
    reporter: &mut R,
) -> anyhow::Result<Status>
where
    S: DeviceSession + Send,
    M: ManageSession<S> + Send,
    R: Report + Send,
{
    reporter.progress(entry, HOME)?;

    if options.dry_run {
        for step in plan.plan_for(entry) {
            match step {
                Step::Publish(document) => reporter.document(&document)?,
                Step::Wait(duration) => reporter.wait(duration)?,
            }
        }
        return Ok(Status::Skipped("dry run".to_string()));
    }

    let mut session = sessions
        .open(entry)
        .await
        .with_context(|| format!("connecting to {}:{}", entry.host, entry.port))?;

    let result = run_steps(plan, entry, options.timing, &mut session, reporter).await;

    // Close no matter how the steps went. A close error must not hide the steps' outcome.
    match session.close().await {
        Ok(()) => tracing::debug!(id = entry.id, "session closed"),
        Err(err) => tracing::debug!(
            id = entry.id,
            error = %format!("{err:#}"),
            "ignoring error while closing session"
        ),
    }

    result.map(|()| Status::Ok)
}

/// Everything that happens while a session is open.
async fn run_steps<S, R>(
    plan: &Plan,
    entry: &DeviceEntry,
    timing: Timing,
    session: &mut S,
    reporter: &mut R,
) -> anyhow::Result<()>
where
    S: DeviceSession + Send,
    R: Report + Send,
{
    // The session isn't ready to accept commands right away.
    time::sleep(timing.connect_wait).await;

    let topic = entry.request_topic();
    for step in plan.plan_for(entry) {
        match step {
            Step::Publish(document) => {
                if let PrintCommand::Calibration { option, .. } = document.print {
                    reporter.progress(entry, &format!("CALIBRATION option={option}"))?;
                }
                session.publish(&topic, &document).await?;
            }
            Step::Wait(duration) => time::sleep(duration).await,
        }
    }

    time::sleep(timing.post_wait).await;
    reporter.ok(entry)?;
    Ok(())
}
