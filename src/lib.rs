//! Home and calibrate a fleet of Bambu printers.
//!
//! # Program flow
//!
//! This section is meant for developers working on bambusy. If you only want to run it, see
//! `bambusy --help`.
//!
//! 1. The user invokes the `bambusy` binary, whose arguments are parsed by [cli::Cli].
//!
//! 2. The printer roster is loaded from a JSON or YAML file by [config::load_roster].
//!
//! 3. The requested printer IDs are parsed and resolved against the roster by
//!    [core::target]. Unknown IDs abort the run before any printer is contacted.
//!
//! 4. A [core::Plan] describes what to do to every printer: home, then optionally calibrate with
//!    the sub-tests encoded by [core::CalibrationOptions].
//!
//! 5. [run_plan] walks the selected printers one at a time, opening a session to each, publishing
//!    the plan's command documents and always closing the session afterward. Failures are
//!    contained to the printer they happened on.
//!
//! 6. The binary turns the run's [run_plan::report::Summary] into an exit status.

#[cfg(feature = "mqtt")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod run_plan;

#[cfg(feature = "mqtt")]
#[doc(inline)]
pub use run_plan::run_plan;
