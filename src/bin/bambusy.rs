use bambusy::cli::{self, Cli};
use bambusy::error::exit_code;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match cli::run(cli).await {
        Ok(()) => ExitCode::from(exit_code::SUCCESS),
        Err(err) => {
            if let Err(print_err) = cli::print_error(io::stdout().lock(), &err) {
                tracing::error!(error = %print_err, "could not print error");
            }
            ExitCode::from(err.exit_code())
        }
    }
}

/// Logs go to stderr so that stdout only carries the printers' progress.
fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
