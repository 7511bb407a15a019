use tpn_core::logging;

mod cli;

use crate::cli::{exit_message, CliCommand};

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("log file unavailable, logging to stderr: {:#}", err);
    }

    if let Err(err) = CliCommand::run_from_args().await {
        if let Some(message) = exit_message(&err) {
            eprintln!("{message}");
        }
        std::process::exit(1);
    }
}
