//! `tpn completions <shell>` – print shell completions.

use crate::cli::Cli;
use clap::CommandFactory;
use clap_complete::{generate, Shell};

pub fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "tpn", &mut std::io::stdout());
}
