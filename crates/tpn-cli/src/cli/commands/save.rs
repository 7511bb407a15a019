//! `tpn save <file|->` – save an existing config as tpn.conf.

use crate::cli::AlreadyReported;
use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::Path;
use tpn_core::download::{config_path, download_config};
use tpn_core::reporter::ConsoleReporter;

pub fn run_save(input: &str, dir: &Path) -> Result<()> {
    let config = read_input(input)?;
    if config.trim().is_empty() {
        bail!("refusing to save an empty config");
    }
    let reporter = ConsoleReporter::new();
    download_config(&config, dir, &reporter);
    if reporter.errors_reported() > 0 {
        return Err(AlreadyReported.into());
    }
    println!("{}", config_path(dir).display());
    Ok(())
}

/// Reads the config text from `input`, or stdin when `input` is `-`.
pub(crate) fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read config from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
}
