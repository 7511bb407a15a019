//! CLI for listing validator countries and fetching WireGuard configs.

mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::fmt;
use std::path::PathBuf;
use tpn_core::client::{ClientSettings, TargetMode};
use tpn_core::config::{self, TpnConfig};
use tpn_core::generate::ConfigFormat;

use commands::{run_completions, run_countries, run_generate, run_save, GenerateArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tpn")]
#[command(about = "List validator exit countries and download WireGuard configs", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Overrides for values from config.toml.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Validator API base URL (or proxy). Use `{validator}` with --host-mode.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Address the validator through the base URL instead of `?target=`.
    #[arg(long, global = true)]
    pub host_mode: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List exit countries offered by a validator.
    Countries {
        /// Validator address or target id (defaults to `default_validator`).
        validator: Option<String>,
    },

    /// Generate a WireGuard config for an exit country.
    Generate {
        /// Validator address or target id (defaults to `default_validator`).
        validator: Option<String>,

        /// Exit country (ISO 3166-1 alpha-2 code).
        #[arg(long, short = 'c')]
        country: String,

        /// Lease duration in minutes.
        #[arg(long, value_name = "MINUTES")]
        lease_minutes: Option<u32>,

        /// Output format requested from the validator: text or json.
        #[arg(long)]
        format: Option<ConfigFormat>,

        /// Save the generated config as tpn.conf.
        #[arg(long)]
        save: bool,

        /// Directory to save tpn.conf into (default: current directory).
        #[arg(long, value_name = "DIR", requires = "save")]
        dir: Option<PathBuf>,
    },

    /// Save an existing config (file path or `-` for stdin) as tpn.conf.
    Save {
        /// Config file to read, or `-` for stdin.
        input: String,

        /// Directory to save tpn.conf into (default: current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl GlobalArgs {
    /// Client settings from config, with command-line overrides applied.
    pub fn client_settings(&self, cfg: &TpnConfig) -> ClientSettings {
        let mut settings = cfg.client_settings();
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if self.host_mode {
            settings.target_mode = TargetMode::Host;
        }
        settings
    }
}

/// The failure was already shown as an error notification; exit non-zero
/// without printing it again.
#[derive(Debug)]
pub struct AlreadyReported;

impl fmt::Display for AlreadyReported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failure already reported")
    }
}

impl std::error::Error for AlreadyReported {}

/// Text to print for a failed command, or `None` if the user already saw it.
pub fn exit_message(err: &anyhow::Error) -> Option<String> {
    if err.is::<AlreadyReported>() {
        None
    } else {
        Some(format!("tpn error: {:#}", err))
    }
}

/// Picks the validator from the argument or the configured default.
pub fn resolve_validator(arg: Option<String>, cfg: &TpnConfig) -> Result<String> {
    arg.or_else(|| cfg.default_validator.clone())
        .filter(|v| !v.trim().is_empty())
        .context("no validator given and no default_validator in config.toml")
}

fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(d) => Ok(d),
        None => Ok(std::env::current_dir()?),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        if let CliCommand::Completions { shell } = cli.command {
            run_completions(shell);
            return Ok(());
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let settings = cli.global.client_settings(&cfg);

        match cli.command {
            CliCommand::Countries { validator } => {
                let validator = resolve_validator(validator, &cfg)?;
                run_countries(settings, &validator).await?;
            }
            CliCommand::Generate {
                validator,
                country,
                lease_minutes,
                format,
                save,
                dir,
            } => {
                let args = GenerateArgs {
                    validator: resolve_validator(validator, &cfg)?,
                    country,
                    lease_minutes: lease_minutes.unwrap_or(cfg.default_lease_minutes),
                    format: format.unwrap_or(cfg.default_format),
                    save_dir: if save { Some(resolve_dir(dir)?) } else { None },
                };
                run_generate(settings, args).await?;
            }
            CliCommand::Save { input, dir } => {
                run_save(&input, &resolve_dir(dir)?)?;
            }
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
