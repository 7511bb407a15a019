//! `tpn generate` – request a WireGuard config, optionally saving it.

use crate::cli::AlreadyReported;
use anyhow::Result;
use std::path::PathBuf;
use tpn_core::client::{ClientSettings, ValidatorClient};
use tpn_core::countries::display_name;
use tpn_core::download::download_config;
use tpn_core::generate::{generate_config, ConfigFormat, GenerateRequest};
use tpn_core::reporter::ConsoleReporter;

#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub validator: String,
    pub country: String,
    pub lease_minutes: u32,
    pub format: ConfigFormat,
    /// Where to save tpn.conf; `None` prints only.
    pub save_dir: Option<PathBuf>,
}

pub async fn run_generate(settings: ClientSettings, args: GenerateArgs) -> Result<()> {
    let client = ValidatorClient::new(settings);
    let country = args.country.trim().to_ascii_uppercase();
    let request = GenerateRequest {
        validator: args.validator,
        country,
        lease_minutes: args.lease_minutes,
        format: args.format,
    };
    eprintln!(
        "Requesting {} config for {} ({} min lease)...",
        request.format,
        display_name(&request.country),
        request.lease_minutes
    );

    let reporter = ConsoleReporter::new();
    let Some(config) = generate_config(&client, &request, &reporter).await else {
        return Err(AlreadyReported.into());
    };

    println!("{}", config.config);
    eprintln!("Expires at: {}", config.expires_at_display());

    if let Some(dir) = args.save_dir {
        download_config(&config.config, &dir, &reporter);
        if reporter.errors_reported() > 0 {
            return Err(AlreadyReported.into());
        }
    }
    Ok(())
}
