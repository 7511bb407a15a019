//! `tpn countries [validator]` – list exit countries.

use crate::cli::AlreadyReported;
use anyhow::{bail, Result};
use tpn_core::client::{ClientSettings, ValidatorClient};
use tpn_core::countries::fetch_countries;
use tpn_core::reporter::ConsoleReporter;

pub async fn run_countries(settings: ClientSettings, validator: &str) -> Result<()> {
    let client = ValidatorClient::new(settings);
    let reporter = ConsoleReporter::new();
    let countries = fetch_countries(&client, validator, &reporter).await;
    if countries.is_empty() {
        if reporter.errors_reported() > 0 {
            return Err(AlreadyReported.into());
        }
        bail!("validator {validator} offers no countries");
    }
    println!("{:<6} {}", "CODE", "COUNTRY");
    for c in countries {
        println!("{:<6} {}", c.code, c.name);
    }
    Ok(())
}
