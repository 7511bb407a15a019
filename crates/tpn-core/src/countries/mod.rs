//! Country resolver: list exit countries offered by a validator.

mod names;

use crate::client::{ValidatorClient, COUNTRIES_PATH};
use crate::error::ApiError;
use crate::reporter::{report_error, Reporter};
use crate::transport::HttpTransport;
use crate::wire;
use serde::{Deserialize, Serialize};

/// An exit country: ISO 3166-1 alpha-2 code plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

impl Country {
    /// Builds a country, resolving the name from the static table.
    pub fn from_code(code: impl Into<String>) -> Self {
        let code = code.into();
        let name = display_name(&code).to_string();
        Country { code, name }
    }
}

/// Display name for `code`, if the table has one.
pub fn country_name(code: &str) -> Option<&'static str> {
    names::COUNTRY_NAMES
        .binary_search_by(|(c, _)| (*c).cmp(code))
        .ok()
        .map(|i| names::COUNTRY_NAMES[i].1)
}

/// Display name for `code`, falling back to the code itself.
pub fn display_name(code: &str) -> &str {
    country_name(code).unwrap_or(code)
}

/// All known `(code, name)` pairs, sorted by code.
pub fn known_countries() -> &'static [(&'static str, &'static str)] {
    names::COUNTRY_NAMES
}

/// Fetches the validator's country list.
///
/// Never fails: any error is reported through `reporter` and an empty list is
/// returned. Order follows the response.
pub async fn fetch_countries<T: HttpTransport>(
    client: &ValidatorClient<T>,
    validator: &str,
    reporter: &dyn Reporter,
) -> Vec<Country> {
    match try_fetch_countries(client, validator).await {
        Ok(countries) => {
            tracing::info!(validator, count = countries.len(), "fetched countries");
            countries
        }
        Err(e) => {
            report_error(reporter, "fetch countries", &e);
            Vec::new()
        }
    }
}

async fn try_fetch_countries<T: HttpTransport>(
    client: &ValidatorClient<T>,
    validator: &str,
) -> Result<Vec<Country>, ApiError> {
    let settings = client.settings();
    let url = settings.endpoint(validator, COUNTRIES_PATH, &[])?;
    let body = client.get_json(url, settings.countries_timeout).await?;
    let codes: Vec<String> = wire::decode(body)?;
    Ok(codes.into_iter().map(Country::from_code).collect())
}
