//! Config generator: request a WireGuard peer configuration from a validator.

use crate::client::{ValidatorClient, NEW_CONFIG_PATH};
use crate::error::ApiError;
use crate::reporter::{report_error, Reporter};
use crate::transport::HttpTransport;
use crate::wire;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const GENERATED_MESSAGE: &str = "Config generated successfully!";

/// Output format requested from the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    #[default]
    Text,
    Json,
}

impl ConfigFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigFormat::Text => "text",
            ConfigFormat::Json => "json",
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ConfigFormat::Text),
            "json" => Ok(ConfigFormat::Json),
            other => Err(format!("unknown config format {other:?} (expected text or json)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub validator: String,
    /// Alpha-2 exit country.
    pub country: String,
    pub lease_minutes: u32,
    pub format: ConfigFormat,
}

/// A generated peer configuration and its expiry as sent by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireGuardConfig {
    pub config: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: Value,
}

impl WireGuardConfig {
    /// Expiry as plain text: strings unquoted, other values as JSON.
    pub fn expires_at_display(&self) -> String {
        match &self.expires_at {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeneratedPeer {
    peer_config: Value,
    expires_at: Value,
}

impl TryFrom<GeneratedPeer> for WireGuardConfig {
    type Error = ApiError;

    fn try_from(raw: GeneratedPeer) -> Result<Self, ApiError> {
        let config = match raw.peer_config {
            Value::String(s) => s,
            v @ (Value::Object(_) | Value::Array(_)) => v.to_string(),
            _ => return Err(ApiError::Malformed("invalid `peer_config` in response".into())),
        };
        if raw.expires_at.is_null() {
            return Err(ApiError::Malformed("missing field `expires_at`".into()));
        }
        Ok(WireGuardConfig {
            config,
            expires_at: raw.expires_at,
        })
    }
}

/// Requests a new configuration.
///
/// Never fails: on success a notification is emitted and the config returned;
/// on any error the failure is reported through `reporter` and `None` returned.
pub async fn generate_config<T: HttpTransport>(
    client: &ValidatorClient<T>,
    request: &GenerateRequest,
    reporter: &dyn Reporter,
) -> Option<WireGuardConfig> {
    match try_generate_config(client, request).await {
        Ok(config) => {
            tracing::info!(
                validator = %request.validator,
                country = %request.country,
                lease_minutes = request.lease_minutes,
                format = %request.format,
                "config generated"
            );
            reporter.notify_success(GENERATED_MESSAGE);
            Some(config)
        }
        Err(e) => {
            report_error(reporter, "generate config", &e);
            None
        }
    }
}

async fn try_generate_config<T: HttpTransport>(
    client: &ValidatorClient<T>,
    request: &GenerateRequest,
) -> Result<WireGuardConfig, ApiError> {
    let settings = client.settings();
    let lease = request.lease_minutes.to_string();
    let url = settings.endpoint(
        &request.validator,
        NEW_CONFIG_PATH,
        &[
            ("format", request.format.as_str()),
            ("geo", request.country.as_str()),
            ("lease_minutes", lease.as_str()),
        ],
    )?;
    let body = client.get_json(url, settings.generate_timeout).await?;
    let raw: GeneratedPeer = wire::decode(body)?;
    WireGuardConfig::try_from(raw)
}
