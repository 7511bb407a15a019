//! Validator client: endpoint building and deadline-bounded JSON GETs.
//!
//! Two deployment schemes are supported. In `query` mode every request goes
//! to a fixed base (typically a proxy) and the validator is passed as the
//! `target` query parameter. In `host` mode the base URL contains a
//! `{validator}` placeholder that is replaced by the validator address.

use crate::deadline::run_with_deadline;
use crate::error::ApiError;
use crate::transport::{CurlTransport, HttpTransport};
use crate::wire;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/proxy";
pub const COUNTRIES_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const GENERATE_TIMEOUT: Duration = Duration::from_millis(100_000);
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Placeholder substituted with the validator address in `host` mode.
pub const VALIDATOR_PLACEHOLDER: &str = "{validator}";

pub const COUNTRIES_PATH: &str = "api/config/countries";
pub const NEW_CONFIG_PATH: &str = "api/config/new";

/// How the validator is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMode {
    /// Fixed base URL, validator in `?target=`.
    #[default]
    Query,
    /// Validator substituted into the base URL.
    Host,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub target_mode: TargetMode,
    pub countries_timeout: Duration,
    pub generate_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            target_mode: TargetMode::Query,
            countries_timeout: COUNTRIES_TIMEOUT,
            generate_timeout: GENERATE_TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

impl ClientSettings {
    /// Builds `{base}/{path}?[target=validator&]query...` for `validator`.
    pub fn endpoint(
        &self,
        validator: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Url, ApiError> {
        let base = match self.target_mode {
            TargetMode::Query => self.base_url.clone(),
            TargetMode::Host => {
                if !self.base_url.contains(VALIDATOR_PLACEHOLDER) {
                    return Err(ApiError::InvalidUrl(format!(
                        "base URL {} has no {} placeholder",
                        self.base_url, VALIDATOR_PLACEHOLDER
                    )));
                }
                self.base_url.replace(VALIDATOR_PLACEHOLDER, validator)
            }
        };

        let mut url =
            Url::parse(&base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(format!("{base}: cannot be a base URL")))?;
            segments.pop_if_empty();
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }

        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(query.len() + 1);
        if self.target_mode == TargetMode::Query {
            pairs.push(("target", validator));
        }
        pairs.extend_from_slice(query);
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

/// Client for one validator deployment. Cheap to clone.
#[derive(Debug)]
pub struct ValidatorClient<T = CurlTransport> {
    transport: Arc<T>,
    settings: ClientSettings,
}

impl<T> Clone for ValidatorClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            settings: self.settings.clone(),
        }
    }
}

impl ValidatorClient<CurlTransport> {
    pub fn new(settings: ClientSettings) -> Self {
        let transport = CurlTransport::new(settings.connect_timeout);
        Self::with_transport(transport, settings)
    }
}

impl<T: HttpTransport> ValidatorClient<T> {
    pub fn with_transport(transport: T, settings: ClientSettings) -> Self {
        Self {
            transport: Arc::new(transport),
            settings,
        }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GETs `url` within `timeout` and parses the 2xx body as JSON.
    ///
    /// The blocking transport runs on tokio's blocking pool; if the deadline
    /// fires first the transfer is aborted through the abort signal.
    pub async fn get_json(&self, url: Url, timeout: Duration) -> Result<Value, ApiError> {
        tracing::debug!(url = %url, timeout_ms = timeout.as_millis() as u64, "GET");
        let transport = Arc::clone(&self.transport);
        let response = run_with_deadline(timeout, |abort| async move {
            tokio::task::spawn_blocking(move || transport.get(&url, timeout, &abort))
                .await
                .map_err(|e| ApiError::Transport(format!("transport task failed: {e}")))?
        })
        .await?;

        if !response.is_success() {
            return Err(ApiError::HttpStatus(response.status));
        }
        wire::parse_body(&response.body)
    }
}
