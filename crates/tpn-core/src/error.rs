//! Error taxonomy for validator requests.
//!
//! `Display` of each variant is the message presented to the user; the
//! wrapped detail (curl text, serde text) only shows up in diagnostic logs.

use thiserror::Error;

/// Shown when the deadline fires before the validator answers.
pub const TIMEOUT_MESSAGE: &str = "Request timeout: Validator did not respond in time";

/// Shown for connection-level failures (refused, DNS, reset).
pub const NETWORK_MESSAGE: &str =
    "Network error: Unable to connect to validator. Please ensure the validator is running and accessible.";

/// Shown when an envelope response reports failure without an error text.
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-side deadline elapsed (or curl's own timeout fired).
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,
    /// Connection refused, host not resolved, connection reset, empty reply.
    #[error("{}", NETWORK_MESSAGE)]
    Network(String),
    /// Validator answered with a non-2xx status.
    #[error("HTTP error! Status: {0}")]
    HttpStatus(u32),
    /// Envelope with `success: false` or no `data`.
    #[error("{}", .0.as_deref().unwrap_or(REQUEST_FAILED_MESSAGE))]
    RequestFailed(Option<String>),
    /// Body was not the JSON shape we expect.
    #[error("{0}")]
    Malformed(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// Any other transport failure; carries curl's text.
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout)
    }

    /// Message suitable for a user-facing notification.
    pub fn presentable_message(&self) -> String {
        self.to_string()
    }
}
