//! Blocking HTTP GET transport.
//!
//! Uses the curl crate (libcurl). Calls run on the blocking pool; the caller
//! supplies a total timeout and an [`AbortSignal`] polled from curl's
//! progress callback.

use crate::deadline::AbortSignal;
use crate::error::ApiError;
use std::time::Duration;
use url::Url;

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait HttpTransport: Send + Sync + 'static {
    /// Performs a GET. Must give up once `timeout` elapses or `abort` is raised.
    fn get(&self, url: &Url, timeout: Duration, abort: &AbortSignal)
        -> Result<HttpResponse, ApiError>;
}

/// libcurl-backed transport.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl HttpTransport for CurlTransport {
    fn get(
        &self,
        url: &Url,
        timeout: Duration,
        abort: &AbortSignal,
    ) -> Result<HttpResponse, ApiError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout.min(timeout))?;
        easy.timeout(timeout)?;
        easy.progress(true)?;

        let mut list = curl::easy::List::new();
        list.append("Accept: application/json")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            // Returning false aborts the transfer.
            transfer.progress_function(|_, _, _, _| !abort.is_aborted())?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        tracing::debug!(url = %url, status, bytes = body.len(), "GET complete");
        Ok(HttpResponse { status, body })
    }
}

impl From<curl::Error> for ApiError {
    fn from(e: curl::Error) -> Self {
        classify_curl_error(&e)
    }
}

/// Maps a curl error onto the request error taxonomy.
pub fn classify_curl_error(e: &curl::Error) -> ApiError {
    // The progress callback only aborts when the deadline has fired.
    if e.is_operation_timedout() || e.is_aborted_by_callback() {
        return ApiError::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ApiError::Network(e.to_string());
    }
    if e.is_url_malformed() || e.is_unsupported_protocol() {
        return ApiError::InvalidUrl(e.to_string());
    }
    ApiError::Transport(e.to_string())
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-process transport for unit tests.

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Answers every GET with the same canned response (or error).
    pub struct StaticTransport {
        status: u32,
        body: Vec<u8>,
        delay: Duration,
        fail_with_network: bool,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
    }

    impl StaticTransport {
        pub fn ok(body: &str) -> Self {
            Self::with_status(200, body)
        }

        pub fn with_status(status: u32, body: &str) -> Self {
            Self {
                status,
                body: body.as_bytes().to_vec(),
                delay: Duration::ZERO,
                fail_with_network: false,
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            }
        }

        pub fn unreachable() -> Self {
            Self {
                fail_with_network: true,
                ..Self::with_status(0, "")
            }
        }

        pub fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    impl HttpTransport for StaticTransport {
        fn get(
            &self,
            url: &Url,
            _timeout: Duration,
            abort: &AbortSignal,
        ) -> Result<HttpResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            let start = std::time::Instant::now();
            while start.elapsed() < self.delay {
                if abort.is_aborted() {
                    return Err(ApiError::Timeout);
                }
                std::thread::sleep(Duration::from_millis(5));
            }
            if self.fail_with_network {
                return Err(ApiError::Network("Couldn't connect to server".into()));
            }
            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }
}
