use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::{debug, error, warn};
use url::Url;

const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

/// Join a path segment onto a base URL regardless of trailing slashes.
pub(crate) fn join_segment(base: &Url, segment: &str) -> Result<Url, url::ParseError> {
    let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), segment);
    Url::parse(&joined)
}

/// Run a blocking HTTP request with bounded retries.
///
/// Throttling (429), server errors (5xx), and transport failures are
/// retried with exponential backoff; any other client error fails
/// immediately.
pub(crate) fn request_with_retry<F>(attempts: u32, mut request_fn: F) -> Result<String>
where
    F: FnMut() -> Result<String, ureq::Error>,
{
    let mut last_error = None;

    for attempt in 1..=attempts {
        debug!("HTTP request attempt {}/{}", attempt, attempts);

        match request_fn() {
            Ok(response_text) => {
                debug!("Request succeeded on attempt {}", attempt);
                return Ok(response_text);
            }
            Err(error) => {
                let should_retry = match &error {
                    ureq::Error::StatusCode(status) => {
                        if *status == 429 || *status >= 500 {
                            warn!(
                                "Retryable status {}, attempt {}/{}",
                                status, attempt, attempts
                            );
                            true
                        } else {
                            warn!("Client error (status {}), not retrying", status);
                            return Err(anyhow!("Client error: HTTP {}", status));
                        }
                    }
                    ureq::Error::ConnectionFailed
                    | ureq::Error::HostNotFound
                    | ureq::Error::Timeout(_)
                    | ureq::Error::Io(_) => {
                        warn!(
                            "Transport error: {}, attempt {}/{}",
                            error, attempt, attempts
                        );
                        true
                    }
                    _ => {
                        warn!("Non-retryable error: {}", error);
                        false
                    }
                };

                if !should_retry {
                    return Err(anyhow!("Non-retryable error: {}", error));
                }

                last_error = Some(anyhow!("Request error: {}", error));

                if attempt < attempts {
                    let delay_ms = EXPONENTIAL_BACKOFF_BASE.pow(attempt - 1) * 1000;
                    let delay = Duration::from_millis(delay_ms);
                    debug!("Waiting {:?} before retry", delay);
                    std::thread::sleep(delay);
                }
            }
        }
    }

    error!("All {} request attempts failed", attempts);
    Err(last_error.unwrap_or_else(|| anyhow!("Request failed after retries")))
}
