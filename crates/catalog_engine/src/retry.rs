//! Retry-with-backoff around a single [`Transport`] request.
use std::time::Duration;

use catalog_logging::{catalog_debug, catalog_warn};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{FailureKind, FetchError, Transport, TransportError, TransportResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts are `max_retries + 1`.
    pub max_retries: u32,
    /// Delay before the first retry. Doubles after every retry.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay slept before retry number `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    ClientError,
    ServerError,
    Unexpected,
}

pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        400..=499 => StatusClass::ClientError,
        500..=599 => StatusClass::ServerError,
        _ => StatusClass::Unexpected,
    }
}

/// A successful response and the attempts it took.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub response: TransportResponse,
    pub attempts: u32,
}

enum Retriable {
    Server(u16),
    Transport(TransportError),
}

/// Issues `url` through `transport`, retrying 5xx responses and transport
/// failures with exponential backoff.
///
/// 4xx and unexpected statuses fail on the first attempt. Cancellation is
/// observed both while a request is in flight and while backing off, and is
/// reported as [`FailureKind::Cancelled`] without further attempts.
pub async fn fetch_with_retry(
    transport: &dyn Transport,
    url: &Url,
    cancel: &CancellationToken,
    policy: RetryPolicy,
) -> Result<Fetched, FetchError> {
    let mut attempt: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(FetchError::cancelled(attempt));
        }
        attempt += 1;
        catalog_debug!("GET {} attempt={}", url, attempt);

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::cancelled(attempt)),
            outcome = transport.get(url) => outcome,
        };

        let failure = match outcome {
            Ok(response) => match classify_status(response.status) {
                StatusClass::Success => {
                    return Ok(Fetched {
                        response,
                        attempts: attempt,
                    })
                }
                StatusClass::ClientError => {
                    return Err(FetchError::new(
                        FailureKind::ClientError(response.status),
                        format!("request failed with status {}", response.status),
                        attempt,
                    ));
                }
                StatusClass::Unexpected => {
                    return Err(FetchError::new(
                        FailureKind::UnexpectedStatus(response.status),
                        format!("unexpected status {}", response.status),
                        attempt,
                    ));
                }
                StatusClass::ServerError => Retriable::Server(response.status),
            },
            Err(err) => Retriable::Transport(err),
        };

        if attempt > policy.max_retries {
            return Err(exhausted(failure, attempt));
        }

        let delay = policy.delay_for(attempt - 1);
        match &failure {
            Retriable::Server(status) => catalog_warn!(
                "GET {} returned {}; retrying in {:?} (attempt {}/{})",
                url,
                status,
                delay,
                attempt,
                policy.max_retries + 1
            ),
            Retriable::Transport(err) => catalog_warn!(
                "GET {} failed: {}; retrying in {:?} (attempt {}/{})",
                url,
                err,
                delay,
                attempt,
                policy.max_retries + 1
            ),
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::cancelled(attempt)),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

fn exhausted(failure: Retriable, attempts: u32) -> FetchError {
    match failure {
        Retriable::Server(status) => FetchError::new(
            FailureKind::ServerError(status),
            format!("server error ({status}), retries exhausted after {attempts} attempts"),
            attempts,
        ),
        Retriable::Transport(err) => {
            let mut error = FetchError::new(
                FailureKind::Network,
                format!(
                    "network error or server unavailable, retries exhausted after {attempts} attempts: {err}"
                ),
                attempts,
            );
            error.last_error = Some(err);
            error
        }
    }
}
