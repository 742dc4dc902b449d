use std::fmt;

use thiserror::Error;
use url::Url;

use crate::api::{CategoryDto, ListingDto};

pub type Epoch = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Body of a 2xx response; empty for every other status.
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    RedirectLimitExceeded,
    Connect,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Body,
    Request,
}

/// A request that did not produce an HTTP status at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportFailure,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Timeout => write!(f, "timeout"),
            TransportFailure::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            TransportFailure::Connect => write!(f, "connection failed"),
            TransportFailure::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            TransportFailure::Body => write!(f, "body read failed"),
            TransportFailure::Request => write!(f, "request failed"),
        }
    }
}

/// Outcome classes of a resilient fetch. Callers branch on this, never on
/// the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 4xx. Never retried.
    ClientError(u16),
    /// 5xx on the last allowed attempt.
    ServerError(u16),
    /// Transport failure on the last allowed attempt.
    Network,
    /// The caller cancelled. Not a user-visible failure.
    Cancelled,
    /// 1xx, 3xx or any status outside 100..=599. Never retried.
    UnexpectedStatus(u16),
    /// A 2xx body that is not the expected JSON shape.
    Decode,
    InvalidUrl,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::ClientError(code) => write!(f, "client error {code}"),
            FailureKind::ServerError(code) => write!(f, "server error {code}"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::UnexpectedStatus(code) => write!(f, "unexpected status {code}"),
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
    /// Number of requests issued before giving up.
    pub attempts: u32,
    /// Last transport failure, for `FailureKind::Network`.
    #[source]
    pub last_error: Option<TransportError>,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>, attempts: u32) -> Self {
        Self {
            kind,
            message: message.into(),
            attempts,
            last_error: None,
        }
    }

    pub(crate) fn cancelled(attempts: u32) -> Self {
        Self::new(FailureKind::Cancelled, "request cancelled", attempts)
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == FailureKind::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    CategoriesLoaded(Result<Vec<CategoryDto>, FetchError>),
    /// A listing epoch settled. Cancelled epochs never produce this.
    ListingSettled {
        epoch: Epoch,
        url: Url,
        result: Result<ListingDto, FetchError>,
    },
}
