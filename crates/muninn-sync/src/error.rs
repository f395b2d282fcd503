//! Error types for the sync engine
//!
//! `FetchError` is the failure taxonomy of a single bounded attempt:
//! deadline exceeded, non-2xx status, undecodable body, or transport
//! failure. The retry layer treats all of them identically; the
//! distinction exists for reporting and for opt-in status predicates.

use camino::Utf8PathBuf;
use muninn_core::retry::{HttpStatusError, RetryError};
use thiserror::Error;

/// Failure of a single bounded fetch attempt
#[derive(Error, Debug)]
pub enum FetchError {
    /// The per-attempt deadline fired before a response arrived
    #[error("request to {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// The endpoint answered with a non-2xx status
    #[error("{endpoint} returned HTTP {status}")]
    Http { endpoint: String, status: u16 },

    /// The response body is not valid JSON
    #[error("response body is not valid JSON: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    /// Transport-level failure (connect, DNS, TLS, read)
    #[error("network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub(crate) fn timeout(endpoint: &str, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            endpoint: endpoint.to_owned(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Whether this failure was the attempt deadline firing
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl HttpStatusError for FetchError {
    fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure applying a transform to a decoded payload
#[derive(Error, Debug)]
pub enum TransformError {
    /// The payload is neither a JSON array nor an object
    #[error("expected a JSON array or object payload, got {kind}")]
    UnsupportedPayload { kind: &'static str },

    /// A field-map transform met a non-object record
    #[error("record at index {index} is not a JSON object")]
    NotAnObject { index: usize },
}

/// Failure persisting a record set
#[derive(Error, Debug)]
pub enum SinkError {
    /// Filesystem failure while writing the destination
    #[error("failed to write {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record set could not be serialized
    #[error("failed to serialize record set: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Source-level failure inside the batch loop
///
/// Any of these marks the source's outcome as failed; none of them
/// aborts the batch.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Fetching exhausted its retry budget (or was cut short)
    #[error(transparent)]
    Fetch(#[from] RetryError<FetchError>),

    /// The configured transform rejected the payload
    #[error("transform failed for source {name}: {source}")]
    Transform {
        name: String,
        #[source]
        source: TransformError,
    },

    /// The persistence sink failed
    #[error(transparent)]
    Sink(#[from] SinkError),
}
