//! Error types for the request executor.
//!
//! # Design
//! Every failure a call can produce is a variant of `RequestError` and is
//! returned to the caller. Transport failures keep their underlying cause so
//! callers can inspect it through `std::error::Error::source`. Non-2xx
//! responses land in `UnexpectedStatus` with the status code and the body
//! text for debugging.

use std::error::Error as StdError;

use thiserror::Error;

/// Result of a single executor operation.
pub type OperationResult<T> = Result<T, RequestError>;

/// Errors returned by `RequestExecutor` operations and the request builders.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The URL string is not an absolute `http`/`https` URL. No I/O was attempted.
    #[error("invalid URL: {0:?}")]
    InvalidUrl(String),

    /// The round-trip failed below HTTP: DNS, TLS, timeout, connection reset.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered 2xx but sent no body.
    #[error("empty response body")]
    EmptyResponse,

    /// The server returned a non-2xx status.
    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body could not be decoded into the requested type.
    #[error("decoding response failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("encoding request failed: {0}")]
    Encode(#[source] serde_json::Error),
}

impl RequestError {
    /// Status code carried by `UnexpectedStatus`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A failure reported by a `Transport` before any HTTP response was received.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct TransportError {
    #[source]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

impl TransportError {
    pub fn new<E>(source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self {
            source: source.into(),
        }
    }
}
