//! Errors returned by [`PathService`](crate::PathService) implementations.

use thiserror::Error;

/// Why a path request failed.
///
/// Callers degrade every variant to "no path"; the distinction only matters
/// for diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathRequestError {
    /// The request never got a response (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned HTTP {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, for the log.
        body: String,
    },

    /// The response body was not a valid path document.
    #[error("malformed response: {0}")]
    Decode(String),
}
