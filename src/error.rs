// src/error.rs

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the gateway client and its transport.
///
/// The taxonomy is flat: a failure is either about the link itself
/// (`Connection`), about one specific call made over an established link
/// (`Request`), or an elapsed deadline (`Timeout`). Variants carry string
/// causes so a shared in-flight connect attempt can hand the same error to
/// every caller that joined it.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The downstream gateway could not be reached or failed its liveness probe.
    #[error("connection error: {0}")]
    Connection(String),

    /// A call failed after a connection existed: non-success HTTP status,
    /// a JSON-RPC error payload, a rate-limit rejection, an unsupported
    /// operation, or an undecodable result.
    #[error("request failed: {message}")]
    Request {
        message: String,
        /// HTTP status code, when the failure was a non-2xx response.
        status: Option<u16>,
    },

    /// A caller-imposed deadline elapsed before the call completed.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl Error {
    pub fn connection(msg: impl Into<String>) -> Self {
        Error::Connection(msg.into())
    }

    pub fn request(msg: impl Into<String>) -> Self {
        Error::Request {
            message: msg.into(),
            status: None,
        }
    }

    pub fn request_with_status(msg: impl Into<String>, status: u16) -> Self {
        Error::Request {
            message: msg.into(),
            status: Some(status),
        }
    }

    /// Rejection from the client's own rate limiter.
    pub fn rate_limited() -> Self {
        Error::request("rate limit exceeded")
    }

    /// An operation the downstream gateway does not support. Raised before
    /// any dispatch so callers get an immediate signal instead of a
    /// confusing method-not-found from the server.
    pub fn unsupported(operation: &str) -> Self {
        Error::request(format!(
            "operation '{operation}' is not supported by the MCP gateway"
        ))
    }

    /// Whether a caller-side retry of the failed call is worth attempting.
    ///
    /// Connection and timeout failures are transient by nature. Request
    /// failures are final except for rate-limit rejections and messages the
    /// server explicitly marks as transient.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Connection(_) | Error::Timeout(_) => true,
            Error::Request { message, .. } => {
                let msg = message.to_ascii_lowercase();
                msg.contains("rate limit")
                    || msg.contains("temporarily unavailable")
                    || msg.contains("try again")
            }
        }
    }
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, Error>;
