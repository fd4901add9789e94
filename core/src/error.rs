//! Error types surfaced by sessions.
//!
//! # Design
//! Three failure classes reach the caller of a verb method and are kept
//! apart so callers can tell "the request could not complete" from "the
//! request completed but was rejected":
//! - `Transport` comes from the transport unchanged (connection, timeout, TLS).
//! - `Decode` is the `serde_json` error from a JSON accessor, raised lazily.
//! - `Response` is produced by `validate` and is the only error this crate
//!   defines on its own.

use crate::transport::TransportError;

/// A status code outside the allowed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP response contains some errors with '{status}' status! Reason: {body}")]
pub struct ResponseError {
    pub status: u16,
    pub body: String,
}

/// Any failure returned from a session verb or a response accessor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Response(#[from] ResponseError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// The rejected status code, if this is a `Response` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Response(err) => Some(err.status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_error_message_embeds_status_and_body() {
        let err = ResponseError {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP response contains some errors with '500' status! Reason: boom"
        );
    }

    #[test]
    fn status_is_only_reported_for_response_errors() {
        let rejected = Error::from(ResponseError {
            status: 404,
            body: String::new(),
        });
        assert_eq!(rejected.status(), Some(404));

        let transport = Error::from(TransportError::Closed);
        assert_eq!(transport.status(), None);
    }
}
