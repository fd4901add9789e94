//! The seam between sessions and the component doing network I/O.
//!
//! # Design
//! A `Transport` is a reusable handle: it is opened once, may be given HTTP
//! Basic credentials once, sends any number of `HttpRequest`s and is closed
//! once. Sessions never retry or reinterpret a `TransportError`; it reaches
//! the caller as-is.

use std::time::Duration;

use async_trait::async_trait;

use crate::http::{HttpRequest, RawResponse};

/// Failures raised by a transport before a response could be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection error: {message}")]
    Connection { message: String },

    #[error("request timed out after {timeout:?}")]
    Timeout { timeout: Option<Duration> },

    #[error("TLS error: {message}")]
    Tls { message: String },

    #[error("protocol error: {message}")]
    Protocol { message: String },

    /// The blocking task running the request did not complete.
    #[error("request interrupted: {message}")]
    Interrupted { message: String },

    #[error("transport handle is not open")]
    Closed,
}

/// Network collaborator used by sessions.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Acquires whatever the handle needs before its first request.
    fn open(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Attaches HTTP Basic credentials to every subsequent request.
    fn set_basic_auth(&mut self, username: &str, password: &str);

    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError>;

    /// Releases the handle. Sessions call this exactly once.
    fn close(&mut self);
}
