//! Plain-data request and response types exchanged with a transport.
//!
//! # Design
//! Sessions describe each round-trip as an `HttpRequest` and receive a
//! `RawResponse` back. Neither type performs I/O; the transport owns the
//! socket work. All fields use owned types so values move freely onto a
//! blocking pool or into a test double.

use std::fmt;
use std::time::Duration;

/// Structured JSON value used for request and response bodies.
pub type JsonType = serde_json::Value;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Options,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport options passed through untouched by the session layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    /// Overrides the transport's global timeout for this request only.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Body of a `POST`, `PUT` or `PATCH`.
///
/// Both representations are optional and may be set together; the transport
/// decides how to combine them (`UreqTransport` sends `text` when present).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub text: Option<String>,
    pub json: Option<JsonType>,
}

impl Payload {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            json: None,
        }
    }

    pub fn json(json: JsonType) -> Self {
        Self {
            text: None,
            json: Some(json),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_json(mut self, json: JsonType) -> Self {
        self.json = Some(json);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.json.is_none()
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub payload: Payload,
    pub options: RequestOptions,
}

/// The result of one round-trip as reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Transport-reported success heuristic, independent of any status policy.
    pub ok: bool,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    /// Builds a response whose `ok` flag is `status < 400`.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            ok: status < 400,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
