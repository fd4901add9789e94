//! `Transport` backed by a blocking `ureq` agent.
//!
//! # Design
//! ureq is synchronous, so every request is moved onto Tokio's blocking pool
//! and awaited from there; the verb methods stay suspension points without
//! pulling an async HTTP stack in. Status codes are never treated as errors
//! here (`http_status_as_error(false)`): deciding which codes are acceptable
//! belongs to `validate`.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use ureq::typestate::{WithBody, WithoutBody};
use ureq::Agent;

use crate::config::TransportConfig;
use crate::http::{HttpMethod, HttpRequest, RawResponse};
use crate::transport::{Transport, TransportError};

/// HTTP transport over a pooled `ureq::Agent`.
///
/// Requires a Tokio runtime when sending.
pub struct UreqTransport {
    config: TransportConfig,
    agent: Option<Agent>,
    authorization: Option<SecretString>,
}

impl UreqTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            agent: None,
            authorization: None,
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.agent.is_some()
    }

    /// Header list for one request: defaults, user agent, auth, then caller headers.
    fn headers_for(&self, request: &HttpRequest) -> Vec<(String, String)> {
        let mut headers = self.config.default_headers.clone();
        headers.push(("user-agent".to_string(), self.config.user_agent.clone()));
        if let Some(auth) = &self.authorization {
            let value = auth.expose_secret().clone();
            headers.push(("authorization".to_string(), value));
        }
        headers.extend(request.options.headers.iter().cloned());
        headers
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("config", &self.config)
            .field("open", &self.is_open())
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        if self.agent.is_none() {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(self.config.timeout)
                .build()
                .new_agent();
            self.agent = Some(agent);
            debug!(timeout = ?self.config.timeout, "ureq agent opened");
        }
        Ok(())
    }

    fn set_basic_auth(&mut self, username: &str, password: &str) {
        let token = BASE64.encode(format!("{username}:{password}"));
        self.authorization = Some(SecretString::new(format!("Basic {token}")));
    }

    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        let agent = self.agent.clone().ok_or(TransportError::Closed)?;
        let headers = self.headers_for(&request);
        let timeout = request.options.timeout.or(self.config.timeout);

        let response = tokio::task::spawn_blocking(move || execute(&agent, request, headers))
            .await
            .map_err(|e| TransportError::Interrupted {
                message: e.to_string(),
            })?
            .map_err(|e| map_error(e, timeout))?;

        debug!(status = response.status, "response received");
        Ok(response)
    }

    fn close(&mut self) {
        if self.agent.take().is_some() {
            debug!("ureq agent closed");
        }
    }
}

/// Applies headers, query parameters and the per-request timeout.
fn decorate<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
    query: &[(String, String)],
    timeout: Option<Duration>,
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (name, value) in query {
        builder = builder.query(name, value);
    }
    if let Some(timeout) = timeout {
        builder = builder.config().timeout_global(Some(timeout)).build();
    }
    builder
}

fn execute(
    agent: &Agent,
    request: HttpRequest,
    headers: Vec<(String, String)>,
) -> Result<RawResponse, ureq::Error> {
    let HttpRequest {
        method,
        url,
        payload,
        options,
    } = request;
    let query = &options.query;
    let timeout = options.timeout;

    let (body, content_type) = match (payload.text, payload.json) {
        (Some(text), _) => (Some(text.into_bytes()), None),
        (None, Some(json)) => {
            let bytes = serde_json::to_vec(&json)
                .map_err(|e| ureq::Error::Io(e.into()))?;
            (Some(bytes), Some("application/json"))
        }
        (None, None) => (None, None),
    };

    let without_body = |builder: ureq::RequestBuilder<WithoutBody>| {
        decorate(builder, &headers, query, timeout).call()
    };
    let with_body = |builder: ureq::RequestBuilder<WithBody>| {
        let mut builder = decorate(builder, &headers, query, timeout);
        if let Some(content_type) = content_type {
            builder = builder.content_type(content_type);
        }
        match &body {
            Some(bytes) => builder.send(&bytes[..]),
            None => builder.send_empty(),
        }
    };

    let url = url.as_str();
    let mut response = match method {
        HttpMethod::Get => without_body(agent.get(url)),
        HttpMethod::Options => without_body(agent.options(url)),
        HttpMethod::Head => without_body(agent.head(url)),
        HttpMethod::Delete => without_body(agent.delete(url)),
        HttpMethod::Post => with_body(agent.post(url)),
        HttpMethod::Put => with_body(agent.put(url)),
        HttpMethod::Patch => with_body(agent.patch(url)),
    }?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| {
            let value = v.to_str().unwrap_or_default().to_string();
            (k.to_string(), value)
        })
        .collect();
    let body = response.body_mut().read_to_string()?;

    Ok(RawResponse {
        status,
        ok: status < 400,
        headers,
        body,
    })
}

fn map_error(err: ureq::Error, timeout: Option<Duration>) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout { timeout },
        ureq::Error::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => {
            TransportError::Timeout { timeout }
        }
        ureq::Error::Io(e) => TransportError::Connection {
            message: e.to_string(),
        },
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportError::Connection {
                message: err.to_string(),
            }
        }
        ureq::Error::Tls(_) | ureq::Error::Rustls(_) | ureq::Error::TlsRequired => {
            TransportError::Tls {
                message: err.to_string(),
            }
        }
        other => TransportError::Protocol {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Payload, RequestOptions};

    fn request() -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:1/".to_string(),
            payload: Payload::empty(),
            options: RequestOptions::new().header("x-trace", "abc"),
        }
    }

    #[test]
    fn basic_auth_header_is_base64_of_user_and_password() {
        let mut transport = UreqTransport::default();
        transport.set_basic_auth("superuser", "superpass");
        let headers = transport.headers_for(&request());
        assert!(headers.contains(&(
            "authorization".to_string(),
            "Basic c3VwZXJ1c2VyOnN1cGVycGFzcw==".to_string()
        )));
    }

    #[test]
    fn caller_headers_come_last() {
        let config = TransportConfig::new()
            .default_header("accept", "text/plain");
        let transport = UreqTransport::new(config);
        let headers = transport.headers_for(&request());
        assert_eq!(headers.first().map(|(k, _)| k.as_str()), Some("accept"));
        assert_eq!(headers.last().map(|(k, _)| k.as_str()), Some("x-trace"));
    }

    #[test]
    fn config_is_kept_as_given() {
        let config = TransportConfig::new()
            .timeout(Duration::from_secs(7))
            .user_agent("agent/1");
        let transport = UreqTransport::new(config);
        assert_eq!(transport.config().timeout, Some(Duration::from_secs(7)));
        assert_eq!(transport.config().user_agent, "agent/1");
    }

    #[test]
    fn tls_failures_map_to_tls() {
        let err = map_error(ureq::Error::Tls("certificate rejected"), None);
        assert_eq!(
            err,
            TransportError::Tls {
                message: "certificate rejected".to_string()
            }
        );
        let err = map_error(ureq::Error::TlsRequired, None);
        assert!(matches!(err, TransportError::Tls { .. }), "got {err:?}");
    }

    #[test]
    fn timeouts_carry_the_effective_timeout() {
        let timeout = Some(Duration::from_millis(250));
        let err = map_error(ureq::Error::Timeout(ureq::Timeout::Global), timeout);
        assert_eq!(err, TransportError::Timeout { timeout });
    }

    #[test]
    fn unreachable_hosts_map_to_connection() {
        let err = map_error(ureq::Error::HostNotFound, None);
        assert!(
            matches!(err, TransportError::Connection { .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn open_and_close_toggle_the_agent() {
        let mut transport = UreqTransport::default();
        assert!(!transport.is_open());
        transport.open().unwrap();
        assert!(transport.is_open());
        transport.close();
        assert!(!transport.is_open());
    }

    #[test]
    fn debug_hides_authorization() {
        let mut transport = UreqTransport::default();
        transport.set_basic_auth("u", "secret");
        let debug = format!("{transport:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("Basic"));
    }

    #[tokio::test]
    async fn send_before_open_fails_closed() {
        let transport = UreqTransport::default();
        let err = transport.send(request()).await.unwrap_err();
        assert_eq!(err, TransportError::Closed);
    }
}
