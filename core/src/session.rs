//! Verb dispatch and session lifecycle.
//!
//! # Design
//! `HttpSession` is the only place that turns an `Address` plus a body into
//! an `HttpRequest`, hands it to its transport and validates the result
//! against `DEFAULT_SUCCESS_CODES`. `LoggedHttpSession` configures Basic
//! authentication on the transport once and then forwards each verb to an
//! inner `HttpSession`; it holds no dispatch logic of its own.
//!
//! Opening a session opens its transport; the transport is closed exactly
//! once, either by an explicit `close` or when the session is dropped. The
//! `scoped`, `with_session` and `with_logged_session` helpers wrap that into
//! a guarded block: the session is released after the block on every exit
//! path, including `?` early returns and panics.
//!
//! A session keeps no per-request state. Concurrent calls on one session are
//! only as safe as its transport; use one session per task otherwise.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::address::Address;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, Payload, RequestOptions};
use crate::response::{validate_default, HttpResponse};
use crate::transport::{Transport, TransportError};

/// One method per HTTP verb; each returns a validated response.
#[async_trait]
pub trait Session: Send + Sync {
    async fn get(&self, url: &dyn Address, options: RequestOptions) -> Result<HttpResponse>;

    async fn options(&self, url: &dyn Address, options: RequestOptions) -> Result<HttpResponse>;

    async fn head(&self, url: &dyn Address, options: RequestOptions) -> Result<HttpResponse>;

    async fn post(
        &self,
        url: &dyn Address,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<HttpResponse>;

    async fn put(
        &self,
        url: &dyn Address,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<HttpResponse>;

    async fn patch(
        &self,
        url: &dyn Address,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<HttpResponse>;

    async fn delete(&self, url: &dyn Address, options: RequestOptions) -> Result<HttpResponse>;
}

/// Session dispatching directly to a transport it owns.
pub struct HttpSession<T: Transport> {
    transport: T,
    released: bool,
}

impl<T: Transport> HttpSession<T> {
    /// Opens `transport` and returns a session owning it.
    pub fn open(mut transport: T) -> Result<Self, TransportError> {
        transport.open()?;
        debug!("session opened");
        Ok(Self {
            transport,
            released: false,
        })
    }

    /// Closes the transport. Dropping the session has the same effect.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.transport.close();
            debug!("session closed");
        }
    }

    #[instrument(
        level = "debug",
        skip(self, url, payload, options),
        fields(url = %url.canonical())
    )]
    async fn dispatch(
        &self,
        method: HttpMethod,
        url: &dyn Address,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        let request = HttpRequest {
            method,
            url: url.canonical(),
            payload,
            options,
        };
        let raw = self.transport.send(request).await?;
        Ok(validate_default(HttpResponse::new(raw))?)
    }
}

impl<T: Transport> Drop for HttpSession<T> {
    fn drop(&mut self) {
        self.release();
    }
}

#[async_trait]
impl<T: Transport> Session for HttpSession<T> {
    async fn get(&self, url: &dyn Address, options: RequestOptions) -> Result<HttpResponse> {
        self.dispatch(HttpMethod::Get, url, Payload::empty(), options)
            .await
    }

    async fn options(&self, url: &dyn Address, options: RequestOptions) -> Result<HttpResponse> {
        self.dispatch(HttpMethod::Options, url, Payload::empty(), options)
            .await
    }

    async fn head(&self, url: &dyn Address, options: RequestOptions) -> Result<HttpResponse> {
        self.dispatch(HttpMethod::Head, url, Payload::empty(), options)
            .await
    }

    async fn post(
        &self,
        url: &dyn Address,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        self.dispatch(HttpMethod::Post, url, payload, options).await
    }

    async fn put(
        &self,
        url: &dyn Address,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        self.dispatch(HttpMethod::Put, url, payload, options).await
    }

    async fn patch(
        &self,
        url: &dyn Address,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        self.dispatch(HttpMethod::Patch, url, payload, options)
            .await
    }

    async fn delete(&self, url: &dyn Address, options: RequestOptions) -> Result<HttpResponse> {
        self.dispatch(HttpMethod::Delete, url, Payload::empty(), options)
            .await
    }
}

/// Session sending HTTP Basic credentials with every request.
pub struct LoggedHttpSession<T: Transport> {
    session: HttpSession<T>,
}

impl<T: Transport> LoggedHttpSession<T> {
    pub fn open(credentials: &dyn Credentials, transport: T) -> Result<Self, TransportError> {
        Self::open_with_login(credentials.username(), credentials.password(), transport)
    }

    pub fn open_with_login(
        username: &str,
        password: &str,
        mut transport: T,
    ) -> Result<Self, TransportError> {
        transport.set_basic_auth(username, password);
        Ok(Self {
            session: HttpSession::open(transport)?,
        })
    }

    pub fn close(self) {
        self.session.close();
    }
}

#[async_trait]
impl<T: Transport> Session for LoggedHttpSession<T> {
    async fn get(&self, url: &dyn Address, options: RequestOptions) -> Result<HttpResponse> {
        self.session.get(url, options).await
    }

    async fn options(&self, url: &dyn Address, options: RequestOptions) -> Result<HttpResponse> {
        self.session.options(url, options).await
    }

    async fn head(&self, url: &dyn Address, options: RequestOptions) -> Result<HttpResponse> {
        self.session.head(url, options).await
    }

    async fn post(
        &self,
        url: &dyn Address,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        self.session.post(url, payload, options).await
    }

    async fn put(
        &self,
        url: &dyn Address,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        self.session.put(url, payload, options).await
    }

    async fn patch(
        &self,
        url: &dyn Address,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        self.session.patch(url, payload, options).await
    }

    async fn delete(&self, url: &dyn Address, options: RequestOptions) -> Result<HttpResponse> {
        self.session.delete(url, options).await
    }
}

/// Runs `body` against `session`, then releases the session.
pub async fn scoped<S, R>(session: S, body: impl AsyncFnOnce(&S) -> R) -> R
where
    S: Session,
{
    let output = body(&session).await;
    drop(session);
    output
}

/// Opens an `HttpSession` over `transport` for the duration of `body`.
pub async fn with_session<T, R>(
    transport: T,
    body: impl AsyncFnOnce(&HttpSession<T>) -> Result<R>,
) -> Result<R>
where
    T: Transport,
{
    let session = HttpSession::open(transport)?;
    scoped(session, body).await
}

/// Opens a `LoggedHttpSession` over `transport` for the duration of `body`.
pub async fn with_logged_session<T, R>(
    credentials: &dyn Credentials,
    transport: T,
    body: impl AsyncFnOnce(&LoggedHttpSession<T>) -> Result<R>,
) -> Result<R>
where
    T: Transport,
{
    let session = LoggedHttpSession::open(credentials, transport)?;
    scoped(session, body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::HttpUrl;
    use crate::http::RawResponse;
    use crate::mocks::MockTransport;

    #[test]
    fn open_opens_and_drop_closes_once() {
        let mock = MockTransport::new();
        let session = HttpSession::open(mock.clone()).unwrap();
        assert_eq!(mock.open_count(), 1);
        assert_eq!(mock.close_count(), 0);
        drop(session);
        assert_eq!(mock.close_count(), 1);
    }

    #[test]
    fn explicit_close_is_not_repeated_by_drop() {
        let mock = MockTransport::new();
        HttpSession::open(mock.clone()).unwrap().close();
        assert_eq!(mock.close_count(), 1);
    }

    #[tokio::test]
    async fn dispatch_renders_canonical_url() {
        let mock = MockTransport::new();
        mock.queue(RawResponse::new(200, "{}"));
        let session = HttpSession::open(mock.clone()).unwrap();

        session
            .get(
                &HttpUrl::new("xkcd.com", "info.0.json"),
                RequestOptions::new(),
            )
            .await
            .unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "http://xkcd.com/info.0.json");
        assert!(request.payload.is_empty());
    }
}
