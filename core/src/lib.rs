//! Asynchronous HTTP sessions over clean address, response and credential
//! objects.
//!
//! # Overview
//! A caller builds an `Address`, opens a `Session` (plain or authenticated)
//! over a `Transport`, and calls one of the verb methods. The session renders
//! the address, delegates the round-trip to the transport, and returns the
//! response only if its status passes `validate`.
//!
//! ```no_run
//! use aiorequest::{
//!     with_session, HttpsUrl, RequestOptions, Response, Session, TransportConfig, UreqTransport,
//! };
//!
//! # async fn run() -> aiorequest::Result<()> {
//! let url = HttpsUrl::new("xkcd.com", "info.0.json");
//! let transport = UreqTransport::new(TransportConfig::default());
//! let comic = with_session(transport, async |session| {
//!     Ok(session.get(&url, RequestOptions::new()).await?.as_json()?)
//! })
//! .await?;
//! println!("{}", comic["title"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - Socket work stays behind the `Transport` trait. `UreqTransport` is the
//!   bundled implementation; `mocks::MockTransport` (behind the `mocks`
//!   feature) records requests for tests.
//! - Transport failures, JSON decode failures and rejected status codes are
//!   distinct `Error` variants and are never retried or logged here.
//! - Sessions own their transport and release it exactly once.

pub mod address;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
/// Recording transport for tests.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod response;
pub mod session;
pub mod transport;
pub mod ureq_transport;

pub use address::{Address, HttpUrl, HttpsUrl, Url};
pub use config::TransportConfig;
pub use credentials::{AuthCredentials, Credentials};
pub use error::{Error, ResponseError, Result};
pub use http::{HttpMethod, HttpRequest, JsonType, Payload, RawResponse, RequestOptions};
pub use response::{validate, validate_default, HttpResponse, Response, DEFAULT_SUCCESS_CODES};
pub use session::{
    scoped, with_logged_session, with_session, HttpSession, LoggedHttpSession, Session,
};
pub use transport::{Transport, TransportError};
pub use ureq_transport::UreqTransport;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
