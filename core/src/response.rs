//! Normalized responses and the status-code policy.
//!
//! # Design
//! `HttpResponse` stores the body text eagerly and decodes JSON only when
//! asked, so a non-JSON body is an error at `as_json()` time and never at
//! construction. `validate` is the single place that turns a completed
//! round-trip into an accepted or rejected one.

use serde::de::DeserializeOwned;

use crate::error::ResponseError;
use crate::http::{JsonType, RawResponse};

/// Status codes accepted when the caller does not supply its own set.
pub const DEFAULT_SUCCESS_CODES: [u16; 3] = [200, 201, 204];

/// Uniform view of one round-trip result.
pub trait Response {
    /// Transport-reported success flag.
    fn is_ok(&self) -> bool;

    fn status(&self) -> u16;

    fn as_json(&self) -> Result<JsonType, serde_json::Error>;

    fn as_text(&self) -> &str;
}

/// Response produced by a session from a transport's `RawResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    raw: RawResponse,
}

impl HttpResponse {
    pub fn new(raw: RawResponse) -> Self {
        Self { raw }
    }

    /// Decodes the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.raw.body)
    }

    /// Case-insensitive header lookup; the first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.raw
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.raw.headers
    }

    pub fn into_raw(self) -> RawResponse {
        self.raw
    }
}

impl From<RawResponse> for HttpResponse {
    fn from(raw: RawResponse) -> Self {
        Self::new(raw)
    }
}

impl Response for HttpResponse {
    fn is_ok(&self) -> bool {
        self.raw.ok
    }

    fn status(&self) -> u16 {
        self.raw.status
    }

    fn as_json(&self) -> Result<JsonType, serde_json::Error> {
        self.json()
    }

    fn as_text(&self) -> &str {
        &self.raw.body
    }
}

/// Returns `response` unchanged when its status is in `success_codes`.
///
/// Any other status becomes a `ResponseError` carrying the code and the
/// response text.
pub fn validate<R: Response>(response: R, success_codes: &[u16]) -> Result<R, ResponseError> {
    let status = response.status();
    if success_codes.contains(&status) {
        return Ok(response);
    }
    Err(ResponseError {
        status,
        body: response.as_text().to_string(),
    })
}

/// `validate` with `DEFAULT_SUCCESS_CODES`.
pub fn validate_default<R: Response>(response: R) -> Result<R, ResponseError> {
    validate(response, &DEFAULT_SUCCESS_CODES)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Response double whose accessors never touch a transport.
    struct FakeResponse {
        code: u16,
        text: String,
    }

    impl FakeResponse {
        fn new(code: u16) -> Self {
            Self {
                code,
                text: String::new(),
            }
        }
    }

    impl Response for FakeResponse {
        fn is_ok(&self) -> bool {
            true
        }

        fn status(&self) -> u16 {
            self.code
        }

        fn as_json(&self) -> Result<JsonType, serde_json::Error> {
            Ok(JsonType::Null)
        }

        fn as_text(&self) -> &str {
            &self.text
        }
    }

    #[test]
    fn allowed_codes_pass_through_per_status_class() {
        let cases: [(u16, [u16; 3]); 5] = [
            (100, [100, 101, 102]),
            (200, [200, 201, 451]),
            (300, [300, 301, 302]),
            (400, [400, 401, 402]),
            (500, [500, 501, 502]),
        ];
        for (code, allowed) in cases {
            let response = validate(FakeResponse::new(code), &allowed).unwrap();
            assert_eq!(response.status(), code);
        }
    }

    #[test]
    fn disallowed_code_is_rejected_with_that_code() {
        let err = validate(FakeResponse::new(500), &[200, 201]).err().unwrap();
        assert_eq!(err.status, 500);
    }

    #[test]
    fn rejection_carries_response_text() {
        let response = HttpResponse::new(RawResponse::new(422, "title is required"));
        let err = validate_default(response).unwrap_err();
        assert_eq!(err.status, 422);
        assert_eq!(err.body, "title is required");
    }

    #[test]
    fn default_policy() {
        for code in DEFAULT_SUCCESS_CODES {
            assert!(validate_default(FakeResponse::new(code)).is_ok());
        }
        let ok = HttpResponse::new(RawResponse::new(200, "{}"));
        assert_eq!(validate_default(ok.clone()).unwrap(), ok);
        assert!(validate_default(FakeResponse::new(500)).is_err());
        assert!(validate_default(FakeResponse::new(202)).is_err());
    }

    #[test]
    fn json_is_decoded_on_access() {
        let response = HttpResponse::new(RawResponse::new(200, r#"{"num":614}"#));
        assert_eq!(response.as_json().unwrap()["num"], 614);
    }

    #[test]
    fn invalid_json_fails_only_at_access() {
        let response = HttpResponse::new(RawResponse::new(200, "<html>"));
        assert_eq!(response.as_text(), "<html>");
        assert!(response.as_json().is_err());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let raw = RawResponse::new(200, "")
            .with_header("Content-Type", "text/plain");
        let response = HttpResponse::from(raw);
        assert_eq!(response.header("content-type"), Some("text/plain"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn into_raw_returns_the_transport_result() {
        let raw = RawResponse::new(201, "created")
            .with_header("Location", "/items/7");
        let response = HttpResponse::from(raw.clone());
        assert_eq!(response.headers().len(), 1);
        assert_eq!(response.into_raw(), raw);
    }

    #[test]
    fn ok_flag_is_transport_reported() {
        let mut raw = RawResponse::new(500, "");
        raw.ok = true;
        assert!(HttpResponse::new(raw).is_ok());
    }
}
