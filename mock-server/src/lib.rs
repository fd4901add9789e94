//! HTTP peer for exercising sessions end-to-end.
//!
//! Routes:
//! - `/anything` (any method) echoes the request back as JSON.
//! - `/status/{code}` (any method) answers with that status and a text body.
//! - `/basic-auth/{user}/{password}` answers 200 only for matching Basic credentials.
//! - `/text` answers 200 with a body that is not JSON.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const PLAIN_TEXT: &str = "plain text, not json";

/// What `/anything` saw.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub method: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub headers: HashMap<String, String>,
    pub text: String,
    pub json: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthOutcome {
    pub authenticated: bool,
    pub user: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/anything", any(echo))
        .route("/status/{code}", any(status))
        .route("/basic-auth/{user}/{password}", get(basic_auth))
        .route("/text", get(text))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    tracing::info!(addr = ?listener.local_addr().ok(), "mock server listening");
    axum::serve(listener, app()).await
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn echo(
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    let content_type = header_str(&headers, header::CONTENT_TYPE);
    let json = match content_type.as_deref() {
        Some(ct) if ct.starts_with("application/json") => serde_json::from_str(&body).ok(),
        _ => None,
    };
    let all = headers
        .iter()
        .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
        .collect();
    Json(Echo {
        method: method.to_string(),
        query,
        authorization: header_str(&headers, header::AUTHORIZATION),
        content_type,
        headers: all,
        text: body,
        json,
    })
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code)
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}

async fn basic_auth(
    Path((user, password)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<AuthOutcome>, StatusCode> {
    let expected = format!("Basic {}", BASE64.encode(format!("{user}:{password}")));
    match header_str(&headers, header::AUTHORIZATION) {
        Some(given) if given == expected => Ok(Json(AuthOutcome {
            authenticated: true,
            user,
        })),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn text() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], PLAIN_TEXT)
}
