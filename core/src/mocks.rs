//! Recording transport double.
//!
//! `MockTransport` is a cheap handle over shared state: keep a clone in the
//! test, move the other into a session, and inspect what the session did
//! after it has been closed or dropped.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::http::{HttpRequest, RawResponse};
use crate::transport::{Transport, TransportError};

#[derive(Debug, Default)]
struct MockState {
    replies: VecDeque<Result<RawResponse, TransportError>>,
    default_response: Option<RawResponse>,
    requests: Vec<HttpRequest>,
    basic_auth: Option<(String, String)>,
    opened: usize,
    closed: usize,
}

/// Transport that answers from a queue and records every request.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a response for the next request.
    pub fn queue(&self, response: RawResponse) {
        self.state().replies.push_back(Ok(response));
    }

    pub fn queue_json(&self, status: u16, value: &serde_json::Value) {
        self.queue(
            RawResponse::new(status, value.to_string())
                .with_header("content-type", "application/json"),
        );
    }

    /// Queues a transport failure for the next request.
    pub fn queue_error(&self, error: TransportError) {
        self.state().replies.push_back(Err(error));
    }

    /// Response returned once the queue is empty.
    pub fn set_default(&self, response: RawResponse) {
        self.state().default_response = Some(response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.state().requests.last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    pub fn basic_auth(&self) -> Option<(String, String)> {
        self.state().basic_auth.clone()
    }

    pub fn open_count(&self) -> usize {
        self.state().opened
    }

    pub fn close_count(&self) -> usize {
        self.state().closed
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        self.state().opened += 1;
        Ok(())
    }

    fn set_basic_auth(&mut self, username: &str, password: &str) {
        self.state().basic_auth = Some((username.to_string(), password.to_string()));
    }

    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        let mut state = self.state();
        state.requests.push(request);
        match state.replies.pop_front() {
            Some(reply) => reply,
            None => Ok(state
                .default_response
                .clone()
                .unwrap_or_else(|| RawResponse::new(500, "no mock response configured"))),
        }
    }

    fn close(&mut self) {
        self.state().closed += 1;
    }
}
