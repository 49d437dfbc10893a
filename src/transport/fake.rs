//! Scripted in-process transport for unit tests
//!
//! Responses are queued as raw `(status, body)` pairs and replayed in order
//! through [`classify_response`], so tests see the same classification as
//! the real transport. Every request is recorded for inspection.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use super::{classify_response, ApiRequest, Transport};
use crate::error::{NetcordError, Result};

/// Fake [`Transport`] that replays queued responses.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<(u16, String)>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response with a JSON body.
    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push_raw(status, body.to_string())
    }

    /// Queues a response with a raw body.
    pub fn push_raw(&self, status: u16, body: impl Into<String>) -> &Self {
        self.lock_responses().push_back(Ok((status, body.into())));
        self
    }

    /// Queues a network failure.
    pub fn push_failure(&self, message: &str) -> &Self {
        self.lock_responses()
            .push_back(Err(NetcordError::Transport(message.to_string())));
        self
    }

    pub fn calls(&self) -> usize {
        self.lock_requests().len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.lock_requests().last().cloned()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<(u16, String)>>> {
        self.responses.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<ApiRequest>> {
        self.requests.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<Option<Value>> {
        let path = request.path.clone();
        self.lock_requests().push(request);

        let next = self.lock_responses().pop_front();
        match next {
            Some(Ok((status, body))) => classify_response(status, body.as_bytes()),
            Some(Err(err)) => Err(err),
            None => panic!("FakeTransport: no response queued for {path}"),
        }
    }
}
