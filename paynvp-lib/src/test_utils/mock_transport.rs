//! Recording transport for client tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::transport::{HttpRequest, NvpTransport};
use crate::{NvpError, Result};

enum Reply {
    Body(String),
    Failure(String),
}

/// Transport that records every request and replays queued replies.
///
/// With an empty queue it answers with an empty body, which decodes to an
/// empty response.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Create a transport with no queued replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response body.
    pub fn respond_with(&self, body: impl Into<String>) {
        self.lock_replies().push_back(Reply::Body(body.into()));
    }

    /// Queue a transport failure.
    pub fn fail_with(&self, reason: impl Into<String>) {
        self.lock_replies().push_back(Reply::Failure(reason.into()));
    }

    /// Requests seen so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Reply>> {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl NvpTransport for MockTransport {
    async fn post(&self, request: HttpRequest) -> Result<String> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);

        match self.lock_replies().pop_front() {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Failure(reason)) => Err(NvpError::Transport(reason)),
            None => Ok(String::new()),
        }
    }
}
