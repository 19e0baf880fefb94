// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock responder for deterministic testing.
//!
//! `MockResponder` implements `Responder` with pre-configured replies,
//! enabling fast, CI-runnable tests without keyword heuristics or
//! external reply services.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use concierge_core::ConciergeError;
use concierge_core::traits::Responder;
use concierge_core::types::{Client, ClientContext, Intent, Message, ResponderReply};
use tokio::sync::Mutex;

/// A mock responder that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a
/// default general-intent reply is returned. Switching on `fail_next`
/// makes the next `respond` call return an error, for exercising the
/// pipeline's degradation path.
pub struct MockResponder {
    replies: Arc<Mutex<VecDeque<ResponderReply>>>,
    fail_next: AtomicBool,
    follow_up: Mutex<Option<String>>,
}

impl MockResponder {
    /// Create a new mock responder with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fail_next: AtomicBool::new(false),
            follow_up: Mutex::new(None),
        }
    }

    /// Create a mock responder pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<ResponderReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            fail_next: AtomicBool::new(false),
            follow_up: Mutex::new(None),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn add_reply(&self, reply: ResponderReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Make the next `respond` call fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Set the outreach suggestion returned by `suggest_follow_up`.
    pub async fn set_follow_up(&self, suggestion: Option<String>) {
        *self.follow_up.lock().await = suggestion;
    }

    async fn next_reply(&self) -> ResponderReply {
        self.replies.lock().await.pop_front().unwrap_or_else(|| {
            ResponderReply {
                text: "mock reply".to_string(),
                intent: Intent::General,
                actions: Vec::new(),
            }
        })
    }
}

impl Default for MockResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn respond(
        &self,
        _message: &str,
        _history: &[Message],
        _ctx: &ClientContext,
    ) -> Result<ResponderReply, ConciergeError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ConciergeError::Responder {
                message: "mock responder failure".to_string(),
                source: None,
            });
        }
        Ok(self.next_reply().await)
    }

    async fn summarize(&self, messages: &[Message]) -> Result<String, ConciergeError> {
        Ok(format!("mock summary of {} message(s)", messages.len()))
    }

    async fn suggest_follow_up(&self, _client: &Client) -> Result<Option<String>, ConciergeError> {
        Ok(self.follow_up.lock().await.clone())
    }
}
