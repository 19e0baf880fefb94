// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Responder trait for reply generation backends.

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::types::{Client, ClientContext, Message, ResponderReply};

/// Generates assistant replies, conversation summaries, and outreach copy.
///
/// Implementations must be deterministic enough to test or degrade to a
/// deterministic fallback; a responder failure must never reach the client
/// as an error (the session pipeline substitutes canned text).
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produces a reply to `message` given the recent conversation history.
    async fn respond(
        &self,
        message: &str,
        history: &[Message],
        ctx: &ClientContext,
    ) -> Result<ResponderReply, ConciergeError>;

    /// Produces a short summary of a finished conversation.
    async fn summarize(&self, messages: &[Message]) -> Result<String, ConciergeError>;

    /// Suggests a re-engagement message for a lapsed client, or `None` when
    /// the client does not qualify for outreach.
    async fn suggest_follow_up(&self, client: &Client) -> Result<Option<String>, ConciergeError>;
}
