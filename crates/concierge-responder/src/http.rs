// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Responder backed by an external HTTP reply service.
//!
//! POSTs the message, bounded history, and client context as JSON and
//! expects a [`ResponderReply`] back. Any transport or decode failure
//! degrades to the deterministic [`FallbackResponder`]; a client chat
//! never surfaces a responder error.

use std::time::Duration;

use async_trait::async_trait;
use concierge_core::traits::Responder;
use concierge_core::types::{Client, ClientContext, Message, ResponderReply};
use concierge_core::ConciergeError;
use serde::Serialize;
use tracing::warn;

use crate::fallback::FallbackResponder;

/// Request body sent to the external reply service.
#[derive(Debug, Serialize)]
struct RespondRequest<'a> {
    message: &'a str,
    history: &'a [Message],
    context: &'a ClientContext,
}

/// Responder that calls an external HTTP endpoint, degrading to the
/// built-in fallback on failure.
pub struct HttpResponder {
    client: reqwest::Client,
    endpoint: String,
    fallback: FallbackResponder,
}

impl HttpResponder {
    /// Build a responder for `endpoint` with a per-request `timeout`.
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ConciergeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConciergeError::Responder {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            endpoint,
            fallback: FallbackResponder::new(),
        })
    }

    /// Build a responder from a [`concierge_config::model::ResponderConfig`].
    ///
    /// Returns `None` when no endpoint is configured.
    pub fn from_config(
        config: &concierge_config::model::ResponderConfig,
    ) -> Result<Option<Self>, ConciergeError> {
        match &config.endpoint {
            Some(endpoint) => Ok(Some(Self::new(
                endpoint.clone(),
                Duration::from_secs(config.timeout_secs),
            )?)),
            None => Ok(None),
        }
    }

    async fn call_endpoint(
        &self,
        message: &str,
        history: &[Message],
        ctx: &ClientContext,
    ) -> Result<ResponderReply, reqwest::Error> {
        let body = RespondRequest {
            message,
            history,
            context: ctx,
        };
        self.client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<ResponderReply>()
            .await
    }
}

#[async_trait]
impl Responder for HttpResponder {
    async fn respond(
        &self,
        message: &str,
        history: &[Message],
        ctx: &ClientContext,
    ) -> Result<ResponderReply, ConciergeError> {
        match self.call_endpoint(message, history, ctx).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                warn!(error = %e, "reply service unavailable, using fallback");
                self.fallback.respond(message, history, ctx).await
            }
        }
    }

    async fn summarize(&self, messages: &[Message]) -> Result<String, ConciergeError> {
        // Summaries are internal bookkeeping; the deterministic digest is enough.
        self.fallback.summarize(messages).await
    }

    async fn suggest_follow_up(&self, client: &Client) -> Result<Option<String>, ConciergeError> {
        self.fallback.suggest_follow_up(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::types::Intent;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ctx() -> ClientContext {
        ClientContext {
            id: "c-1".to_string(),
            name: "Ada".to_string(),
            email: "c-1@example.com".to_string(),
            last_appointment_at: None,
        }
    }

    #[tokio::test]
    async fn uses_endpoint_reply_on_success() {
        let server = MockServer::start().await;
        let reply = serde_json::json!({
            "text": "We have Friday at 2 PM open.",
            "intent": "scheduling",
            "actions": []
        });
        Mock::given(method("POST"))
            .and(path("/respond"))
            .and(body_partial_json(serde_json::json!({"message": "book me in"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(&reply))
            .mount(&server)
            .await;

        let responder =
            HttpResponder::new(format!("{}/respond", server.uri()), Duration::from_secs(5))
                .unwrap();
        let result = responder.respond("book me in", &[], &ctx()).await.unwrap();
        assert_eq!(result.text, "We have Friday at 2 PM open.");
        assert_eq!(result.intent, Intent::Scheduling);
    }

    #[tokio::test]
    async fn degrades_to_fallback_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let responder =
            HttpResponder::new(format!("{}/respond", server.uri()), Duration::from_secs(5))
                .unwrap();
        let result = responder.respond("book me in", &[], &ctx()).await.unwrap();
        // Canned scheduling reply, not an error.
        assert_eq!(result.intent, Intent::Scheduling);
        assert!(result.text.contains("schedule an appointment"));
    }

    #[tokio::test]
    async fn degrades_to_fallback_on_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let responder =
            HttpResponder::new(format!("{}/respond", server.uri()), Duration::from_secs(5))
                .unwrap();
        let result = responder.respond("what's the cost", &[], &ctx()).await.unwrap();
        assert_eq!(result.intent, Intent::Pricing);
    }

    #[tokio::test]
    async fn degrades_to_fallback_when_unreachable() {
        // Port 9 is discard; nothing listens there in tests.
        let responder = HttpResponder::new(
            "http://127.0.0.1:9/respond".to_string(),
            Duration::from_millis(200),
        )
        .unwrap();
        let result = responder.respond("hello", &[], &ctx()).await.unwrap();
        assert_eq!(result.intent, Intent::General);
    }

    #[tokio::test]
    async fn from_config_without_endpoint_is_none() {
        let config = concierge_config::model::ResponderConfig::default();
        assert!(HttpResponder::from_config(&config).unwrap().is_none());
    }
}
