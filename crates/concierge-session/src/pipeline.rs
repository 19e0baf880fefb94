// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message pipeline for live conversations.
//!
//! Each inbound message runs the same fixed sequence: ensure the client
//! profile, find or open the active conversation, persist the inbound
//! message, assemble bounded history, generate a reply, persist it with
//! intent metadata, push it over the connection, and dispatch any actions.
//!
//! A responder failure mid-request substitutes the deterministic fallback
//! reply; the client never sees a responder error.

use std::sync::Arc;

use chrono::Utc;
use concierge_core::ConciergeError;
use concierge_core::traits::{Responder, Store};
use concierge_core::types::{
    ClientContext, ConversationInitiator, Message, MessageMeta, SenderRole,
};
use concierge_core::wire::OutboundEvent;
use concierge_registry::ConnectionRegistry;
use concierge_responder::FallbackResponder;
use tracing::{debug, info, warn};

use crate::dispatcher::ActionDispatcher;

/// Messages of history handed to the responder per request.
const HISTORY_LIMIT: u32 = 20;

/// Drives a client's conversation from inbound frame to pushed reply.
#[derive(Clone)]
pub struct SessionPipeline {
    store: Arc<dyn Store>,
    responder: Arc<dyn Responder>,
    registry: Arc<ConnectionRegistry>,
    dispatcher: ActionDispatcher,
    fallback: FallbackResponder,
}

impl SessionPipeline {
    pub fn new(
        store: Arc<dyn Store>,
        responder: Arc<dyn Responder>,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        let dispatcher = ActionDispatcher::new(registry.clone());
        Self {
            store,
            responder,
            registry,
            dispatcher,
            fallback: FallbackResponder::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Process one inbound message and return the persisted assistant reply.
    pub async fn handle_message(
        &self,
        client_id: &str,
        content: &str,
    ) -> Result<Message, ConciergeError> {
        let client = self.store.ensure_client(client_id).await?;

        let conversation = match self.store.find_active_conversation(client_id).await? {
            Some(conversation) => conversation,
            None => {
                let conversation = self
                    .store
                    .create_conversation(client_id, ConversationInitiator::Client)
                    .await?;
                debug!(client_id, conversation_id = %conversation.id, "conversation opened");
                conversation
            }
        };

        self.store
            .insert_message(&conversation.id, SenderRole::Client, content, None)
            .await?;

        let history = self
            .store
            .recent_messages(&conversation.id, HISTORY_LIMIT)
            .await?;
        let ctx = ClientContext::from_client(&client);

        let reply = match self.responder.respond(content, &history, &ctx).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(client_id, error = %e, "responder failed, substituting fallback reply");
                self.fallback.respond(content, &history, &ctx).await?
            }
        };

        let meta = MessageMeta {
            intent: Some(reply.intent),
            actions: reply.actions.clone(),
        };
        let assistant = self
            .store
            .insert_message(
                &conversation.id,
                SenderRole::Assistant,
                &reply.text,
                Some(meta),
            )
            .await?;

        self.registry
            .send_to(
                client_id,
                OutboundEvent::Message {
                    content: assistant.content.clone(),
                    timestamp: assistant.created_at.clone(),
                    intent: Some(reply.intent),
                    actions: reply.actions.clone(),
                },
            )
            .await;

        self.dispatcher.dispatch(client_id, &reply.actions).await;

        Ok(assistant)
    }

    /// Close out a client's active conversation on disconnect.
    ///
    /// Ends the conversation with a summary when it has at least one
    /// message. Every failure here is logged and swallowed: disconnect
    /// cleanup must never propagate an error to the socket handler.
    pub async fn finalize(&self, client_id: &str) {
        let conversation = match self.store.find_active_conversation(client_id).await {
            Ok(Some(conversation)) => conversation,
            Ok(None) => return,
            Err(e) => {
                warn!(client_id, error = %e, "failed to look up conversation during finalize");
                return;
            }
        };

        let summary = match self.store.count_messages(&conversation.id).await {
            Ok(0) => None,
            Ok(_) => {
                let messages = self
                    .store
                    .recent_messages(&conversation.id, HISTORY_LIMIT)
                    .await
                    .unwrap_or_default();
                match self.responder.summarize(&messages).await {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        warn!(client_id, error = %e, "summary generation failed");
                        None
                    }
                }
            }
            Err(e) => {
                warn!(client_id, error = %e, "failed to count messages during finalize");
                None
            }
        };

        if let Err(e) = self
            .store
            .end_conversation(&conversation.id, Utc::now(), summary)
            .await
        {
            warn!(client_id, error = %e, "failed to end conversation");
        } else {
            info!(client_id, conversation_id = %conversation.id, "conversation ended");
        }
    }
}
