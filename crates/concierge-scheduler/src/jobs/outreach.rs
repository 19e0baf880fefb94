// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-demand proactive outreach.
//!
//! Outreach is not on a schedule; the REST surface invokes
//! [`run_outreach_for_client`] for one client at a time.

use concierge_core::types::{ConversationInitiator, Message, SenderRole};
use concierge_core::wire::OutboundEvent;
use concierge_core::ConciergeError;
use tracing::{debug, info};

use crate::JobContext;

/// Ask the responder whether the client is due a follow-up and, if so,
/// persist a system-initiated outreach conversation and push the message.
///
/// Returns the persisted outreach message, or `None` when the client does
/// not qualify.
pub async fn run_outreach_for_client(
    ctx: &JobContext,
    client_id: &str,
) -> Result<Option<Message>, ConciergeError> {
    let client = ctx.store.get_client(client_id).await?;

    let Some(text) = ctx.responder.suggest_follow_up(&client).await? else {
        debug!(client_id, "client does not qualify for outreach");
        return Ok(None);
    };

    let conversation = ctx
        .store
        .create_conversation(client_id, ConversationInitiator::System)
        .await?;
    let message = ctx
        .store
        .insert_message(&conversation.id, SenderRole::Assistant, &text, None)
        .await?;

    let delivered = ctx
        .registry
        .send_to(
            client_id,
            OutboundEvent::message(text, message.created_at.clone()),
        )
        .await;
    info!(client_id, delivered, "outreach sent");

    Ok(Some(message))
}
