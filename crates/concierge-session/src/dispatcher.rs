// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Side effects for responder-declared actions.
//!
//! Actions run in declaration order. One action's failure is logged and
//! never stops the remaining actions or fails the originating message.

use std::sync::Arc;

use concierge_core::time::now_ts;
use concierge_core::types::{ActionKind, IntentAction, Slot};
use concierge_core::wire::OutboundEvent;
use concierge_registry::ConnectionRegistry;
use tracing::{debug, info, warn};

/// Executes responder actions against the connection registry.
#[derive(Clone)]
pub struct ActionDispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl ActionDispatcher {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Run each action for `client_id`, isolating failures per action.
    pub async fn dispatch(&self, client_id: &str, actions: &[IntentAction]) {
        for action in actions {
            match action.kind {
                ActionKind::ShowAvailability => {
                    self.push_availability(client_id, action).await;
                }
                ActionKind::ConfirmAppointment => {
                    info!(client_id, "confirmation requested in conversation");
                }
                ActionKind::ModifyAppointment => {
                    info!(client_id, "modification requested in conversation");
                }
                ActionKind::Unknown => {
                    debug!(client_id, "ignoring unrecognized action");
                }
            }
        }
    }

    async fn push_availability(&self, client_id: &str, action: &IntentAction) {
        let slots: Vec<Slot> =
            match serde_json::from_value(action.data["suggested_times"].clone()) {
                Ok(slots) => slots,
                Err(e) => {
                    warn!(client_id, error = %e, "availability action carried no usable slots");
                    return;
                }
            };
        self.registry
            .send_to(
                client_id,
                OutboundEvent::AvailableSlots {
                    slots,
                    timestamp: now_ts(),
                },
            )
            .await;
    }
}
