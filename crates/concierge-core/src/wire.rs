// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire protocol for the client-facing WebSocket channel.
//!
//! Client -> Server (JSON):
//! ```json
//! {"content": "Can I book a trim for Friday?"}
//! ```
//!
//! Server -> Client (JSON), tagged by `type`:
//! ```json
//! {"type": "connection", "content": "Connected", "timestamp": "..."}
//! {"type": "message", "content": "...", "timestamp": "...", "intent": "scheduling"}
//! {"type": "available_slots", "slots": [...], "timestamp": "..."}
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Intent, IntentAction, Slot};

/// A frame received from a client.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    pub content: String,
}

/// An event pushed to a client over its connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// Greeting sent once when a connection is established.
    Connection { content: String, timestamp: String },
    /// A chat message from the assistant (live reply or notification).
    Message {
        content: String,
        timestamp: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        intent: Option<Intent>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        actions: Vec<IntentAction>,
    },
    /// Structured availability payload produced by a `show_availability` action.
    AvailableSlots { slots: Vec<Slot>, timestamp: String },
}

impl OutboundEvent {
    /// A plain assistant message with no intent metadata.
    pub fn message(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        OutboundEvent::Message {
            content: content.into(),
            timestamp: timestamp.into(),
            intent: None,
            actions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionKind;

    #[test]
    fn inbound_frame_deserializes_minimal() {
        let frame: InboundFrame = serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert_eq!(frame.content, "hello");
    }

    #[test]
    fn connection_event_shape() {
        let event = OutboundEvent::Connection {
            content: "Connected".into(),
            timestamp: "2026-03-01T09:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "connection");
        assert_eq!(json["content"], "Connected");
    }

    #[test]
    fn message_event_omits_empty_metadata() {
        let event = OutboundEvent::message("hi", "2026-03-01T09:00:00.000Z");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "message");
        assert!(json.get("intent").is_none());
        assert!(json.get("actions").is_none());
    }

    #[test]
    fn message_event_carries_intent_and_actions() {
        let event = OutboundEvent::Message {
            content: "Here are some times".into(),
            timestamp: "2026-03-01T09:00:00.000Z".into(),
            intent: Some(Intent::Scheduling),
            actions: vec![IntentAction {
                kind: ActionKind::ShowAvailability,
                data: serde_json::Value::Null,
            }],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["intent"], "scheduling");
        assert_eq!(json["actions"][0]["type"], "show_availability");
    }

    #[test]
    fn available_slots_event_shape() {
        let event = OutboundEvent::AvailableSlots {
            slots: vec![Slot {
                starts_at: "2026-03-02T09:00:00.000Z".into(),
                display: "Monday, March 02 at 09:00 AM".into(),
                available: true,
            }],
            timestamp: "2026-03-01T09:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "available_slots");
        assert_eq!(json["slots"][0]["available"], true);
    }
}
