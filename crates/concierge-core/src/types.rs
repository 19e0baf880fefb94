// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain entities shared across the Concierge workspace.
//!
//! All timestamps are storage strings produced by [`crate::time::fmt_ts`].
//! The store owns persistence of these entities; the core holds no state.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A client who communicates with the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// External client identifier (unique, caller-supplied).
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Free-form preference map, serialized as JSON text.
    pub preferences: Option<String>,
    /// Timestamp of the client's most recent appointment, if any.
    pub last_appointment_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Lifecycle state of a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    Active,
    Ended,
    Outreach,
}

/// Who opened a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationInitiator {
    Client,
    System,
}

/// A conversation between one client and the assistant.
///
/// At most one `active` conversation exists per client at a time; the
/// session pipeline enforces this with a find-or-create pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub client_id: String,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub status: ConversationStatus,
    pub initiated_by: ConversationInitiator,
    pub summary: Option<String>,
}

/// Who sent a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SenderRole {
    Client,
    Assistant,
}

/// A single message in a conversation. Append-only, ordered by `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub content: String,
    pub sender: SenderRole,
    pub created_at: String,
    /// Intent/action metadata, serialized [`MessageMeta`] JSON.
    pub metadata: Option<String>,
}

/// Lifecycle state of an appointment.
///
/// `Cancelled` and `Completed` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// A scheduled appointment for a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    pub service_type: String,
    pub scheduled_at: String,
    pub duration_minutes: i64,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub reminder_sent: bool,
    pub price: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Intent classification attached to assistant messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Scheduling,
    Modification,
    Confirmation,
    Reminder,
    Pricing,
    Hours,
    General,
}

/// The kind of structured action a responder can request.
///
/// Unknown kinds deserialize to [`ActionKind::Unknown`] and are silently
/// ignored by the dispatcher rather than failing the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ShowAvailability,
    ConfirmAppointment,
    ModifyAppointment,
    #[serde(other)]
    Unknown,
}

/// A structured follow-up instruction returned by the responder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Typed message metadata: intent classification plus ordered actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<IntentAction>,
}

impl MessageMeta {
    /// Serialize to the JSON text stored in the message metadata column.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse from stored metadata text. Malformed text yields the default.
    pub fn from_json(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }
}

/// An available appointment slot offered to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Storage timestamp of the slot start.
    pub starts_at: String,
    /// Human-readable rendering, e.g. "Monday, March 02 at 09:00 AM".
    pub display: String,
    pub available: bool,
}

/// Client summary passed to the responder alongside conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientContext {
    pub id: String,
    pub name: String,
    pub email: String,
    pub last_appointment_at: Option<String>,
}

impl ClientContext {
    pub fn from_client(client: &Client) -> Self {
        Self {
            id: client.id.clone(),
            name: client.name.clone(),
            email: client.email.clone(),
            last_appointment_at: client.last_appointment_at.clone(),
        }
    }
}

/// A responder's reply to one inbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponderReply {
    pub text: String,
    pub intent: Intent,
    #[serde(default)]
    pub actions: Vec<IntentAction>,
}

/// Appointment tallies over a reporting window, grouped by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppointmentCounts {
    pub created: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub cancelled: i64,
}

/// Aggregate row counts for the health surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub clients: i64,
    pub conversations: i64,
    pub messages: i64,
    pub appointments: i64,
}

/// A partial update to an appointment.
///
/// Changing `scheduled_at` resets the reminder flag at the store layer so a
/// rescheduled appointment is re-reminded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppointmentPatch {
    pub service_type: Option<String>,
    pub scheduled_at: Option<String>,
    pub duration_minutes: Option<i64>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
    pub price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_roundtrip() {
        use std::str::FromStr;
        for s in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Completed,
        ] {
            assert_eq!(AppointmentStatus::from_str(&s.to_string()).unwrap(), s);
        }
        assert_eq!(ConversationStatus::Active.to_string(), "active");
        assert_eq!(SenderRole::Assistant.to_string(), "assistant");
    }

    #[test]
    fn unknown_action_kind_deserializes() {
        let json = r#"{"type": "send_gift_card", "data": {}}"#;
        let action: IntentAction = serde_json::from_str(json).unwrap();
        assert_eq!(action.kind, ActionKind::Unknown);
    }

    #[test]
    fn message_meta_roundtrip() {
        let meta = MessageMeta {
            intent: Some(Intent::Scheduling),
            actions: vec![IntentAction {
                kind: ActionKind::ShowAvailability,
                data: serde_json::json!({"slots": []}),
            }],
        };
        let parsed = MessageMeta::from_json(&meta.to_json());
        assert_eq!(parsed, meta);
    }

    #[test]
    fn message_meta_tolerates_garbage() {
        let meta = MessageMeta::from_json("not json at all");
        assert!(meta.intent.is_none());
        assert!(meta.actions.is_empty());
    }

    #[test]
    fn patch_deserializes_partial_body() {
        let patch: AppointmentPatch =
            serde_json::from_str(r#"{"status": "confirmed"}"#).unwrap();
        assert_eq!(patch.status, Some(AppointmentStatus::Confirmed));
        assert!(patch.scheduled_at.is_none());
    }
}
