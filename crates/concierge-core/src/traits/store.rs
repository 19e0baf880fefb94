// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence trait for clients, conversations, messages, and appointments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ConciergeError;
use crate::types::{
    Appointment, AppointmentCounts, AppointmentPatch, AppointmentStatus, Client, Conversation,
    ConversationInitiator, EntityCounts, Message, MessageMeta, SenderRole,
};

/// Persistence backend for the scheduling domain.
///
/// Every call is a single serialized transaction against the backing
/// database. Lookups by primary key surface [`ConciergeError::NotFound`]
/// when the row is missing; finder methods return `Ok(None)` instead.
#[async_trait]
pub trait Store: Send + Sync {
    // clients

    /// Fetches a client by id.
    async fn get_client(&self, client_id: &str) -> Result<Client, ConciergeError>;

    /// Inserts a new client row.
    async fn create_client(&self, client: &Client) -> Result<(), ConciergeError>;

    /// Returns the client, creating a default profile if none exists.
    async fn ensure_client(&self, client_id: &str) -> Result<Client, ConciergeError>;

    /// Lists every known client, most recently created first.
    async fn list_clients(&self) -> Result<Vec<Client>, ConciergeError>;

    async fn count_clients(&self) -> Result<u64, ConciergeError>;

    /// Counts clients whose profile was created at or after `since`.
    async fn clients_created_since(&self, since: DateTime<Utc>) -> Result<u64, ConciergeError>;

    /// Records the client's most recent appointment date.
    async fn set_last_appointment(
        &self,
        client_id: &str,
        scheduled_at: DateTime<Utc>,
    ) -> Result<(), ConciergeError>;

    // conversations

    /// Finds the client's currently active conversation, if any.
    async fn find_active_conversation(
        &self,
        client_id: &str,
    ) -> Result<Option<Conversation>, ConciergeError>;

    /// Opens a conversation. Client-initiated conversations start `active`;
    /// system-initiated ones start in the `outreach` status.
    async fn create_conversation(
        &self,
        client_id: &str,
        initiator: ConversationInitiator,
    ) -> Result<Conversation, ConciergeError>;

    /// Marks a conversation as ended, storing an optional summary.
    async fn end_conversation(
        &self,
        conversation_id: &str,
        ended_at: DateTime<Utc>,
        summary: Option<String>,
    ) -> Result<(), ConciergeError>;

    async fn list_conversations(
        &self,
        client_id: &str,
    ) -> Result<Vec<Conversation>, ConciergeError>;

    // messages

    async fn insert_message(
        &self,
        conversation_id: &str,
        role: SenderRole,
        content: &str,
        meta: Option<MessageMeta>,
    ) -> Result<Message, ConciergeError>;

    /// Returns up to `limit` of the newest messages, oldest first.
    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> Result<Vec<Message>, ConciergeError>;

    async fn count_messages(&self, conversation_id: &str) -> Result<u64, ConciergeError>;

    // appointments

    async fn create_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<Appointment, ConciergeError>;

    async fn get_appointment(&self, appointment_id: &str) -> Result<Appointment, ConciergeError>;

    async fn list_appointments(
        &self,
        client_id: Option<&str>,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, ConciergeError>;

    /// Applies a partial update. A change to `scheduled_at` clears the
    /// reminder flag so the new date gets its own reminder.
    async fn update_appointment(
        &self,
        appointment_id: &str,
        patch: AppointmentPatch,
    ) -> Result<Appointment, ConciergeError>;

    /// Confirmed appointments in `(now, until]` that have not been reminded.
    async fn reminders_due(
        &self,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, ConciergeError>;

    async fn mark_reminder_sent(&self, appointment_id: &str) -> Result<(), ConciergeError>;

    /// Confirmed appointments starting in `(now, soon]`.
    async fn starting_between(
        &self,
        now: DateTime<Utc>,
        soon: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, ConciergeError>;

    /// Moves confirmed appointments scheduled before `cutoff` to completed.
    /// Returns the number of rows changed.
    async fn complete_stale(&self, cutoff: DateTime<Utc>) -> Result<u64, ConciergeError>;

    /// Clears stale reminder flags on appointments still in the future.
    /// Returns the number of rows changed.
    async fn reset_future_reminder_flags(&self, now: DateTime<Utc>) -> Result<u64, ConciergeError>;

    /// Weekly-report tallies over appointments created since `since`.
    async fn appointment_counts_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<AppointmentCounts, ConciergeError>;

    // stats

    /// Row counts across all entity tables, for the health surface.
    async fn entity_counts(&self) -> Result<EntityCounts, ConciergeError>;
}
