// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Concierge scheduling backend.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and a [`Store`] implementation over
//! typed CRUD operations for clients, conversations, messages, and
//! appointments.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::*;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use concierge_core::time::now_ts;
use concierge_core::traits::Store;
use concierge_core::types::{ConversationInitiator, MessageMeta, SenderRole};
use concierge_core::{ConciergeError, EntityCounts};
use uuid::Uuid;

/// [`Store`] backed by a single WAL-mode SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open (or create) the store at `path`.
    pub async fn open(path: &str) -> Result<Self, ConciergeError> {
        Ok(Self {
            db: Database::open(path).await?,
        })
    }

    /// Open the store described by a [`concierge_config::model::StorageConfig`].
    pub async fn from_config(
        config: &concierge_config::model::StorageConfig,
    ) -> Result<Self, ConciergeError> {
        Ok(Self {
            db: Database::from_config(config).await?,
        })
    }

    /// Access the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Close the store, flushing pending writes.
    pub async fn close(self) -> Result<(), ConciergeError> {
        self.db.close().await
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn get_client(&self, client_id: &str) -> Result<Client, ConciergeError> {
        queries::clients::get_client(&self.db, client_id)
            .await?
            .ok_or_else(|| ConciergeError::NotFound {
                entity: "client",
                id: client_id.to_string(),
            })
    }

    async fn create_client(&self, client: &Client) -> Result<(), ConciergeError> {
        queries::clients::create_client(&self.db, client).await
    }

    async fn ensure_client(&self, client_id: &str) -> Result<Client, ConciergeError> {
        if let Some(existing) = queries::clients::get_client(&self.db, client_id).await? {
            return Ok(existing);
        }
        let now = now_ts();
        let client = Client {
            id: client_id.to_string(),
            name: "Demo User".to_string(),
            email: format!("{client_id}@example.com"),
            phone: None,
            preferences: None,
            last_appointment_at: None,
            created_at: now.clone(),
            updated_at: now,
        };
        queries::clients::create_client(&self.db, &client).await?;
        Ok(client)
    }

    async fn list_clients(&self) -> Result<Vec<Client>, ConciergeError> {
        queries::clients::list_clients(&self.db).await
    }

    async fn count_clients(&self) -> Result<u64, ConciergeError> {
        queries::clients::count_clients(&self.db).await
    }

    async fn clients_created_since(&self, since: DateTime<Utc>) -> Result<u64, ConciergeError> {
        queries::clients::clients_created_since(&self.db, since).await
    }

    async fn set_last_appointment(
        &self,
        client_id: &str,
        scheduled_at: DateTime<Utc>,
    ) -> Result<(), ConciergeError> {
        queries::clients::set_last_appointment(&self.db, client_id, scheduled_at).await
    }

    async fn find_active_conversation(
        &self,
        client_id: &str,
    ) -> Result<Option<Conversation>, ConciergeError> {
        queries::conversations::find_active_conversation(&self.db, client_id).await
    }

    async fn create_conversation(
        &self,
        client_id: &str,
        initiator: ConversationInitiator,
    ) -> Result<Conversation, ConciergeError> {
        // System-initiated conversations are proactive outreach and must not
        // occupy the client's active-conversation slot.
        let status = match initiator {
            ConversationInitiator::Client => ConversationStatus::Active,
            ConversationInitiator::System => ConversationStatus::Outreach,
        };
        let conversation = Conversation {
            id: Uuid::new_v4().to_string(),
            client_id: client_id.to_string(),
            started_at: now_ts(),
            ended_at: None,
            status,
            initiated_by: initiator,
            summary: None,
        };
        queries::conversations::create_conversation(&self.db, &conversation).await?;
        Ok(conversation)
    }

    async fn end_conversation(
        &self,
        conversation_id: &str,
        ended_at: DateTime<Utc>,
        summary: Option<String>,
    ) -> Result<(), ConciergeError> {
        queries::conversations::end_conversation(&self.db, conversation_id, ended_at, summary).await
    }

    async fn list_conversations(
        &self,
        client_id: &str,
    ) -> Result<Vec<Conversation>, ConciergeError> {
        queries::conversations::list_conversations(&self.db, client_id).await
    }

    async fn insert_message(
        &self,
        conversation_id: &str,
        role: SenderRole,
        content: &str,
        meta: Option<MessageMeta>,
    ) -> Result<Message, ConciergeError> {
        let message = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            content: content.to_string(),
            sender: role,
            created_at: now_ts(),
            metadata: meta.map(|m| m.to_json()),
        };
        queries::messages::insert_message(&self.db, &message).await?;
        Ok(message)
    }

    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> Result<Vec<Message>, ConciergeError> {
        queries::messages::recent_messages(&self.db, conversation_id, limit).await
    }

    async fn count_messages(&self, conversation_id: &str) -> Result<u64, ConciergeError> {
        queries::messages::count_messages(&self.db, conversation_id).await
    }

    async fn create_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<Appointment, ConciergeError> {
        queries::appointments::create_appointment(&self.db, appointment).await?;
        Ok(appointment.clone())
    }

    async fn get_appointment(&self, appointment_id: &str) -> Result<Appointment, ConciergeError> {
        queries::appointments::get_appointment(&self.db, appointment_id)
            .await?
            .ok_or_else(|| ConciergeError::NotFound {
                entity: "appointment",
                id: appointment_id.to_string(),
            })
    }

    async fn list_appointments(
        &self,
        client_id: Option<&str>,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, ConciergeError> {
        queries::appointments::list_appointments(&self.db, client_id, status).await
    }

    async fn update_appointment(
        &self,
        appointment_id: &str,
        patch: AppointmentPatch,
    ) -> Result<Appointment, ConciergeError> {
        queries::appointments::update_appointment(&self.db, appointment_id, patch)
            .await?
            .ok_or_else(|| ConciergeError::NotFound {
                entity: "appointment",
                id: appointment_id.to_string(),
            })
    }

    async fn reminders_due(
        &self,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, ConciergeError> {
        queries::appointments::reminders_due(&self.db, now, until).await
    }

    async fn mark_reminder_sent(&self, appointment_id: &str) -> Result<(), ConciergeError> {
        queries::appointments::mark_reminder_sent(&self.db, appointment_id).await
    }

    async fn starting_between(
        &self,
        now: DateTime<Utc>,
        soon: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, ConciergeError> {
        queries::appointments::starting_between(&self.db, now, soon).await
    }

    async fn complete_stale(&self, cutoff: DateTime<Utc>) -> Result<u64, ConciergeError> {
        queries::appointments::complete_stale(&self.db, cutoff).await
    }

    async fn reset_future_reminder_flags(&self, now: DateTime<Utc>) -> Result<u64, ConciergeError> {
        queries::appointments::reset_future_reminder_flags(&self.db, now).await
    }

    async fn appointment_counts_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<AppointmentCounts, ConciergeError> {
        queries::appointments::appointment_counts_since(&self.db, since).await
    }

    async fn entity_counts(&self) -> Result<EntityCounts, ConciergeError> {
        queries::stats::entity_counts(&self.db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("store.db");
        let store = SqliteStore::open(db_path.to_str().unwrap()).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn ensure_client_creates_default_profile() {
        let (store, _dir) = setup_store().await;

        let created = store.ensure_client("walk-in-7").await.unwrap();
        assert_eq!(created.name, "Demo User");
        assert_eq!(created.email, "walk-in-7@example.com");

        // Second call finds the same row.
        let found = store.ensure_client("walk-in-7").await.unwrap();
        assert_eq!(found.created_at, created.created_at);
        assert_eq!(store.count_clients().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn get_missing_client_is_not_found() {
        let (store, _dir) = setup_store().await;
        let err = store.get_client("ghost").await.unwrap_err();
        assert!(matches!(
            err,
            ConciergeError::NotFound { entity: "client", .. }
        ));
    }

    #[tokio::test]
    async fn conversation_and_message_flow() {
        let (store, _dir) = setup_store().await;
        store.ensure_client("c-1").await.unwrap();

        let conversation = store
            .create_conversation("c-1", ConversationInitiator::Client)
            .await
            .unwrap();
        assert_eq!(conversation.status, ConversationStatus::Active);

        let msg = store
            .insert_message(&conversation.id, SenderRole::Client, "hello", None)
            .await
            .unwrap();
        assert_eq!(msg.sender, SenderRole::Client);

        let meta = MessageMeta {
            intent: Some(concierge_core::Intent::Scheduling),
            actions: Vec::new(),
        };
        store
            .insert_message(&conversation.id, SenderRole::Assistant, "hi there", Some(meta))
            .await
            .unwrap();

        let history = store.recent_messages(&conversation.id, 20).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "hello");
        assert_eq!(store.count_messages(&conversation.id).await.unwrap(), 2);

        let counts = store.entity_counts().await.unwrap();
        assert_eq!(counts.clients, 1);
        assert_eq!(counts.conversations, 1);
        assert_eq!(counts.messages, 2);
    }

    #[tokio::test]
    async fn update_missing_appointment_is_not_found() {
        let (store, _dir) = setup_store().await;
        let err = store
            .update_appointment("ghost", AppointmentPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConciergeError::NotFound { entity: "appointment", .. }
        ));
    }
}
