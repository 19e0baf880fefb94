// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation CRUD operations.

use chrono::{DateTime, Utc};
use concierge_core::ConciergeError;
use concierge_core::time::fmt_ts;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{Conversation, ConversationStatus};
use crate::queries::parse_enum;

const CONVERSATION_COLUMNS: &str =
    "id, client_id, started_at, ended_at, status, initiated_by, summary";

fn row_to_conversation(row: &rusqlite::Row<'_>) -> Result<Conversation, rusqlite::Error> {
    Ok(Conversation {
        id: row.get(0)?,
        client_id: row.get(1)?,
        started_at: row.get(2)?,
        ended_at: row.get(3)?,
        status: parse_enum(row, 4)?,
        initiated_by: parse_enum(row, 5)?,
        summary: row.get(6)?,
    })
}

/// Insert a new conversation.
pub async fn create_conversation(
    db: &Database,
    conversation: &Conversation,
) -> Result<(), ConciergeError> {
    let conversation = conversation.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversations (id, client_id, started_at, ended_at, status, initiated_by, summary)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    conversation.id,
                    conversation.client_id,
                    conversation.started_at,
                    conversation.ended_at,
                    conversation.status.to_string(),
                    conversation.initiated_by.to_string(),
                    conversation.summary,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Find the client's active conversation, newest first if several exist.
pub async fn find_active_conversation(
    db: &Database,
    client_id: &str,
) -> Result<Option<Conversation>, ConciergeError> {
    let client_id = client_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONVERSATION_COLUMNS} FROM conversations
                 WHERE client_id = ?1 AND status = ?2
                 ORDER BY started_at DESC LIMIT 1"
            ))?;
            let result = stmt.query_row(
                params![client_id, ConversationStatus::Active.to_string()],
                row_to_conversation,
            );
            match result {
                Ok(conversation) => Ok(Some(conversation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Mark a conversation as ended, storing an optional summary.
pub async fn end_conversation(
    db: &Database,
    id: &str,
    ended_at: DateTime<Utc>,
    summary: Option<String>,
) -> Result<(), ConciergeError> {
    let id = id.to_string();
    let ended_at = fmt_ts(ended_at);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE conversations SET status = ?1, ended_at = ?2, summary = COALESCE(?3, summary)
                 WHERE id = ?4",
                params![
                    ConversationStatus::Ended.to_string(),
                    ended_at,
                    summary,
                    id
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// List a client's conversations, newest first.
pub async fn list_conversations(
    db: &Database,
    client_id: &str,
) -> Result<Vec<Conversation>, ConciergeError> {
    let client_id = client_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONVERSATION_COLUMNS} FROM conversations
                 WHERE client_id = ?1 ORDER BY started_at DESC"
            ))?;
            let rows = stmt.query_map(params![client_id], row_to_conversation)?;
            let mut conversations = Vec::new();
            for row in rows {
                conversations.push(row?);
            }
            Ok(conversations)
        })
        .await
        .map_err(map_tr_err)
}
