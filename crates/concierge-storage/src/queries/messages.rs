// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message CRUD operations.

use concierge_core::ConciergeError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::Message;
use crate::queries::parse_enum;

const MESSAGE_COLUMNS: &str = "id, conversation_id, content, sender, created_at, metadata";

fn row_to_message(row: &rusqlite::Row<'_>) -> Result<Message, rusqlite::Error> {
    Ok(Message {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        content: row.get(2)?,
        sender: parse_enum(row, 3)?,
        created_at: row.get(4)?,
        metadata: row.get(5)?,
    })
}

/// Insert a new message.
pub async fn insert_message(db: &Database, message: &Message) -> Result<(), ConciergeError> {
    let message = message.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, conversation_id, content, sender, created_at, metadata)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    message.id,
                    message.conversation_id,
                    message.content,
                    message.sender.to_string(),
                    message.created_at,
                    message.metadata,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// The newest `limit` messages in a conversation, returned oldest first.
pub async fn recent_messages(
    db: &Database,
    conversation_id: &str,
    limit: u32,
) -> Result<Vec<Message>, ConciergeError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY created_at DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![conversation_id, limit], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            // Query is newest-first for the LIMIT; callers want chronological.
            messages.reverse();
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

/// Count messages in a conversation.
pub async fn count_messages(db: &Database, conversation_id: &str) -> Result<u64, ConciergeError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE conversation_id = ?1",
                params![conversation_id],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
        .map_err(map_tr_err)
}
