// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row counts across entity tables, for the health surface.

use concierge_core::ConciergeError;

use crate::database::{Database, map_tr_err};
use crate::models::EntityCounts;

/// Count rows in each entity table.
pub async fn entity_counts(db: &Database) -> Result<EntityCounts, ConciergeError> {
    db.connection()
        .call(|conn| {
            let count = |table: &str| -> Result<i64, rusqlite::Error> {
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })
            };
            Ok(EntityCounts {
                clients: count("clients")?,
                conversations: count("conversations")?,
                messages: count("messages")?,
                appointments: count("appointments")?,
            })
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn empty_database_counts_zero() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let counts = entity_counts(&db).await.unwrap();
        assert_eq!(counts.clients, 0);
        assert_eq!(counts.conversations, 0);
        assert_eq!(counts.messages, 0);
        assert_eq!(counts.appointments, 0);
        db.close().await.unwrap();
    }
}
