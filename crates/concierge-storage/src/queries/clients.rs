// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client profile CRUD operations.

use concierge_core::ConciergeError;
use concierge_core::time::fmt_ts;
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::Client;

const CLIENT_COLUMNS: &str =
    "id, name, email, phone, preferences, last_appointment_at, created_at, updated_at";

fn row_to_client(row: &rusqlite::Row<'_>) -> Result<Client, rusqlite::Error> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        preferences: row.get(4)?,
        last_appointment_at: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Insert a new client profile.
pub async fn create_client(db: &Database, client: &Client) -> Result<(), ConciergeError> {
    let client = client.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO clients (id, name, email, phone, preferences, last_appointment_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    client.id,
                    client.name,
                    client.email,
                    client.phone,
                    client.preferences,
                    client.last_appointment_at,
                    client.created_at,
                    client.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a client by ID.
pub async fn get_client(db: &Database, id: &str) -> Result<Option<Client>, ConciergeError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_client);
            match result {
                Ok(client) => Ok(Some(client)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List all clients, most recently created first.
pub async fn list_clients(db: &Database) -> Result<Vec<Client>, ConciergeError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map([], row_to_client)?;
            let mut clients = Vec::new();
            for row in rows {
                clients.push(row?);
            }
            Ok(clients)
        })
        .await
        .map_err(map_tr_err)
}

/// Count all clients.
pub async fn count_clients(db: &Database) -> Result<u64, ConciergeError> {
    db.connection()
        .call(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Count clients created at or after `since`.
pub async fn clients_created_since(
    db: &Database,
    since: DateTime<Utc>,
) -> Result<u64, ConciergeError> {
    let since = fmt_ts(since);
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM clients WHERE created_at >= ?1",
                params![since],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Record the client's most recent appointment date.
pub async fn set_last_appointment(
    db: &Database,
    id: &str,
    scheduled_at: DateTime<Utc>,
) -> Result<(), ConciergeError> {
    let id = id.to_string();
    let scheduled_at = fmt_ts(scheduled_at);
    let now = concierge_core::time::now_ts();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE clients SET last_appointment_at = ?1, updated_at = ?2 WHERE id = ?3",
                params![scheduled_at, now, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_client(id: &str) -> Client {
        Client {
            id: id.to_string(),
            name: "Ada".to_string(),
            email: format!("{id}@example.com"),
            phone: None,
            preferences: None,
            last_appointment_at: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_get_client_roundtrips() {
        let (db, _dir) = setup_db().await;
        create_client(&db, &make_client("c-1")).await.unwrap();

        let retrieved = get_client(&db, "c-1").await.unwrap().unwrap();
        assert_eq!(retrieved.id, "c-1");
        assert_eq!(retrieved.email, "c-1@example.com");
        assert!(retrieved.last_appointment_at.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_nonexistent_client_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_client(&db, "ghost").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn counts_and_created_since() {
        let (db, _dir) = setup_db().await;
        let mut a = make_client("a");
        a.created_at = "2026-01-01T00:00:00.000Z".to_string();
        let mut b = make_client("b");
        b.created_at = "2026-02-01T00:00:00.000Z".to_string();
        create_client(&db, &a).await.unwrap();
        create_client(&db, &b).await.unwrap();

        assert_eq!(count_clients(&db).await.unwrap(), 2);

        let since = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(clients_created_since(&db, since).await.unwrap(), 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_last_appointment_updates_row() {
        let (db, _dir) = setup_db().await;
        create_client(&db, &make_client("c-2")).await.unwrap();

        let when = Utc.with_ymd_and_hms(2026, 3, 5, 14, 0, 0).unwrap();
        set_last_appointment(&db, "c-2", when).await.unwrap();

        let retrieved = get_client(&db, "c-2").await.unwrap().unwrap();
        assert_eq!(
            retrieved.last_appointment_at.as_deref(),
            Some("2026-03-05T14:00:00.000Z")
        );
        db.close().await.unwrap();
    }
}
