// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for integration tests.
//!
//! Provides a temp-directory SQLite store plus seed helpers for the
//! common entities, so integration tests don't repeat row-building
//! boilerplate.

use concierge_core::ConciergeError;
use concierge_core::time::{fmt_ts, now_ts};
use concierge_core::traits::Store;
use concierge_core::types::{Appointment, AppointmentStatus, Client};
use concierge_storage::SqliteStore;
use chrono::{DateTime, Utc};
use tempfile::TempDir;
use uuid::Uuid;

/// Open a fresh store in a temp directory.
///
/// The returned `TempDir` must be kept alive for the duration of the test.
pub async fn temp_store() -> (SqliteStore, TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = dir.path().join("concierge-test.db");
    let store = SqliteStore::open(db_path.to_str().expect("non-utf8 temp path"))
        .await
        .expect("failed to open test store");
    (store, dir)
}

/// Insert a client with the given ID and name.
pub async fn seed_client(
    store: &SqliteStore,
    id: &str,
    name: &str,
) -> Result<Client, ConciergeError> {
    let now = now_ts();
    let client = Client {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{id}@example.com"),
        phone: None,
        preferences: None,
        last_appointment_at: None,
        created_at: now.clone(),
        updated_at: now,
    };
    store.create_client(&client).await?;
    Ok(client)
}

/// Insert an appointment for a client at `scheduled_at`.
pub async fn seed_appointment(
    store: &SqliteStore,
    client_id: &str,
    scheduled_at: DateTime<Utc>,
    status: AppointmentStatus,
) -> Result<Appointment, ConciergeError> {
    let now = now_ts();
    let appointment = Appointment {
        id: Uuid::new_v4().to_string(),
        client_id: client_id.to_string(),
        service_type: "consultation".to_string(),
        scheduled_at: fmt_ts(scheduled_at),
        duration_minutes: 60,
        status,
        notes: None,
        reminder_sent: false,
        price: 50.0,
        created_at: now.clone(),
        updated_at: now,
    };
    store.create_appointment(&appointment).await
}
