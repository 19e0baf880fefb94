// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment CRUD operations and scheduler support queries.

use chrono::{DateTime, Utc};
use concierge_core::ConciergeError;
use concierge_core::time::{fmt_ts, now_ts};
use rusqlite::{params, params_from_iter};

use crate::database::{Database, map_tr_err};
use crate::models::{Appointment, AppointmentCounts, AppointmentPatch, AppointmentStatus};
use crate::queries::parse_enum;

const APPOINTMENT_COLUMNS: &str = "id, client_id, service_type, scheduled_at, duration_minutes, \
     status, notes, reminder_sent, price, created_at, updated_at";

fn row_to_appointment(row: &rusqlite::Row<'_>) -> Result<Appointment, rusqlite::Error> {
    Ok(Appointment {
        id: row.get(0)?,
        client_id: row.get(1)?,
        service_type: row.get(2)?,
        scheduled_at: row.get(3)?,
        duration_minutes: row.get(4)?,
        status: parse_enum(row, 5)?,
        notes: row.get(6)?,
        reminder_sent: row.get(7)?,
        price: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Insert a new appointment.
pub async fn create_appointment(
    db: &Database,
    appointment: &Appointment,
) -> Result<(), ConciergeError> {
    let appointment = appointment.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO appointments (id, client_id, service_type, scheduled_at, duration_minutes,
                                           status, notes, reminder_sent, price, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    appointment.id,
                    appointment.client_id,
                    appointment.service_type,
                    appointment.scheduled_at,
                    appointment.duration_minutes,
                    appointment.status.to_string(),
                    appointment.notes,
                    appointment.reminder_sent,
                    appointment.price,
                    appointment.created_at,
                    appointment.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get an appointment by ID.
pub async fn get_appointment(
    db: &Database,
    id: &str,
) -> Result<Option<Appointment>, ConciergeError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_appointment);
            match result {
                Ok(appointment) => Ok(Some(appointment)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List appointments, optionally filtered by client and/or status.
/// Ordered by scheduled time.
pub async fn list_appointments(
    db: &Database,
    client_id: Option<&str>,
    status: Option<AppointmentStatus>,
) -> Result<Vec<Appointment>, ConciergeError> {
    let client_id = client_id.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            let mut conditions: Vec<&str> = Vec::new();
            let mut values: Vec<String> = Vec::new();
            if let Some(client_id) = client_id {
                conditions.push("client_id = ?");
                values.push(client_id);
            }
            if let Some(status) = status {
                conditions.push("status = ?");
                values.push(status.to_string());
            }
            let where_clause = if conditions.is_empty() {
                String::new()
            } else {
                format!(" WHERE {}", conditions.join(" AND "))
            };
            let mut stmt = conn.prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments{where_clause} ORDER BY scheduled_at"
            ))?;
            let rows = stmt.query_map(params_from_iter(values.iter()), row_to_appointment)?;
            let mut appointments = Vec::new();
            for row in rows {
                appointments.push(row?);
            }
            Ok(appointments)
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a partial update to an appointment and return the updated row.
///
/// A change to `scheduled_at` clears the reminder flag so the new date
/// gets its own reminder. Returns `None` when the appointment does not exist.
pub async fn update_appointment(
    db: &Database,
    id: &str,
    patch: AppointmentPatch,
) -> Result<Option<Appointment>, ConciergeError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut sets: Vec<&str> = Vec::new();
            let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            if let Some(v) = patch.service_type {
                sets.push("service_type = ?");
                values.push(Box::new(v));
            }
            if let Some(v) = patch.scheduled_at {
                sets.push("scheduled_at = ?");
                values.push(Box::new(v));
                sets.push("reminder_sent = 0");
            }
            if let Some(v) = patch.duration_minutes {
                sets.push("duration_minutes = ?");
                values.push(Box::new(v));
            }
            if let Some(v) = patch.status {
                sets.push("status = ?");
                values.push(Box::new(v.to_string()));
            }
            if let Some(v) = patch.notes {
                sets.push("notes = ?");
                values.push(Box::new(v));
            }
            if let Some(v) = patch.price {
                sets.push("price = ?");
                values.push(Box::new(v));
            }
            sets.push("updated_at = ?");
            values.push(Box::new(now_ts()));
            values.push(Box::new(id.clone()));

            let sql = format!("UPDATE appointments SET {} WHERE id = ?", sets.join(", "));
            let changed =
                conn.execute(&sql, params_from_iter(values.iter().map(|v| v.as_ref())))?;
            if changed == 0 {
                return Ok(None);
            }

            let mut stmt = conn.prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"
            ))?;
            let appointment = stmt.query_row(params![id], row_to_appointment)?;
            Ok(Some(appointment))
        })
        .await
        .map_err(map_tr_err)
}

/// Confirmed appointments in `(now, until]` with no reminder sent yet.
pub async fn reminders_due(
    db: &Database,
    now: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<Appointment>, ConciergeError> {
    let now = fmt_ts(now);
    let until = fmt_ts(until);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments
                 WHERE status = 'confirmed' AND reminder_sent = 0
                   AND scheduled_at > ?1 AND scheduled_at <= ?2
                 ORDER BY scheduled_at"
            ))?;
            let rows = stmt.query_map(params![now, until], row_to_appointment)?;
            let mut appointments = Vec::new();
            for row in rows {
                appointments.push(row?);
            }
            Ok(appointments)
        })
        .await
        .map_err(map_tr_err)
}

/// Set the reminder flag on an appointment.
pub async fn mark_reminder_sent(db: &Database, id: &str) -> Result<(), ConciergeError> {
    let id = id.to_string();
    let now = now_ts();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE appointments SET reminder_sent = 1, updated_at = ?1 WHERE id = ?2",
                params![now, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Confirmed appointments starting in `(now, soon]`.
pub async fn starting_between(
    db: &Database,
    now: DateTime<Utc>,
    soon: DateTime<Utc>,
) -> Result<Vec<Appointment>, ConciergeError> {
    let now = fmt_ts(now);
    let soon = fmt_ts(soon);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments
                 WHERE status = 'confirmed' AND scheduled_at > ?1 AND scheduled_at <= ?2
                 ORDER BY scheduled_at"
            ))?;
            let rows = stmt.query_map(params![now, soon], row_to_appointment)?;
            let mut appointments = Vec::new();
            for row in rows {
                appointments.push(row?);
            }
            Ok(appointments)
        })
        .await
        .map_err(map_tr_err)
}

/// Move confirmed appointments scheduled before `cutoff` to completed.
/// Returns the number of rows changed.
pub async fn complete_stale(db: &Database, cutoff: DateTime<Utc>) -> Result<u64, ConciergeError> {
    let cutoff = fmt_ts(cutoff);
    let now = now_ts();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE appointments SET status = 'completed', updated_at = ?1
                 WHERE status = 'confirmed' AND scheduled_at < ?2",
                params![now, cutoff],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Clear stale reminder flags on appointments still in the future.
/// Returns the number of rows changed.
pub async fn reset_future_reminder_flags(
    db: &Database,
    now: DateTime<Utc>,
) -> Result<u64, ConciergeError> {
    let now_fmt = fmt_ts(now);
    let updated = now_ts();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE appointments SET reminder_sent = 0, updated_at = ?1
                 WHERE reminder_sent = 1 AND scheduled_at > ?2",
                params![updated, now_fmt],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Weekly-report tallies over appointments created since `since`.
pub async fn appointment_counts_since(
    db: &Database,
    since: DateTime<Utc>,
) -> Result<AppointmentCounts, ConciergeError> {
    let since = fmt_ts(since);
    db.connection()
        .call(move |conn| {
            let counts = conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(CASE WHEN status = 'confirmed' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN status = 'cancelled' THEN 1 ELSE 0 END), 0)
                 FROM appointments WHERE created_at >= ?1",
                params![since],
                |row| {
                    Ok(AppointmentCounts {
                        created: row.get(0)?,
                        confirmed: row.get(1)?,
                        completed: row.get(2)?,
                        cancelled: row.get(3)?,
                    })
                },
            )?;
            Ok(counts)
        })
        .await
        .map_err(map_tr_err)
}
