// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use concierge_core::time::{now_ts, parse_ts};
use concierge_core::types::{
    Appointment, AppointmentPatch, AppointmentStatus, Client, Conversation, EntityCounts, Message,
};
use concierge_core::wire::OutboundEvent;
use concierge_core::ConciergeError;
use concierge_scheduler::jobs::run_outreach_for_client;
use concierge_scheduler::JobInfo;
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a domain error onto an HTTP response.
fn error_response(e: ConciergeError) -> Response {
    let status = match &e {
        ConciergeError::NotFound { .. } => StatusCode::NOT_FOUND,
        ConciergeError::Config(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %e, "request failed");
    }
    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_secs: u64,
    pub connections: usize,
    pub scheduler_running: bool,
    pub entities: EntityCounts,
}

/// GET /health
///
/// Liveness plus a coarse snapshot of the system, unauthenticated.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let entities = match state.store.entity_counts().await {
        Ok(entities) => entities,
        Err(e) => return error_response(e),
    };
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.agent_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        connections: state.registry.count(),
        scheduler_running: state.scheduler.is_running(),
        entities,
    })
    .into_response()
}

/// Response body for GET /v1/jobs.
#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobInfo>,
}

/// GET /v1/jobs
pub async fn get_jobs(State(state): State<GatewayState>) -> Json<JobListResponse> {
    Json(JobListResponse {
        jobs: state.scheduler.job_infos(),
    })
}

/// GET /v1/clients/{client_id}
///
/// Returns the client profile, creating a demo profile on first sight.
pub async fn get_client(
    State(state): State<GatewayState>,
    Path(client_id): Path<String>,
) -> Response {
    match state.store.ensure_client(&client_id).await {
        Ok(client) => Json::<Client>(client).into_response(),
        Err(e) => error_response(e),
    }
}

/// Query filters for GET /v1/appointments.
#[derive(Debug, Deserialize)]
pub struct AppointmentFilter {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
}

/// GET /v1/appointments
pub async fn list_appointments(
    State(state): State<GatewayState>,
    Query(filter): Query<AppointmentFilter>,
) -> Response {
    match state
        .store
        .list_appointments(filter.client_id.as_deref(), filter.status)
        .await
    {
        Ok(appointments) => Json::<Vec<Appointment>>(appointments).into_response(),
        Err(e) => error_response(e),
    }
}

/// Request body for POST /v1/appointments.
#[derive(Debug, Deserialize)]
pub struct AppointmentCreate {
    pub client_id: String,
    pub service_type: String,
    /// RFC 3339 start time.
    pub scheduled_at: String,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: i64,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub price: f64,
}

fn default_duration_minutes() -> i64 {
    60
}

/// POST /v1/appointments
///
/// Creates an appointment and, when the client is connected, pushes a
/// confirmation message over its socket.
pub async fn create_appointment(
    State(state): State<GatewayState>,
    Json(body): Json<AppointmentCreate>,
) -> Response {
    let scheduled = match parse_ts(&body.scheduled_at) {
        Ok(dt) => dt,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("invalid scheduled_at `{}`", body.scheduled_at),
                }),
            )
                .into_response();
        }
    };

    // The client row must exist for the foreign key; walk-ins get the
    // demo profile.
    if let Err(e) = state.store.ensure_client(&body.client_id).await {
        return error_response(e);
    }

    let now = now_ts();
    let status = body.status.unwrap_or(AppointmentStatus::Pending);
    let appointment = Appointment {
        id: uuid::Uuid::new_v4().to_string(),
        client_id: body.client_id.clone(),
        service_type: body.service_type,
        scheduled_at: concierge_core::time::fmt_ts(scheduled),
        duration_minutes: body.duration_minutes,
        status,
        notes: body.notes,
        reminder_sent: false,
        price: body.price,
        created_at: now.clone(),
        updated_at: now,
    };

    let appointment = match state.store.create_appointment(&appointment).await {
        Ok(appointment) => appointment,
        Err(e) => return error_response(e),
    };

    if status == AppointmentStatus::Confirmed {
        if let Err(e) = state
            .store
            .set_last_appointment(&appointment.client_id, scheduled)
            .await
        {
            tracing::warn!(error = %e, "failed to record last appointment date");
        }
    }

    let confirmation = format!(
        "Your appointment has been scheduled for {}",
        scheduled.format("%A, %B %d at %I:%M %p")
    );
    state
        .registry
        .send_to(
            &appointment.client_id,
            OutboundEvent::message(confirmation, now_ts()),
        )
        .await;

    (StatusCode::CREATED, Json::<Appointment>(appointment)).into_response()
}

/// PATCH /v1/appointments/{appointment_id}
///
/// Partial update. Changing the date clears the reminder flag at the
/// store layer; confirming records the client's last appointment date.
pub async fn patch_appointment(
    State(state): State<GatewayState>,
    Path(appointment_id): Path<String>,
    Json(patch): Json<AppointmentPatch>,
) -> Response {
    let confirming = patch.status == Some(AppointmentStatus::Confirmed);

    // A new date goes through the same parse-and-normalize as creation,
    // so stored timestamps keep their fixed sortable format.
    let mut patch = patch;
    if let Some(raw) = patch.scheduled_at.take() {
        match parse_ts(&raw) {
            Ok(dt) => patch.scheduled_at = Some(concierge_core::time::fmt_ts(dt)),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("invalid scheduled_at `{raw}`"),
                    }),
                )
                    .into_response();
            }
        }
    }

    let appointment = match state.store.update_appointment(&appointment_id, patch).await {
        Ok(appointment) => appointment,
        Err(e) => return error_response(e),
    };

    if confirming {
        match parse_ts(&appointment.scheduled_at) {
            Ok(scheduled) => {
                if let Err(e) = state
                    .store
                    .set_last_appointment(&appointment.client_id, scheduled)
                    .await
                {
                    tracing::warn!(error = %e, "failed to record last appointment date");
                }
            }
            Err(e) => tracing::warn!(error = %e, "stored scheduled_at failed to parse"),
        }
    }

    Json::<Appointment>(appointment).into_response()
}

/// GET /v1/conversations/{client_id}
pub async fn list_conversations(
    State(state): State<GatewayState>,
    Path(client_id): Path<String>,
) -> Response {
    match state.store.list_conversations(&client_id).await {
        Ok(conversations) => Json::<Vec<Conversation>>(conversations).into_response(),
        Err(e) => error_response(e),
    }
}

/// Query parameters for GET /v1/messages/{conversation_id}.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    #[serde(default = "default_message_limit")]
    pub limit: u32,
}

fn default_message_limit() -> u32 {
    50
}

/// GET /v1/messages/{conversation_id}
///
/// The newest `limit` messages, oldest first.
pub async fn list_messages(
    State(state): State<GatewayState>,
    Path(conversation_id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Response {
    match state
        .store
        .recent_messages(&conversation_id, query.limit)
        .await
    {
        Ok(messages) => Json::<Vec<Message>>(messages).into_response(),
        Err(e) => error_response(e),
    }
}

/// Response body for POST /v1/outreach/{client_id}.
#[derive(Debug, Serialize)]
pub struct OutreachResponse {
    /// Whether the client qualified for a follow-up.
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

/// POST /v1/outreach/{client_id}
///
/// Runs the outreach job for one client on demand.
pub async fn post_outreach(
    State(state): State<GatewayState>,
    Path(client_id): Path<String>,
) -> Response {
    match run_outreach_for_client(state.scheduler.context(), &client_id).await {
        Ok(message) => Json(OutreachResponse {
            sent: message.is_some(),
            message,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_create_fills_defaults() {
        let json = r#"{
            "client_id": "c-1",
            "service_type": "consultation",
            "scheduled_at": "2026-03-02T09:00:00.000Z"
        }"#;
        let body: AppointmentCreate = serde_json::from_str(json).unwrap();
        assert_eq!(body.duration_minutes, 60);
        assert!(body.status.is_none());
        assert_eq!(body.price, 0.0);
    }

    #[test]
    fn appointment_filter_parses_status() {
        let filter: AppointmentFilter =
            serde_json::from_str(r#"{"status": "confirmed"}"#).unwrap();
        assert_eq!(filter.status, Some(AppointmentStatus::Confirmed));
        assert!(filter.client_id.is_none());
    }

    #[test]
    fn error_body_serializes() {
        let resp = ErrorResponse {
            error: "appointment not found".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("appointment not found"));
    }
}
