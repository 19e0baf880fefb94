// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST handler tests invoking handlers directly against a temp store.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use concierge_config::model::SchedulerConfig;
use concierge_core::traits::Store;
use concierge_core::types::{Appointment, AppointmentPatch, AppointmentStatus};
use concierge_core::wire::OutboundEvent;
use concierge_gateway::handlers;
use concierge_gateway::server::GatewayState;
use concierge_registry::ConnectionRegistry;
use concierge_scheduler::{JobContext, Scheduler};
use concierge_session::SessionPipeline;
use concierge_storage::SqliteStore;
use concierge_test_utils::{seed_appointment, seed_client, temp_store, MockResponder};

async fn gateway_state() -> (GatewayState, SqliteStore, tempfile::TempDir) {
    let (store, dir) = temp_store().await;
    let store_arc: Arc<dyn Store> = Arc::new(store.clone());
    let registry = Arc::new(ConnectionRegistry::new());
    let responder = Arc::new(MockResponder::new());
    let scheduler = Arc::new(Scheduler::new(JobContext {
        store: store_arc.clone(),
        registry: registry.clone(),
        responder: responder.clone(),
        config: SchedulerConfig::default(),
    }));
    let pipeline = SessionPipeline::new(store_arc.clone(), responder, registry.clone());
    let state = GatewayState {
        pipeline,
        store: store_arc,
        registry,
        scheduler,
        agent_name: "concierge".to_string(),
        start_time: std::time::Instant::now(),
    };
    (state, store, dir)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_counts_and_status() {
    let (state, store, _dir) = gateway_state().await;
    seed_client(&store, "c-1", "Ada").await.unwrap();

    let response = handlers::get_health(State(state)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "concierge");
    assert_eq!(json["entities"]["clients"], 1);
    assert_eq!(json["connections"], 0);
    assert_eq!(json["scheduler_running"], false);
}

#[tokio::test]
async fn get_client_creates_demo_profile() {
    let (state, _store, _dir) = gateway_state().await;

    let response =
        handlers::get_client(State(state.clone()), Path("walk-in".to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], "walk-in");
    assert_eq!(json["name"], "Demo User");
    assert_eq!(json["email"], "walk-in@example.com");

    // Second fetch returns the same profile, no duplicate.
    let response = handlers::get_client(State(state), Path("walk-in".to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_appointment_persists_and_confirms_over_socket() {
    let (state, store, _dir) = gateway_state().await;
    seed_client(&store, "c-1", "Ada").await.unwrap();
    let (_tx, mut rx) = state.registry.connect("c-1");

    let body = serde_json::from_value::<handlers::AppointmentCreate>(serde_json::json!({
        "client_id": "c-1",
        "service_type": "trim",
        "scheduled_at": "2026-03-02T09:00:00.000Z",
        "status": "confirmed",
        "price": 45.0
    }))
    .unwrap();

    let response = handlers::create_appointment(State(state), Json(body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "confirmed");
    assert_eq!(json["service_type"], "trim");

    // Confirmation pushed to the connected client.
    let event = rx.recv().await.unwrap();
    assert!(matches!(
        event,
        OutboundEvent::Message { content, .. } if content.contains("has been scheduled")
    ));

    // Confirmed booking records the client's last appointment date.
    let client = store.get_client("c-1").await.unwrap();
    assert_eq!(
        client.last_appointment_at.as_deref(),
        Some("2026-03-02T09:00:00.000Z")
    );
}

#[tokio::test]
async fn create_appointment_rejects_bad_timestamp() {
    let (state, _store, _dir) = gateway_state().await;
    let body = serde_json::from_value::<handlers::AppointmentCreate>(serde_json::json!({
        "client_id": "c-1",
        "service_type": "trim",
        "scheduled_at": "next tuesday"
    }))
    .unwrap();

    let response = handlers::create_appointment(State(state), Json(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_reschedule_clears_reminder_flag() {
    let (state, store, _dir) = gateway_state().await;
    seed_client(&store, "c-1", "Ada").await.unwrap();
    let appointment = seed_appointment(
        &store,
        "c-1",
        chrono::Utc::now() + chrono::Duration::days(1),
        AppointmentStatus::Confirmed,
    )
    .await
    .unwrap();
    store.mark_reminder_sent(&appointment.id).await.unwrap();

    let patch = AppointmentPatch {
        scheduled_at: Some("2026-06-01T10:00:00.000Z".to_string()),
        ..AppointmentPatch::default()
    };
    let response = handlers::patch_appointment(
        State(state),
        Path(appointment.id.clone()),
        Json(patch),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["scheduled_at"], "2026-06-01T10:00:00.000Z");
    assert_eq!(json["reminder_sent"], false);
}

#[tokio::test]
async fn patch_rejects_bad_timestamp_and_normalizes_good_ones() {
    let (state, store, _dir) = gateway_state().await;
    seed_client(&store, "c-1", "Ada").await.unwrap();
    let appointment = seed_appointment(
        &store,
        "c-1",
        chrono::Utc::now() + chrono::Duration::days(1),
        AppointmentStatus::Confirmed,
    )
    .await
    .unwrap();

    let bad = AppointmentPatch {
        scheduled_at: Some("03/01/2026 3pm".to_string()),
        ..AppointmentPatch::default()
    };
    let response = handlers::patch_appointment(
        State(state.clone()),
        Path(appointment.id.clone()),
        Json(bad),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // An offset timestamp is stored in the fixed UTC millisecond format.
    let offset = AppointmentPatch {
        scheduled_at: Some("2026-06-01T12:00:00+02:00".to_string()),
        ..AppointmentPatch::default()
    };
    let response = handlers::patch_appointment(
        State(state),
        Path(appointment.id.clone()),
        Json(offset),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let stored = store.get_appointment(&appointment.id).await.unwrap();
    assert_eq!(stored.scheduled_at, "2026-06-01T10:00:00.000Z");
}

#[tokio::test]
async fn patch_unknown_appointment_is_404() {
    let (state, _store, _dir) = gateway_state().await;
    let response = handlers::patch_appointment(
        State(state),
        Path("missing".to_string()),
        Json(AppointmentPatch::default()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_appointments_filters_by_status() {
    let (state, store, _dir) = gateway_state().await;
    seed_client(&store, "c-1", "Ada").await.unwrap();
    let now = chrono::Utc::now();
    seed_appointment(&store, "c-1", now + chrono::Duration::days(1), AppointmentStatus::Confirmed)
        .await
        .unwrap();
    seed_appointment(&store, "c-1", now + chrono::Duration::days(2), AppointmentStatus::Pending)
        .await
        .unwrap();

    let filter = handlers::AppointmentFilter {
        client_id: Some("c-1".to_string()),
        status: Some(AppointmentStatus::Pending),
    };
    let response = handlers::list_appointments(State(state), Query(filter)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let appointments: Vec<Appointment> =
        serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn messages_endpoint_returns_conversation_history() {
    let (state, store, _dir) = gateway_state().await;
    state
        .pipeline
        .handle_message("c-1", "hello there")
        .await
        .unwrap();
    let conversation = store.find_active_conversation("c-1").await.unwrap().unwrap();

    let response = handlers::list_messages(
        State(state),
        Path(conversation.id),
        Query(handlers::MessageQuery { limit: 50 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["sender"], "client");
    assert_eq!(json[1]["sender"], "assistant");
}

#[tokio::test]
async fn stale_socket_teardown_leaves_live_conversation_open() {
    let (state, store, _dir) = gateway_state().await;
    let (old_tx, _old_rx) = state.registry.connect("c-1");
    state.pipeline.handle_message("c-1", "hello").await.unwrap();

    // Client reconnects before the old socket's cleanup runs.
    let (new_tx, _new_rx) = state.registry.connect("c-1");
    state.pipeline.handle_message("c-1", "still here").await.unwrap();

    concierge_gateway::ws::teardown_connection(&state, "c-1", &old_tx).await;
    let conversation = store.find_active_conversation("c-1").await.unwrap();
    assert!(conversation.is_some(), "reconnect's conversation was closed");
    assert!(state.registry.is_connected("c-1"));

    // The current socket's teardown does finalize it.
    concierge_gateway::ws::teardown_connection(&state, "c-1", &new_tx).await;
    assert!(store.find_active_conversation("c-1").await.unwrap().is_none());
    assert!(!state.registry.is_connected("c-1"));
}

#[tokio::test]
async fn outreach_endpoint_is_404_for_unknown_client() {
    let (state, _store, _dir) = gateway_state().await;
    let response = handlers::post_outreach(State(state), Path("ghost".to_string())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
