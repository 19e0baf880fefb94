// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serve command implementation.
//!
//! Wires the storage, responder, registry, session pipeline, scheduler
//! and gateway together, then serves until a shutdown signal arrives.

use std::sync::Arc;

use tracing::{error, info};

use concierge_config::model::ConciergeConfig;
use concierge_core::ConciergeError;
use concierge_core::traits::Store;
use concierge_gateway::{GatewayState, start_server};
use concierge_registry::ConnectionRegistry;
use concierge_scheduler::jobs::{
    DailyReconciliation, ReminderSweep, UpcomingSweep, WeeklyReport,
};
use concierge_scheduler::{JobContext, Scheduler};
use concierge_session::SessionPipeline;
use concierge_storage::SqliteStore;

pub async fn run_serve(config: ConciergeConfig) -> Result<(), ConciergeError> {
    // Initialize tracing subscriber.
    init_tracing(&config.agent.log_level);

    info!("starting concierge serve");

    // Initialize storage. Migrations run on open.
    let sqlite = SqliteStore::from_config(&config.storage).await?;
    let store: Arc<dyn Store> = Arc::new(sqlite.clone());
    info!(
        path = config.storage.database_path.as_str(),
        "storage ready"
    );

    // Reply backend: HTTP when an endpoint is configured, keyword
    // fallback otherwise.
    let responder = concierge_responder::responder_from_config(&config.responder)?;

    let registry = Arc::new(ConnectionRegistry::new());
    let pipeline =
        SessionPipeline::new(store.clone(), responder.clone(), registry.clone());

    // Build the scheduler and register background jobs.
    let mut scheduler = Scheduler::new(JobContext {
        store: store.clone(),
        registry: registry.clone(),
        responder: responder.clone(),
        config: config.scheduler.clone(),
    });
    if config.scheduler.enabled {
        scheduler.register(Arc::new(ReminderSweep::new()?));
        scheduler.register(Arc::new(UpcomingSweep::new()));
        scheduler.register(Arc::new(DailyReconciliation::new(
            config.scheduler.reconciliation_hour,
        )?));
        scheduler.register(Arc::new(WeeklyReport::new()?));
    }
    let scheduler = Arc::new(scheduler);

    if config.scheduler.enabled {
        scheduler.start().await;
        info!(jobs = scheduler.job_infos().len(), "scheduler started");
    } else {
        info!("scheduler disabled by configuration");
    }

    // Install signal handler.
    let cancel = concierge_session::install_signal_handler();

    let state = GatewayState {
        pipeline,
        store,
        registry,
        scheduler: scheduler.clone(),
        agent_name: config.agent.name.clone(),
        start_time: std::time::Instant::now(),
    };

    // Serves until the cancellation token fires.
    start_server(&config.server, state, cancel.clone()).await?;

    scheduler.stop().await;
    if let Err(e) = sqlite.close().await {
        error!(error = %e, "storage close failed");
    }

    info!("concierge serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("concierge={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
