// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background job scheduler for the Concierge backend.
//!
//! Jobs implement the [`Job`] trait and declare when they fire via a
//! [`Trigger`] (cron or fixed interval). The [`Scheduler`] runs one tokio
//! task per registered job; each task sleeps until the next occurrence,
//! runs the job, and loops. A job failure is logged and never kills its
//! task. `stop()` cancels all job tasks through a shared
//! [`CancellationToken`].

pub mod jobs;
pub mod trigger;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use concierge_config::model::SchedulerConfig;
use concierge_core::time::fmt_ts;
use concierge_core::{ConciergeError, Responder, Store};
use concierge_registry::ConnectionRegistry;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub use trigger::Trigger;

/// Shared dependencies handed to every job run.
#[derive(Clone)]
pub struct JobContext {
    pub store: Arc<dyn Store>,
    pub registry: Arc<ConnectionRegistry>,
    pub responder: Arc<dyn Responder>,
    pub config: SchedulerConfig,
}

/// A periodic background task.
#[async_trait]
pub trait Job: Send + Sync {
    /// Stable machine identifier, used in logs and the jobs surface.
    fn id(&self) -> &'static str;

    /// Human-readable name.
    fn name(&self) -> &'static str;

    /// When this job fires.
    fn trigger(&self) -> Trigger;

    async fn run(&self, ctx: &JobContext) -> Result<(), ConciergeError>;
}

/// Introspection record for one registered job.
#[derive(Debug, Clone, Serialize)]
pub struct JobInfo {
    pub id: &'static str,
    pub name: &'static str,
    /// Next firing instant, absent when the schedule has no future occurrence.
    pub next_run: Option<String>,
    pub trigger: String,
}

/// Runs registered jobs on their triggers until stopped.
pub struct Scheduler {
    ctx: JobContext,
    jobs: Vec<Arc<dyn Job>>,
    cancel: CancellationToken,
    handles: Mutex<Vec<JoinHandle<()>>>,
    running: AtomicBool,
}

impl Scheduler {
    pub fn new(ctx: JobContext) -> Self {
        Self {
            ctx,
            jobs: Vec::new(),
            cancel: CancellationToken::new(),
            handles: Mutex::new(Vec::new()),
            running: AtomicBool::new(false),
        }
    }

    /// The shared job context, also used for on-demand job runs.
    pub fn context(&self) -> &JobContext {
        &self.ctx
    }

    /// Register a job. Must be called before [`Scheduler::start`].
    pub fn register(&mut self, job: Arc<dyn Job>) {
        self.jobs.push(job);
    }

    /// Spawn one task per registered job.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("scheduler already running");
            return;
        }

        let mut handles = self.handles.lock().await;
        for job in &self.jobs {
            let job = Arc::clone(job);
            let ctx = self.ctx.clone();
            let cancel = self.cancel.clone();
            info!(job = job.id(), schedule = %job.trigger().describe(), "job scheduled");

            handles.push(tokio::spawn(async move {
                loop {
                    let now = Utc::now();
                    let Some(next) = job.trigger().next_run(now) else {
                        warn!(job = job.id(), "no future occurrence, job task exiting");
                        break;
                    };
                    let wait = (next - now).to_std().unwrap_or_default();
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(wait) => {}
                    }

                    debug!(job = job.id(), "job firing");
                    if let Err(e) = job.run(&ctx).await {
                        error!(job = job.id(), error = %e, "job run failed");
                    }
                }
            }));
        }
        info!(jobs = self.jobs.len(), "scheduler started");
    }

    /// Cancel all job tasks and wait for them to exit.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.cancel.cancel();
        let mut handles = self.handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        info!("scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Snapshot of every registered job with its next firing time.
    pub fn job_infos(&self) -> Vec<JobInfo> {
        let now = Utc::now();
        self.jobs
            .iter()
            .map(|job| {
                let trigger = job.trigger();
                JobInfo {
                    id: job.id(),
                    name: job.name(),
                    next_run: trigger.next_run(now).map(fmt_ts),
                    trigger: trigger.describe(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::types::{Client, ClientContext, Message, ResponderReply};
    use concierge_test_utils::temp_store;

    struct NullResponder;

    #[async_trait]
    impl Responder for NullResponder {
        async fn respond(
            &self,
            _message: &str,
            _history: &[Message],
            _ctx: &ClientContext,
        ) -> Result<ResponderReply, ConciergeError> {
            Ok(ResponderReply {
                text: String::new(),
                intent: concierge_core::types::Intent::General,
                actions: Vec::new(),
            })
        }

        async fn summarize(&self, _messages: &[Message]) -> Result<String, ConciergeError> {
            Ok(String::new())
        }

        async fn suggest_follow_up(
            &self,
            _client: &Client,
        ) -> Result<Option<String>, ConciergeError> {
            Ok(None)
        }
    }

    struct TickJob {
        ticks: Arc<std::sync::atomic::AtomicU32>,
    }

    #[async_trait]
    impl Job for TickJob {
        fn id(&self) -> &'static str {
            "tick"
        }

        fn name(&self) -> &'static str {
            "Tick"
        }

        fn trigger(&self) -> Trigger {
            Trigger::Interval(std::time::Duration::from_millis(20))
        }

        async fn run(&self, _ctx: &JobContext) -> Result<(), ConciergeError> {
            self.ticks.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn test_ctx() -> (JobContext, tempfile::TempDir) {
        let (store, dir) = temp_store().await;
        let ctx = JobContext {
            store: Arc::new(store),
            registry: Arc::new(ConnectionRegistry::new()),
            responder: Arc::new(NullResponder),
            config: SchedulerConfig::default(),
        };
        (ctx, dir)
    }

    #[tokio::test]
    async fn interval_job_fires_repeatedly_until_stopped() {
        let (ctx, _dir) = test_ctx().await;
        let ticks = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let mut scheduler = Scheduler::new(ctx);
        scheduler.register(Arc::new(TickJob {
            ticks: Arc::clone(&ticks),
        }));

        scheduler.start().await;
        assert!(scheduler.is_running());
        tokio::time::sleep(std::time::Duration::from_millis(110)).await;
        scheduler.stop().await;
        assert!(!scheduler.is_running());

        let fired = ticks.load(Ordering::SeqCst);
        assert!(fired >= 2, "expected repeated firings, got {fired}");

        // No further firings after stop.
        tokio::time::sleep(std::time::Duration::from_millis(60)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), fired);
    }

    #[tokio::test]
    async fn job_infos_reports_schedule() {
        let (ctx, _dir) = test_ctx().await;
        let mut scheduler = Scheduler::new(ctx);
        scheduler.register(Arc::new(TickJob {
            ticks: Arc::new(std::sync::atomic::AtomicU32::new(0)),
        }));

        let infos = scheduler.job_infos();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].id, "tick");
        assert!(infos[0].next_run.is_some());
    }

    #[tokio::test]
    async fn double_start_is_harmless() {
        let (ctx, _dir) = test_ctx().await;
        let scheduler = Scheduler::new(ctx);
        scheduler.start().await;
        scheduler.start().await;
        scheduler.stop().await;
    }
}
