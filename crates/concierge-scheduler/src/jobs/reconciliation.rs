// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nightly appointment state reconciliation.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use concierge_core::ConciergeError;
use tracing::info;

use crate::{Job, JobContext, Trigger};

/// Completes confirmed appointments that ended more than an hour ago and
/// clears stale reminder flags on appointments still in the future.
pub struct DailyReconciliation {
    trigger: Trigger,
}

impl DailyReconciliation {
    /// Fires once a day at `hour` UTC.
    pub fn new(hour: u8) -> Result<Self, ConciergeError> {
        Ok(Self {
            trigger: Trigger::cron(&format!("0 {hour} * * *"))?,
        })
    }
}

#[async_trait]
impl Job for DailyReconciliation {
    fn id(&self) -> &'static str {
        "daily-reconciliation"
    }

    fn name(&self) -> &'static str {
        "Daily Reconciliation"
    }

    fn trigger(&self) -> Trigger {
        self.trigger.clone()
    }

    async fn run(&self, ctx: &JobContext) -> Result<(), ConciergeError> {
        let now = Utc::now();

        let completed = ctx.store.complete_stale(now - Duration::hours(1)).await?;
        info!(count = completed, "past appointments marked completed");

        // Rescheduling clears the flag inline; this catches rows changed
        // outside the store API.
        let reset = ctx.store.reset_future_reminder_flags(now).await?;
        info!(count = reset, "future reminder flags reset");

        Ok(())
    }
}
