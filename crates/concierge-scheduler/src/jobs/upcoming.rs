// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Imminent-start notifications for confirmed appointments.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use concierge_core::time::{now_ts, parse_ts};
use concierge_core::wire::OutboundEvent;
use concierge_core::ConciergeError;
use tracing::warn;

use crate::{Job, JobContext, Trigger};

/// Notifies connected clients whose confirmed appointment starts inside the
/// upcoming window. Nothing is persisted, so a client can be notified on
/// consecutive sweeps while the appointment is still in the window.
pub struct UpcomingSweep;

impl UpcomingSweep {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Job for UpcomingSweep {
    fn id(&self) -> &'static str {
        "upcoming-sweep"
    }

    fn name(&self) -> &'static str {
        "Check Upcoming Appointments"
    }

    fn trigger(&self) -> Trigger {
        Trigger::every_minutes(15)
    }

    async fn run(&self, ctx: &JobContext) -> Result<(), ConciergeError> {
        let now = Utc::now();
        let soon = now + Duration::minutes(i64::from(ctx.config.upcoming_window_minutes));
        let starting = ctx.store.starting_between(now, soon).await?;

        for appointment in &starting {
            let scheduled = match parse_ts(&appointment.scheduled_at) {
                Ok(dt) => dt,
                Err(e) => {
                    warn!(appointment = %appointment.id, error = %e, "bad scheduled_at, skipping");
                    continue;
                }
            };
            let minutes_until = (scheduled - now).num_minutes();
            let text = if minutes_until <= 15 {
                format!("⏰ Your appointment starts in {minutes_until} minutes!")
            } else {
                format!("📅 Reminder: Your appointment starts in {minutes_until} minutes")
            };
            ctx.registry
                .send_to(&appointment.client_id, OutboundEvent::message(text, now_ts()))
                .await;
        }
        Ok(())
    }
}
