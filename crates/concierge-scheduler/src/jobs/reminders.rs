// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hourly reminder sweep over confirmed appointments.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use concierge_core::time::{now_ts, parse_ts};
use concierge_core::types::Appointment;
use concierge_core::wire::OutboundEvent;
use concierge_core::ConciergeError;
use tracing::{error, info};

use crate::{Job, JobContext, Trigger};

/// Sends a reminder for every confirmed appointment inside the reminder
/// window that has not been reminded yet, then sets the reminder flag.
///
/// The flag is set after the delivery attempt regardless of whether the
/// client was connected, so each appointment is reminded at most once per
/// scheduled date. Rescheduling clears the flag at the store layer.
pub struct ReminderSweep {
    trigger: Trigger,
}

impl ReminderSweep {
    /// Fires at the top of every hour.
    pub fn new() -> Result<Self, ConciergeError> {
        Ok(Self {
            trigger: Trigger::cron("0 * * * *")?,
        })
    }

    async fn remind_one(
        &self,
        ctx: &JobContext,
        appointment: &Appointment,
        now: DateTime<Utc>,
    ) -> Result<(), ConciergeError> {
        let scheduled = parse_ts(&appointment.scheduled_at)?;
        let hours_until = (scheduled - now).num_hours();

        let text = format!(
            "🔔 Appointment Reminder\n\n\
             You have an upcoming appointment:\n\
             • Service: {}\n\
             • Date: {}\n\
             • Time: {}\n\
             • Duration: {} minutes\n\n\
             This appointment is in {} hours.\n\n\
             If you need to reschedule or cancel, please let me know as soon as possible.",
            appointment.service_type,
            scheduled.format("%A, %B %d, %Y"),
            scheduled.format("%I:%M %p"),
            appointment.duration_minutes,
            hours_until,
        );

        ctx.registry
            .send_to(&appointment.client_id, OutboundEvent::message(text, now_ts()))
            .await;
        ctx.store.mark_reminder_sent(&appointment.id).await
    }
}

#[async_trait]
impl Job for ReminderSweep {
    fn id(&self) -> &'static str {
        "reminder-sweep"
    }

    fn name(&self) -> &'static str {
        "Send Appointment Reminders"
    }

    fn trigger(&self) -> Trigger {
        self.trigger.clone()
    }

    async fn run(&self, ctx: &JobContext) -> Result<(), ConciergeError> {
        let now = Utc::now();
        let until = now + Duration::hours(i64::from(ctx.config.reminder_window_hours));
        let due = ctx.store.reminders_due(now, until).await?;

        let mut sent = 0usize;
        for appointment in &due {
            match self.remind_one(ctx, appointment, now).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    error!(appointment = %appointment.id, error = %e, "reminder failed");
                }
            }
        }
        info!(count = sent, "appointment reminders sent");
        Ok(())
    }
}
