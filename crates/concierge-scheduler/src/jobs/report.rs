// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weekly statistics report.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use concierge_core::types::AppointmentCounts;
use concierge_core::ConciergeError;
use tracing::info;

use crate::{Job, JobContext, Trigger};

/// Logs a trailing-7-day summary of appointment and client activity every
/// Monday morning.
pub struct WeeklyReport {
    trigger: Trigger,
}

impl WeeklyReport {
    /// Fires Mondays at 09:00 UTC.
    pub fn new() -> Result<Self, ConciergeError> {
        Ok(Self {
            trigger: Trigger::cron("0 9 * * 1")?,
        })
    }
}

fn rate(part: i64, total: i64) -> f64 {
    if total > 0 {
        part as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

fn render_report(
    from: &str,
    to: &str,
    counts: &AppointmentCounts,
    new_clients: u64,
) -> String {
    format!(
        "📊 Weekly Report - {from} to {to}\n\n\
         Appointments:\n\
         • Total created: {}\n\
         • Confirmed: {}\n\
         • Completed: {}\n\
         • Cancelled: {}\n\n\
         Clients:\n\
         • New clients: {new_clients}\n\n\
         Performance:\n\
         • Completion rate: {:.1}%\n\
         • Cancellation rate: {:.1}%",
        counts.created,
        counts.confirmed,
        counts.completed,
        counts.cancelled,
        rate(counts.completed, counts.created),
        rate(counts.cancelled, counts.created),
    )
}

#[async_trait]
impl Job for WeeklyReport {
    fn id(&self) -> &'static str {
        "weekly-report"
    }

    fn name(&self) -> &'static str {
        "Generate Weekly Report"
    }

    fn trigger(&self) -> Trigger {
        self.trigger.clone()
    }

    async fn run(&self, ctx: &JobContext) -> Result<(), ConciergeError> {
        let now = Utc::now();
        let week_ago = now - Duration::days(7);

        let counts = ctx.store.appointment_counts_since(week_ago).await?;
        let new_clients = ctx.store.clients_created_since(week_ago).await?;

        let report = render_report(
            &week_ago.format("%Y-%m-%d").to_string(),
            &now.format("%Y-%m-%d").to_string(),
            &counts,
            new_clients,
        );
        info!("weekly report:\n{report}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_guard_against_zero_total() {
        assert_eq!(rate(5, 0), 0.0);
        assert_eq!(rate(1, 4), 25.0);
    }

    #[test]
    fn report_includes_counts_and_rates() {
        let counts = AppointmentCounts {
            created: 10,
            confirmed: 4,
            completed: 5,
            cancelled: 1,
        };
        let report = render_report("2026-02-22", "2026-03-01", &counts, 3);
        assert!(report.contains("Total created: 10"));
        assert!(report.contains("New clients: 3"));
        assert!(report.contains("Completion rate: 50.0%"));
        assert!(report.contains("Cancellation rate: 10.0%"));
    }
}
