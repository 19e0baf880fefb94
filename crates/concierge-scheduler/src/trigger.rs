// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job firing schedules.

use std::time::Duration;

use chrono::{DateTime, Utc};
use concierge_core::ConciergeError;

/// When a job fires.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Fire every fixed duration, measured from the previous run.
    Interval(Duration),
    /// Fire on a cron schedule, evaluated in UTC.
    Cron(croner::Cron),
}

impl Trigger {
    /// Parse a five-field cron expression into a trigger.
    pub fn cron(expr: &str) -> Result<Self, ConciergeError> {
        expr.parse::<croner::Cron>()
            .map(Trigger::Cron)
            .map_err(|e| ConciergeError::Config(format!("invalid cron expression `{expr}`: {e}")))
    }

    /// Interval trigger from a number of minutes.
    pub fn every_minutes(minutes: u64) -> Self {
        Trigger::Interval(Duration::from_secs(minutes * 60))
    }

    /// The next instant strictly after `after` at which this trigger fires.
    ///
    /// Returns `None` when the schedule has no future occurrence.
    pub fn next_run(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Trigger::Interval(every) => {
                chrono::Duration::from_std(*every).ok().map(|d| after + d)
            }
            Trigger::Cron(cron) => cron.find_next_occurrence(&after, false).ok(),
        }
    }

    /// Human-readable schedule description for introspection surfaces.
    pub fn describe(&self) -> String {
        match self {
            Trigger::Interval(every) => format!("every {}s", every.as_secs()),
            Trigger::Cron(cron) => format!("cron {}", cron.pattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn interval_fires_after_fixed_duration() {
        let trigger = Trigger::every_minutes(15);
        let after = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let next = trigger.next_run(after).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 1, 9, 15, 0).unwrap());
    }

    #[test]
    fn hourly_cron_fires_at_top_of_hour() {
        let trigger = Trigger::cron("0 * * * *").unwrap();
        let after = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let next = trigger.next_run(after).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn weekly_cron_fires_on_monday_morning() {
        let trigger = Trigger::cron("0 9 * * 1").unwrap();
        // 2026-03-01 is a Sunday.
        let after = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let next = trigger.next_run(after).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
    }

    #[test]
    fn invalid_cron_expression_is_rejected() {
        assert!(Trigger::cron("not a cron").is_err());
    }

    #[test]
    fn describe_names_the_schedule() {
        assert_eq!(Trigger::every_minutes(15).describe(), "every 900s");
        assert_eq!(Trigger::cron("0 2 * * *").unwrap().describe(), "cron 0 2 * * *");
    }
}
