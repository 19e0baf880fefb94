// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The background jobs the concierge runs.

pub mod outreach;
pub mod reconciliation;
pub mod reminders;
pub mod report;
pub mod upcoming;

pub use outreach::run_outreach_for_client;
pub use reconciliation::DailyReconciliation;
pub use reminders::ReminderSweep;
pub use report::WeeklyReport;
pub use upcoming::UpcomingSweep;
