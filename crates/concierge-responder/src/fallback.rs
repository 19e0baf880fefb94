// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic keyword-based responder.
//!
//! Always available: no network, no credentials. Serves both as the default
//! backend and as the degradation target when an external reply service
//! fails mid-request.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Timelike, Utc};
use concierge_core::time::{fmt_ts, parse_ts};
use concierge_core::traits::Responder;
use concierge_core::types::{
    ActionKind, Client, ClientContext, Intent, IntentAction, Message, ResponderReply, SenderRole,
    Slot,
};
use concierge_core::ConciergeError;

/// Business-hour slots offered by availability suggestions.
const SLOT_HOURS: [u32; 6] = [9, 10, 11, 14, 15, 16];

/// Days ahead to offer slots for.
const SLOT_DAYS: i64 = 5;

/// Maximum slots returned per availability suggestion.
const MAX_SLOTS: usize = 8;

/// Keyword-driven responder with canned replies per intent.
#[derive(Debug, Clone, Default)]
pub struct FallbackResponder;

impl FallbackResponder {
    pub fn new() -> Self {
        Self
    }

    /// Classify a message into an intent by keyword matching.
    pub fn detect_intent(message: &str) -> Intent {
        let lower = message.to_lowercase();
        let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if contains_any(&["schedule", "book", "appointment", "available"]) {
            Intent::Scheduling
        } else if contains_any(&["cancel", "reschedule", "change"]) {
            Intent::Modification
        } else if contains_any(&["confirm", "confirmation", "yes", "agree"]) {
            Intent::Confirmation
        } else if contains_any(&["remind", "reminder", "forget"]) {
            Intent::Reminder
        } else if contains_any(&["price", "cost", "fee", "charge"]) {
            Intent::Pricing
        } else if contains_any(&["hour", "open", "close", "when"]) {
            Intent::Hours
        } else {
            Intent::General
        }
    }

    /// Canned reply text for an intent.
    fn reply_for(intent: Intent) -> &'static str {
        match intent {
            Intent::Scheduling => {
                "I can help you schedule an appointment. What service are you interested in, \
                 and when would you prefer?"
            }
            Intent::Modification => {
                "I can help you cancel or reschedule your appointment. Could you provide your \
                 appointment details?"
            }
            Intent::Confirmation => {
                "Great! I'll confirm that for you. You'll receive a confirmation shortly."
            }
            Intent::Reminder => {
                "I'll make sure you get a reminder before your appointment. Is there anything \
                 else I can help with?"
            }
            Intent::Pricing => {
                "Our pricing varies by service. Could you tell me which service you're \
                 interested in?"
            }
            Intent::Hours => {
                "Our business hours are Monday-Friday 9:00 AM - 6:00 PM, and Saturday \
                 10:00 AM - 4:00 PM. We're closed on Sundays."
            }
            Intent::General => {
                "I'm here to help with scheduling appointments and answering questions about \
                 our services. How can I assist you today?"
            }
        }
    }

    /// Actions triggered by an intent.
    fn actions_for(intent: Intent, now: DateTime<Utc>) -> Vec<IntentAction> {
        match intent {
            Intent::Scheduling => vec![IntentAction {
                kind: ActionKind::ShowAvailability,
                data: serde_json::json!({ "suggested_times": Self::generate_slots(now) }),
            }],
            Intent::Confirmation => vec![IntentAction {
                kind: ActionKind::ConfirmAppointment,
                data: serde_json::json!({}),
            }],
            Intent::Modification => vec![IntentAction {
                kind: ActionKind::ModifyAppointment,
                data: serde_json::json!({}),
            }],
            _ => Vec::new(),
        }
    }

    /// Offer slots over the next [`SLOT_DAYS`] days at [`SLOT_HOURS`],
    /// capped at [`MAX_SLOTS`].
    pub fn generate_slots(from: DateTime<Utc>) -> Vec<Slot> {
        let base = from
            .with_hour(9)
            .and_then(|t| t.with_minute(0))
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(from);

        let mut slots = Vec::new();
        'days: for day in 1..=SLOT_DAYS {
            let date = base + Duration::days(day);
            for hour in SLOT_HOURS {
                let Some(slot_time) = date.with_hour(hour) else {
                    continue;
                };
                slots.push(Slot {
                    starts_at: fmt_ts(slot_time),
                    display: slot_time.format("%A, %B %d at %I:%M %p").to_string(),
                    available: true,
                });
                if slots.len() == MAX_SLOTS {
                    break 'days;
                }
            }
        }
        slots
    }
}

#[async_trait]
impl Responder for FallbackResponder {
    async fn respond(
        &self,
        message: &str,
        _history: &[Message],
        _ctx: &ClientContext,
    ) -> Result<ResponderReply, ConciergeError> {
        let intent = Self::detect_intent(message);
        Ok(ResponderReply {
            text: Self::reply_for(intent).to_string(),
            intent,
            actions: Self::actions_for(intent, Utc::now()),
        })
    }

    async fn summarize(&self, messages: &[Message]) -> Result<String, ConciergeError> {
        let first_client_line = messages
            .iter()
            .find(|m| m.sender == SenderRole::Client)
            .map(|m| m.content.as_str())
            .unwrap_or("(no client messages)");
        Ok(format!(
            "Conversation with {} message(s). Opened with: \"{}\"",
            messages.len(),
            first_client_line
        ))
    }

    async fn suggest_follow_up(&self, client: &Client) -> Result<Option<String>, ConciergeError> {
        let Some(last) = &client.last_appointment_at else {
            return Ok(Some(
                "Would you like to schedule your first appointment with us?".to_string(),
            ));
        };
        let last = parse_ts(last)?;
        let days_since = (Utc::now() - last).num_days();

        if days_since > 90 {
            Ok(Some(
                "It's been a while since your last visit! Would you like to schedule a \
                 follow-up appointment?"
                    .to_string(),
            ))
        } else if days_since > 30 {
            Ok(Some(
                "Time for your regular check-in? Let me know if you'd like to schedule your \
                 next appointment."
                    .to_string(),
            ))
        } else {
            Ok(None)
        }
    }
}
