// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Concierge scheduling backend.
//!
//! This crate provides the foundational trait definitions, error types,
//! domain entities, and wire protocol shared across the Concierge
//! workspace. Backends (SQLite storage, responders) implement the
//! traits defined here.

pub mod error;
pub mod time;
pub mod traits;
pub mod types;
pub mod wire;

// Re-export key items at crate root for ergonomic imports.
pub use error::ConciergeError;
pub use traits::{Responder, Store};
pub use types::{
    ActionKind, Appointment, AppointmentCounts, AppointmentPatch, AppointmentStatus, Client,
    ClientContext, Conversation, ConversationInitiator, ConversationStatus, EntityCounts, Intent,
    IntentAction, Message, MessageMeta, ResponderReply, SenderRole, Slot,
};
pub use wire::{InboundFrame, OutboundEvent};
