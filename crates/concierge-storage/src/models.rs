// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `concierge-core::types` for use across
//! trait boundaries. This module re-exports them for convenience within the
//! storage crate.

pub use concierge_core::types::{
    Appointment, AppointmentCounts, AppointmentPatch, AppointmentStatus, Client, Conversation,
    ConversationInitiator, ConversationStatus, EntityCounts, Message, SenderRole,
};
