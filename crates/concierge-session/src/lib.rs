// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation pipeline and action dispatch for the Concierge backend.
//!
//! Ties the store, responder, and connection registry together into the
//! per-message processing sequence, plus disconnect finalization and
//! process shutdown signaling.

pub mod dispatcher;
pub mod pipeline;
pub mod shutdown;

pub use dispatcher::ActionDispatcher;
pub use pipeline::SessionPipeline;
pub use shutdown::install_signal_handler;
