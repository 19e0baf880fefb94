// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Concierge integration tests.
//!
//! Provides a mock responder and shared fixtures for fast, deterministic,
//! CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockResponder`] - Mock reply backend with pre-configured replies
//! - [`harness`] - Temp-directory store and entity seed helpers

pub mod harness;
pub mod mock_responder;

pub use harness::{seed_appointment, seed_client, temp_store};
pub use mock_responder::MockResponder;
