// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the Concierge scheduling backend.
//!
//! Serves the chat WebSocket (`/ws/{client_id}`), the public health
//! endpoint, and the authenticated `/v1` REST surface for appointments,
//! conversations, clients, jobs, and on-demand outreach.

pub mod auth;
pub mod handlers;
pub mod server;
pub mod ws;

pub use auth::AuthConfig;
pub use server::{GatewayState, build_router, start_server};
