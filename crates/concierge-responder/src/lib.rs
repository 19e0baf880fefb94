// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply generation backends for the Concierge scheduling backend.
//!
//! Two [`Responder`] implementations: a deterministic keyword-based
//! fallback and an HTTP client for an external reply service that
//! degrades to the fallback on failure.
//!
//! [`Responder`]: concierge_core::traits::Responder

pub mod fallback;
pub mod http;

pub use fallback::FallbackResponder;
pub use http::HttpResponder;

use std::sync::Arc;

use concierge_core::ConciergeError;
use concierge_core::traits::Responder;

/// Build the responder described by configuration: the HTTP backend when
/// an endpoint is configured, the deterministic fallback otherwise.
pub fn responder_from_config(
    config: &concierge_config::model::ResponderConfig,
) -> Result<Arc<dyn Responder>, ConciergeError> {
    match HttpResponder::from_config(config)? {
        Some(http) => Ok(Arc::new(http)),
        None => Ok(Arc::new(FallbackResponder::new())),
    }
}
