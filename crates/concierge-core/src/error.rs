// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Concierge backend.

use thiserror::Error;

/// The primary error type used across the Concierge workspace.
#[derive(Debug, Error)]
pub enum ConciergeError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Connection channel errors (send failure, closed socket, bind failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Responder errors (endpoint unreachable, malformed reply).
    #[error("responder error: {message}")]
    Responder {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A looked-up entity does not exist. Terminal for the single request only.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = ConciergeError::NotFound {
            entity: "appointment",
            id: "apt-1".into(),
        };
        assert_eq!(err.to_string(), "appointment not found: apt-1");
    }

    #[test]
    fn all_variants_construct() {
        let _config = ConciergeError::Config("bad".into());
        let _storage = ConciergeError::Storage {
            source: Box::new(std::io::Error::other("disk")),
        };
        let _channel = ConciergeError::Channel {
            message: "closed".into(),
            source: None,
        };
        let _responder = ConciergeError::Responder {
            message: "unreachable".into(),
            source: None,
        };
        let _timeout = ConciergeError::Timeout {
            duration: std::time::Duration::from_secs(5),
        };
        let _internal = ConciergeError::Internal("oops".into());
    }
}
