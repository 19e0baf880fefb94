// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-empty paths, and
//! in-range scheduler windows.

use crate::diagnostic::ConfigError;
use crate::model::ConciergeConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ConciergeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if let Some(token) = &config.server.bearer_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "server.bearer_token must not be empty when set; omit it to disable auth"
                .to_string(),
        });
    }

    if let Some(endpoint) = &config.responder.endpoint
        && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
    {
        errors.push(ConfigError::Validation {
            message: format!("responder.endpoint `{endpoint}` must be an http(s) URL"),
        });
    }

    if config.responder.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "responder.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.scheduler.reconciliation_hour > 23 {
        errors.push(ConfigError::Validation {
            message: format!(
                "scheduler.reconciliation_hour must be 0-23, got {}",
                config.scheduler.reconciliation_hour
            ),
        });
    }

    if config.scheduler.reminder_window_hours == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.reminder_window_hours must be at least 1".to_string(),
        });
    }

    if config.scheduler.upcoming_window_minutes == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.upcoming_window_minutes must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
