// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Concierge backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Concierge configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConciergeConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP/WebSocket server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Reply generation backend settings.
    #[serde(default)]
    pub responder: ResponderConfig,

    /// Background job scheduler settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant, used in greetings and reports.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "concierge".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP and WebSocket server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port for the combined HTTP/WebSocket listener.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token required on `/v1/*` routes. `None` disables auth.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("concierge").join("concierge.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("concierge.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Reply generation backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResponderConfig {
    /// HTTP endpoint of an external reply service. `None` uses the
    /// built-in deterministic responder.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout for the external reply service, in seconds.
    #[serde(default = "default_responder_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_responder_timeout_secs(),
        }
    }
}

fn default_responder_timeout_secs() -> u64 {
    10
}

/// Background job scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Enable the scheduler. When false, no background jobs run.
    #[serde(default = "default_scheduler_enabled")]
    pub enabled: bool,

    /// Hour of day (0-23, UTC) for the daily reconciliation job.
    #[serde(default = "default_reconciliation_hour")]
    pub reconciliation_hour: u8,

    /// Reminder window: how many hours ahead the reminder job looks.
    #[serde(default = "default_reminder_window_hours")]
    pub reminder_window_hours: u32,

    /// Upcoming window: how many minutes ahead the imminent-start job looks.
    #[serde(default = "default_upcoming_window_minutes")]
    pub upcoming_window_minutes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_scheduler_enabled(),
            reconciliation_hour: default_reconciliation_hour(),
            reminder_window_hours: default_reminder_window_hours(),
            upcoming_window_minutes: default_upcoming_window_minutes(),
        }
    }
}

fn default_scheduler_enabled() -> bool {
    true
}

fn default_reconciliation_hour() -> u8 {
    2
}

fn default_reminder_window_hours() -> u32 {
    24
}

fn default_upcoming_window_minutes() -> u32 {
    30
}
