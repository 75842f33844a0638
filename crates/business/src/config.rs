//! Service configuration
//!
//! Provenance values written to every audit record, the response offset,
//! and the audit sink retry policy. Loaded from JSON; every field has a
//! default.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the cost lookup service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    // === Provenance ===
    /// Written to `origin` and `service` of each audit record
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Written to `created_by` of each audit record
    #[serde(default = "default_created_by")]
    pub created_by: String,

    /// Actor recorded when the lookup runs on behalf of the system
    #[serde(default = "default_system_actor")]
    pub system_actor: String,

    // === Response ===
    /// Fixed UTC offset of `movementTimestamp`, in hours
    #[serde(default = "default_response_utc_offset_hours")]
    pub response_utc_offset_hours: i32,

    // === Audit ===
    #[serde(default)]
    pub audit: AuditSinkConfig,
}

/// Retry policy of the audit sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSinkConfig {
    /// Total attempts per record, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay after failed attempt n is `base_delay_ms * n`
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

// Default value functions for serde
fn default_service_name() -> String {
    "TXCOST".to_string()
}

fn default_created_by() -> String {
    "TXCOST-SERVICE".to_string()
}

fn default_system_actor() -> String {
    "SYSTEM".to_string()
}

fn default_response_utc_offset_hours() -> i32 {
    -6
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    100
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            created_by: default_created_by(),
            system_actor: default_system_actor(),
            response_utc_offset_hours: default_response_utc_offset_hours(),
            audit: AuditSinkConfig::default(),
        }
    }
}

impl Default for AuditSinkConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Response offset; out-of-range values fall back to UTC
    pub fn response_offset(&self) -> FixedOffset {
        self.response_utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl AuditSinkConfig {
    /// At least one attempt is always made
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Backoff after failed attempt `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms.saturating_mul(u64::from(attempt)))
    }
}
