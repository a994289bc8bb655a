//! Shared configuration structures.

use serde::{Deserialize, Serialize};

/// Signing configuration for impersonation session tokens.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImpersonationConfig {
    #[serde(skip_serializing)]
    pub secret: String,
    pub ttl_minutes: i64,
}

impl Default for ImpersonationConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_minutes: domain::DEFAULT_IMPERSONATION_TTL_MINUTES,
        }
    }
}

/// Seat accounting policy.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct SeatPolicyConfig {
    /// Refuse invites and role changes once a role has no seats left
    pub enforce_limits: bool,
}
