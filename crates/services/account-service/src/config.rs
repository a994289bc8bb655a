//! Account service configuration.

use std::env;
use std::time::Duration;

use common::{AppError, AppResult, ImpersonationConfig, SeatPolicyConfig};
use domain::{DEFAULT_ACTIVITY_FEED_LIMIT, DEFAULT_IMPERSONATION_TTL_MINUTES, MIN_IMPERSONATION_SECRET_LENGTH};

/// Signing secret used when `IMPERSONATION_SECRET` is unset. Development only.
pub const DEV_IMPERSONATION_SECRET: &str = "dev-only-impersonation-secret-change-me!";

/// Console service configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Simulated backend round trip before a mutation commits
    pub action_latency_ms: u64,
    /// Seat accounting policy
    pub seat_policy: SeatPolicyConfig,
    /// Load the sample registry at startup
    pub seed_sample_data: bool,
    /// Impersonation token signing
    pub impersonation: ImpersonationConfig,
    /// Default size of the dashboard activity feed
    pub activity_feed_limit: usize,
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let secret = env::var("IMPERSONATION_SECRET").unwrap_or_else(|_| {
            tracing::warn!("IMPERSONATION_SECRET not set; using the development secret");
            DEV_IMPERSONATION_SECRET.to_string()
        });

        Self {
            action_latency_ms: env::var("ACTION_LATENCY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            seat_policy: SeatPolicyConfig {
                enforce_limits: env::var("ENFORCE_SEAT_LIMITS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(false),
            },
            seed_sample_data: env::var("SEED_SAMPLE_DATA")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            impersonation: ImpersonationConfig {
                secret,
                ttl_minutes: env::var("IMPERSONATION_TTL_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_IMPERSONATION_TTL_MINUTES),
            },
            activity_feed_limit: env::var("ACTIVITY_FEED_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ACTIVITY_FEED_LIMIT),
        }
    }

    /// Latency as a duration.
    pub fn action_latency(&self) -> Duration {
        Duration::from_millis(self.action_latency_ms)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.impersonation.secret.len() < MIN_IMPERSONATION_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "IMPERSONATION_SECRET must be at least {} bytes",
                MIN_IMPERSONATION_SECRET_LENGTH
            )));
        }
        if self.impersonation.ttl_minutes <= 0 {
            return Err(AppError::internal("IMPERSONATION_TTL_MINUTES must be positive"));
        }
        Ok(())
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            action_latency_ms: 0,
            seat_policy: SeatPolicyConfig::default(),
            seed_sample_data: true,
            impersonation: ImpersonationConfig {
                secret: DEV_IMPERSONATION_SECRET.to_string(),
                ttl_minutes: DEFAULT_IMPERSONATION_TTL_MINUTES,
            },
            activity_feed_limit: DEFAULT_ACTIVITY_FEED_LIMIT,
        }
    }
}
