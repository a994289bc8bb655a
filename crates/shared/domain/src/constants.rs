//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Highest-authority role
pub const ROLE_ADMIN: &str = "Admin";

/// Oversees agents and conversations
pub const ROLE_SUPERVISOR: &str = "Supervisor";

/// Human in the loop for live conversations
pub const ROLE_AGENT: &str = "Agent";

/// Filter value that disables a categorical filter
pub const FILTER_ALL: &str = "all";

// =============================================================================
// Validation
// =============================================================================

/// Minimum length of an account (company) name
pub const MIN_ACCOUNT_NAME_LENGTH: usize = 2;

/// Minimum length of a user's first or last name
pub const MIN_PERSON_NAME_LENGTH: usize = 2;

/// Every account needs at least one admin seat
pub const MIN_ADMIN_SEATS: u32 = 1;

// =============================================================================
// Display
// =============================================================================

/// Rendered in place of a renewal date for plans that never renew
pub const NO_RENEWAL: &str = "N/A";

/// Months between account creation and first renewal on paid plans
pub const RENEWAL_PERIOD_MONTHS: u32 = 1;

// =============================================================================
// Impersonation
// =============================================================================

/// Default lifetime of an impersonation session in minutes
pub const DEFAULT_IMPERSONATION_TTL_MINUTES: i64 = 60;

/// Minimum impersonation signing secret length (security requirement)
pub const MIN_IMPERSONATION_SECRET_LENGTH: usize = 32;

/// Seconds per minute (for token expiration calculation)
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Session token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Default number of entries shown in the dashboard activity feed
pub const DEFAULT_ACTIVITY_FEED_LIMIT: usize = 5;
