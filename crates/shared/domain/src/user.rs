//! User domain entity and related types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// User status.
///
/// Invited users start out Pending; Suspended is reached through the
/// suspend action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum UserStatus {
    Active,
    Pending,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Pending => "Pending",
            UserStatus::Suspended => "Suspended",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Display name, always `first_name last_name`
    pub name: String,
    pub email: String,
    pub role: Role,
    pub account_id: Uuid,
    /// Copy of the owning account's name, kept in sync on rename
    pub account_name: String,
    pub status: UserStatus,
    pub last_login: Option<DateTime<Utc>>,
    pub tickets_handled: u64,
    pub conversations_processed: u64,
}

impl User {
    /// Create an invited (pending) user.
    pub fn invited(
        id: Uuid,
        first_name: String,
        last_name: String,
        email: String,
        role: Role,
        account_id: Uuid,
        account_name: String,
    ) -> Self {
        Self {
            id,
            name: full_name(&first_name, &last_name),
            first_name,
            last_name,
            email,
            role,
            account_id,
            account_name,
            status: UserStatus::Pending,
            last_login: None,
            tickets_handled: 0,
            conversations_processed: 0,
        }
    }

    /// Replace either half of the name, keeping the display name in step.
    pub fn rename(&mut self, first_name: Option<String>, last_name: Option<String>) {
        if let Some(first) = first_name {
            self.first_name = first;
        }
        if let Some(last) = last_name {
            self.last_name = last;
        }
        self.name = full_name(&self.first_name, &self.last_name);
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Suspended users are activated; Active and Pending users are suspended.
    pub fn toggle_suspension(&mut self) -> UserStatus {
        self.status = match self.status {
            UserStatus::Suspended => UserStatus::Active,
            UserStatus::Active | UserStatus::Pending => UserStatus::Suspended,
        };
        self.status
    }
}

/// Display name from the form's first and last name.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim())
}

/// User invitation data transfer object
#[derive(Debug, Clone, Deserialize)]
pub struct InviteUser {
    pub account_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    /// Personal note included in the invitation
    pub message: Option<String>,
}

/// User update data transfer object (the owning account is read-only)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// User response (shape consumed by the console)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub account_id: Uuid,
    pub account_name: String,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub tickets_handled: u64,
    pub conversations_processed: u64,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
            account_id: user.account_id,
            account_name: user.account_name.clone(),
            status: user.status,
            last_login: user.last_login,
            tickets_handled: user.tickets_handled,
            conversations_processed: user.conversations_processed,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse::from(&user)
    }
}
