//! Activity (audit) records written by every console mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    AccountCreated,
    AccountUpdated,
    AccountSuspended,
    AccountActivated,
    AccountDeleted,
    UserInvited,
    UserUpdated,
    UserSuspended,
    UserActivated,
    UserDeleted,
    UserImpersonated,
}

impl ActivityKind {
    /// Feed headline
    pub fn title(&self) -> &'static str {
        match self {
            ActivityKind::AccountCreated => "New account created",
            ActivityKind::AccountUpdated => "Account updated",
            ActivityKind::AccountSuspended => "Account suspended",
            ActivityKind::AccountActivated => "Account activated",
            ActivityKind::AccountDeleted => "Account deleted",
            ActivityKind::UserInvited => "User invitation sent",
            ActivityKind::UserUpdated => "User updated",
            ActivityKind::UserSuspended => "User suspended",
            ActivityKind::UserActivated => "User activated",
            ActivityKind::UserDeleted => "User deleted",
            ActivityKind::UserImpersonated => "Signed in as user",
        }
    }
}

/// One audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ActivityEntry {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    /// Role of the operator who acted
    pub operator: Role,
    /// Entity acted upon
    pub target_id: Uuid,
    /// Owning account, when the target is a user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(
        kind: ActivityKind,
        operator: Role,
        target_id: Uuid,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: kind.title().to_string(),
            description: description.into(),
            operator,
            target_id,
            account_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the owning account.
    pub fn in_account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }
}
