//! Role hierarchy and operator authorization.
//!
//! Roles are static configuration: three fixed definitions ordered by
//! authority level (1 = highest). Lookups are total because the role
//! enumeration is closed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{ROLE_ADMIN, ROLE_AGENT, ROLE_SUPERVISOR};
use crate::error::{DomainError, DomainResult};

/// Platform role held by a user (and by the console operator).
///
/// Canonical spelling is capitalised; the lowercase spellings used by the
/// invite form are accepted as aliases when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Role {
    #[serde(alias = "admin")]
    Admin,
    #[serde(alias = "supervisor")]
    Supervisor,
    #[serde(alias = "agent")]
    Agent,
}

impl Role {
    /// All roles, highest authority first.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Supervisor, Role::Agent];

    /// Hierarchy level (1 = highest authority).
    pub fn level(&self) -> u8 {
        get_role_definition(*self).level
    }

    /// Badge colour used by the console.
    pub fn color(&self) -> &'static str {
        get_role_definition(*self).color
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Strictly higher authority than `other`.
    pub fn outranks(&self, other: Role) -> bool {
        self.level() < other.level()
    }

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Supervisor => ROLE_SUPERVISOR,
            Role::Agent => ROLE_AGENT,
        }
    }

    /// Lenient boundary parse: canonical or all-lowercase spelling.
    pub fn from_alias(value: &str) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == value || role.as_str().to_lowercase() == value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse: only the canonical spelling is accepted.
impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown role '{}'", s)))
    }
}

/// Static description of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    pub name: Role,
    pub label: &'static str,
    pub description: &'static str,
    pub permissions: &'static [&'static str],
    pub color: &'static str,
    pub level: u8,
}

/// The fixed role table.
pub static ROLE_DEFINITIONS: [RoleDefinition; 3] = [
    RoleDefinition {
        name: Role::Admin,
        label: "Admin",
        description: "Full access to the platform including all configurations, user management, and settings",
        permissions: &[
            "Manage all users",
            "Configure workflows",
            "Access all conversations",
            "Manage billing & plans",
            "Full administrative access",
        ],
        color: "purple",
        level: 1,
    },
    RoleDefinition {
        name: Role::Supervisor,
        label: "Supervisor",
        description: "Access to configurations and administrative features with oversight of agents and conversations",
        permissions: &[
            "Manage agents",
            "View all conversations",
            "Configure some settings",
            "Generate reports",
            "Monitor performance",
        ],
        color: "blue",
        level: 2,
    },
    RoleDefinition {
        name: Role::Agent,
        label: "Agent",
        description: "Serve as 'human in the loop' to handle conversations when AI assistance is needed",
        permissions: &[
            "Handle live conversations",
            "Take over from AI",
            "View assigned conversations",
            "Update conversation status",
        ],
        color: "green",
        level: 3,
    },
];

/// Look up the static definition of a role.
pub fn get_role_definition(role: Role) -> &'static RoleDefinition {
    match role {
        Role::Admin => &ROLE_DEFINITIONS[0],
        Role::Supervisor => &ROLE_DEFINITIONS[1],
        Role::Agent => &ROLE_DEFINITIONS[2],
    }
}

/// All role definitions ordered by ascending level.
pub fn roles_by_hierarchy() -> Vec<&'static RoleDefinition> {
    let mut roles: Vec<&'static RoleDefinition> = ROLE_DEFINITIONS.iter().collect();
    roles.sort_by_key(|definition| definition.level);
    roles
}

/// Console actions subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorAction {
    /// Read-only access to accounts, users and roles
    View,
    /// Create, edit, suspend or delete an account
    ManageAccounts,
    /// Invite a user who will hold `role`
    InviteUser { role: Role },
    /// Edit or suspend a user currently holding `role`
    ManageUser { role: Role },
    /// Give a user the role `role`
    AssignRole { role: Role },
    /// Permanently remove a user
    DeleteUser,
    /// Sign in as another user
    Impersonate,
}

/// Check that `operator` may perform `action`.
pub fn authorize(operator: Role, action: OperatorAction) -> DomainResult<()> {
    let allowed = match action {
        OperatorAction::View => true,
        OperatorAction::ManageAccounts | OperatorAction::DeleteUser | OperatorAction::Impersonate => {
            operator.is_admin()
        }
        OperatorAction::InviteUser { role }
        | OperatorAction::ManageUser { role }
        | OperatorAction::AssignRole { role } => operator.is_admin() || operator.outranks(role),
    };

    if allowed {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}
