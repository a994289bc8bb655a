//! Account (tenant) entity and related types.

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{NO_RENEWAL, RENEWAL_PERIOD_MONTHS};
use crate::error::DomainError;
use crate::role::Role;
use crate::seats::{SeatAllocation, Seats};

/// Subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Plan {
    Enterprise,
    Pro,
    Free,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Enterprise => "Enterprise",
            Plan::Pro => "Pro",
            Plan::Free => "Free",
        }
    }

    /// Free plans have no renewal date.
    pub fn renews(&self) -> bool {
        !matches!(self, Plan::Free)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AccountStatus {
    Active,
    Trial,
    Suspended,
}

impl AccountStatus {
    pub const ALL: [AccountStatus; 3] = [
        AccountStatus::Active,
        AccountStatus::Trial,
        AccountStatus::Suspended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "Active",
            AccountStatus::Trial => "Trial",
            AccountStatus::Suspended => "Suspended",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown account status '{}'", s)))
    }
}

/// Account domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub plan: Plan,
    pub status: AccountStatus,
    pub contact_email: String,
    pub created_at: NaiveDate,
    /// None for plans that never renew
    pub next_renewal: Option<NaiveDate>,
    pub seats: Seats,
    /// Aggregate usage percentage (0-100)
    pub usage: u8,
    pub conversations_this_month: u64,
    pub active_workflows: u32,
    pub account_manager: Option<String>,
}

impl Account {
    /// Create a new active account with no seats in use.
    pub fn new(
        id: Uuid,
        name: String,
        contact_email: String,
        plan: Plan,
        seats: Seats,
        account_manager: Option<String>,
        created_at: NaiveDate,
    ) -> Self {
        Self {
            id,
            name,
            plan,
            status: AccountStatus::Active,
            contact_email,
            created_at,
            next_renewal: first_renewal(plan, created_at),
            seats,
            usage: 0,
            conversations_this_month: 0,
            active_workflows: 0,
            account_manager,
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.status == AccountStatus::Suspended
    }

    /// Suspended accounts are activated; Active and Trial accounts are suspended.
    pub fn toggle_suspension(&mut self) -> AccountStatus {
        self.status = match self.status {
            AccountStatus::Suspended => AccountStatus::Active,
            AccountStatus::Active | AccountStatus::Trial => AccountStatus::Suspended,
        };
        self.status
    }

    /// Switch plan; renewal is recomputed from the creation date.
    pub fn change_plan(&mut self, plan: Plan) {
        if self.plan != plan {
            self.plan = plan;
            self.next_renewal = first_renewal(plan, self.created_at);
        }
    }

    /// Renewal date as displayed ("N/A" when none).
    pub fn renewal_label(&self) -> String {
        self.next_renewal
            .map(|date| date.to_string())
            .unwrap_or_else(|| NO_RENEWAL.to_string())
    }
}

fn first_renewal(plan: Plan, created_at: NaiveDate) -> Option<NaiveDate> {
    if plan.renews() {
        created_at.checked_add_months(Months::new(RENEWAL_PERIOD_MONTHS))
    } else {
        None
    }
}

/// Account creation data transfer object
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccount {
    pub name: String,
    pub contact_email: String,
    pub plan: Plan,
    pub admin_seats: u32,
    pub supervisor_seats: u32,
    pub agent_seats: u32,
    pub account_manager: Option<String>,
}

/// Account update data transfer object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccount {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub plan: Option<Plan>,
    pub admin_seats: Option<u32>,
    pub supervisor_seats: Option<u32>,
    pub agent_seats: Option<u32>,
    pub account_manager: Option<String>,
}

impl UpdateAccount {
    /// Requested seat totals paired with their role.
    pub fn seat_totals(&self) -> impl Iterator<Item = (Role, u32)> {
        [
            (Role::Admin, self.admin_seats),
            (Role::Supervisor, self.supervisor_seats),
            (Role::Agent, self.agent_seats),
        ]
        .into_iter()
        .filter_map(|(role, total)| total.map(|total| (role, total)))
    }
}

/// Seat allocation with derived availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SeatResponse {
    pub used: u32,
    pub total: u32,
    pub available: u32,
}

impl From<&SeatAllocation> for SeatResponse {
    fn from(allocation: &SeatAllocation) -> Self {
        Self {
            used: allocation.used,
            total: allocation.total,
            available: allocation.available(),
        }
    }
}

/// Seats of an account, per role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SeatsResponse {
    pub admin: SeatResponse,
    pub supervisor: SeatResponse,
    pub agent: SeatResponse,
}

impl From<&Seats> for SeatsResponse {
    fn from(seats: &Seats) -> Self {
        Self {
            admin: SeatResponse::from(&seats.admin),
            supervisor: SeatResponse::from(&seats.supervisor),
            agent: SeatResponse::from(&seats.agent),
        }
    }
}

/// Account response (shape consumed by the console)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccountResponse {
    pub id: Uuid,
    pub name: String,
    pub plan: Plan,
    pub status: AccountStatus,
    pub seats: SeatsResponse,
    pub usage: u8,
    pub contact_email: String,
    pub created_at: NaiveDate,
    /// ISO date, or "N/A"
    #[cfg_attr(feature = "openapi", schema(example = "2024-04-15"))]
    pub next_renewal: String,
    pub conversations_this_month: u64,
    pub active_workflows: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_manager: Option<String>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            plan: account.plan,
            status: account.status,
            seats: SeatsResponse::from(&account.seats),
            usage: account.usage,
            contact_email: account.contact_email.clone(),
            created_at: account.created_at,
            next_renewal: account.renewal_label(),
            conversations_this_month: account.conversations_this_month,
            active_workflows: account.active_workflows,
            account_manager: account.account_manager.clone(),
        }
    }
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        AccountResponse::from(&account)
    }
}
