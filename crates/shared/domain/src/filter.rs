//! Search and categorical filtering over accounts and users.
//!
//! The free-text query and the dropdown filter are independent predicates
//! combined with AND. Filtering is stable: matches keep their original
//! relative order. Nothing is cached; callers filter the full list each time.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::account::{Account, AccountStatus};
use crate::constants::FILTER_ALL;
use crate::error::DomainError;
use crate::role::Role;
use crate::user::User;

/// Account status dropdown value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AccountStatus),
}

impl StatusFilter {
    pub fn admits(&self, status: AccountStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

/// Accepts exactly "all" or a status name; matching is case-sensitive.
impl FromStr for StatusFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == FILTER_ALL {
            return Ok(StatusFilter::All);
        }
        s.parse::<AccountStatus>().map(StatusFilter::Only)
    }
}

/// User role dropdown value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl RoleFilter {
    pub fn admits(&self, role: Role) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(wanted) => *wanted == role,
        }
    }
}

/// Accepts exactly "all" or a canonical role name.
impl FromStr for RoleFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == FILTER_ALL {
            return Ok(RoleFilter::All);
        }
        s.parse::<Role>().map(RoleFilter::Only)
    }
}

/// Case-insensitive substring match against any of the fields.
/// An empty query matches everything.
pub fn matches_query(query: &str, fields: &[&str]) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Accounts whose name or contact email contains `query` and whose status
/// passes `status`.
pub fn filter_accounts<'a, I>(accounts: I, query: &str, status: StatusFilter) -> Vec<&'a Account>
where
    I: IntoIterator<Item = &'a Account>,
{
    accounts
        .into_iter()
        .filter(|account| {
            matches_query(query, &[account.name.as_str(), account.contact_email.as_str()])
                && status.admits(account.status)
        })
        .collect()
}

/// Users whose name, email or account name contains `query` and whose role
/// passes `role`.
pub fn filter_users<'a, I>(users: I, query: &str, role: RoleFilter) -> Vec<&'a User>
where
    I: IntoIterator<Item = &'a User>,
{
    users
        .into_iter()
        .filter(|user| {
            matches_query(query, &[user.name.as_str(), user.email.as_str(), user.account_name.as_str()])
                && role.admits(user.role)
        })
        .collect()
}

/// Account picker of the invite form: blank query lists everything,
/// otherwise name, contact email or plan must contain the trimmed query.
pub fn filter_account_picker<'a, I>(accounts: I, query: &str) -> Vec<&'a Account>
where
    I: IntoIterator<Item = &'a Account>,
{
    let query = query.trim();
    accounts
        .into_iter()
        .filter(|account| {
            matches_query(
                query,
                &[
                    account.name.as_str(),
                    account.contact_email.as_str(),
                    account.plan.as_str(),
                ],
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::account::Plan;
    use crate::seats::Seats;

    fn account(name: &str, email: &str, plan: Plan, status: AccountStatus) -> Account {
        let mut account = Account::new(
            Uuid::new_v4(),
            name.to_string(),
            email.to_string(),
            plan,
            Seats::with_totals(1, 1, 1),
            None,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        account.status = status;
        account
    }

    fn accounts() -> Vec<Account> {
        vec![
            account("Northwind", "ops@northwind.test", Plan::Pro, AccountStatus::Active),
            account("Contoso", "it@contoso.test", Plan::Free, AccountStatus::Trial),
            account("Fabrikam", "admin@north.test", Plan::Enterprise, AccountStatus::Suspended),
        ]
    }

    fn names(found: &[&Account]) -> Vec<String> {
        found.iter().map(|a| a.name.clone()).collect()
    }

    #[test]
    fn query_matches_name_or_email_ignoring_case() {
        let all = accounts();
        assert_eq!(
            names(&filter_accounts(&all, "NORTH", StatusFilter::All)),
            vec!["Northwind", "Fabrikam"]
        );
        assert!(filter_accounts(&all, "zzz", StatusFilter::All).is_empty());
    }

    #[test]
    fn empty_query_applies_only_status() {
        let all = accounts();
        assert_eq!(filter_accounts(&all, "", StatusFilter::All).len(), 3);
        assert_eq!(
            names(&filter_accounts(&all, "", StatusFilter::Only(AccountStatus::Trial))),
            vec!["Contoso"]
        );
    }

    #[test]
    fn predicates_combine_with_and() {
        let all = accounts();
        let found = filter_accounts(&all, "north", StatusFilter::Only(AccountStatus::Active));
        assert_eq!(names(&found), vec!["Northwind"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let all = accounts();
        let once = filter_accounts(&all, "o", StatusFilter::All);
        let twice = filter_accounts(once.iter().copied(), "o", StatusFilter::All);
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_strings_are_case_sensitive() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "Suspended".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(AccountStatus::Suspended)
        );
        assert!("suspended".parse::<StatusFilter>().is_err());
        assert!("All".parse::<RoleFilter>().is_err());
        assert_eq!(
            "Supervisor".parse::<RoleFilter>().unwrap(),
            RoleFilter::Only(Role::Supervisor)
        );
    }

    #[test]
    fn picker_matches_plan_and_trims() {
        let all = accounts();
        assert_eq!(names(&filter_account_picker(&all, "  enterprise ")), vec!["Fabrikam"]);
        assert_eq!(filter_account_picker(&all, "   ").len(), 3);
    }

    #[test]
    fn users_match_account_name_and_role() {
        let acme = Uuid::new_v4();
        let mut lead = User::invited(
            Uuid::new_v4(),
            "Grace".to_string(),
            "Hopper".to_string(),
            "grace@navy.test".to_string(),
            Role::Supervisor,
            acme,
            "Compiler Corp".to_string(),
        );
        lead.status = crate::user::UserStatus::Active;
        let agent = User::invited(
            Uuid::new_v4(),
            "Alan".to_string(),
            "Turing".to_string(),
            "alan@bletchley.test".to_string(),
            Role::Agent,
            acme,
            "Compiler Corp".to_string(),
        );
        let users = vec![lead, agent];

        assert_eq!(filter_users(&users, "compiler", RoleFilter::All).len(), 2);
        let agents = filter_users(&users, "compiler", RoleFilter::Only(Role::Agent));
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].name, "Alan Turing");
        assert_eq!(filter_users(&users, "BLETCHLEY", RoleFilter::All).len(), 1);
    }
}
