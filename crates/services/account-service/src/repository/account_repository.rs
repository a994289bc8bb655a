//! Account repository with an in-memory store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Account, Role};

use super::Modified;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Change applied to a stored account under the store's write lock
pub type AccountChange = Box<dyn FnOnce(&mut Account) -> AppResult<()> + Send>;

/// Account repository trait for dependency injection.
///
/// Listing preserves insertion order so filters stay stable. Names and
/// contact emails are unique, ignoring case.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// List all accounts in insertion order
    async fn list(&self) -> AppResult<Vec<Account>>;

    /// Store a new account
    async fn insert(&self, account: Account) -> AppResult<Account>;

    /// Apply `change` to the stored account atomically. Nothing is written
    /// when the change fails or would break uniqueness.
    async fn modify(&self, id: Uuid, change: AccountChange) -> AppResult<Modified<Account>>;

    /// Remove an account
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Take one seat of `role`; returns whether a free seat was available
    async fn reserve_seat(&self, id: Uuid, role: Role, enforce: bool) -> AppResult<bool>;

    /// Give back one seat of `role`
    async fn release_seat(&self, id: Uuid, role: Role) -> AppResult<()>;
}

/// In-memory account store
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `accounts`
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
        }
    }
}

/// The unique field `candidate` shares with another stored account, if any.
fn clash(accounts: &[Account], candidate: &Account) -> Option<&'static str> {
    let others = accounts.iter().filter(|a| a.id != candidate.id);
    for other in others {
        if other.name.eq_ignore_ascii_case(&candidate.name) {
            return Some("Account name");
        }
        if other.contact_email.eq_ignore_ascii_case(&candidate.contact_email) {
            return Some("Contact email");
        }
    }
    None
}

#[async_trait]
impl AccountRepository for InMemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        Ok(self.accounts.read().await.clone())
    }

    async fn insert(&self, account: Account) -> AppResult<Account> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.id == account.id) {
            return Err(AppError::conflict("Account"));
        }
        if let Some(field) = clash(&accounts, &account) {
            return Err(AppError::conflict(field));
        }
        accounts.push(account.clone());
        Ok(account)
    }

    async fn modify(&self, id: Uuid, change: AccountChange) -> AppResult<Modified<Account>> {
        let mut accounts = self.accounts.write().await;
        let index = accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or(AppError::NotFound)?;

        let before = accounts[index].clone();
        let mut after = before.clone();
        change(&mut after)?;
        if let Some(field) = clash(&accounts, &after) {
            return Err(AppError::conflict(field));
        }

        accounts[index] = after.clone();
        Ok(Modified { before, after })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|a| a.id != id);

        if accounts.len() == before {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn reserve_seat(&self, id: Uuid, role: Role, enforce: bool) -> AppResult<bool> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::NotFound)?;
        Ok(account.seats.reserve(role, enforce)?)
    }

    async fn release_seat(&self, id: Uuid, role: Role) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::NotFound)?;
        account.seats.release(role);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::seed::{sample_accounts, INNOVATELABS_ID, QUANTUM_ID};
    use chrono::NaiveDate;
    use domain::{Plan, Seats};
    use std::sync::Arc;

    fn acme(name: &str, contact_email: &str) -> Account {
        Account::new(
            Uuid::new_v4(),
            name.to_string(),
            contact_email.to_string(),
            Plan::Pro,
            Seats::with_totals(1, 0, 0),
            None,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn insert_rejects_taken_name_or_email_ignoring_case() {
        let store = InMemoryAccountStore::with_accounts(sample_accounts());

        let result = store.insert(acme("quantum dynamics", "new@acme.test")).await;
        assert!(matches!(result, Err(AppError::Conflict(field)) if field == "Account name"));

        let result = store.insert(acme("Acme", "CONTACT@QUANTUM.COM")).await;
        assert!(matches!(result, Err(AppError::Conflict(field)) if field == "Contact email"));

        assert_eq!(store.list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn failed_modify_writes_nothing() {
        let store = InMemoryAccountStore::with_accounts(sample_accounts());

        let result = store
            .modify(
                INNOVATELABS_ID,
                Box::new(|account: &mut Account| -> AppResult<()> {
                    account.name = "Quantum Dynamics".to_string();
                    Ok(())
                }),
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let result = store
            .modify(
                INNOVATELABS_ID,
                Box::new(|account: &mut Account| -> AppResult<()> {
                    account.active_workflows = 0;
                    Err(AppError::validation("rejected"))
                }),
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let account = store.find_by_id(INNOVATELABS_ID).await.unwrap().unwrap();
        assert_eq!(account.name, "InnovateLabs");
        assert_eq!(account.active_workflows, 8);
    }

    #[tokio::test]
    async fn modify_keeps_concurrent_seat_reservations() {
        let store = Arc::new(InMemoryAccountStore::with_accounts(sample_accounts()));
        let before = store.find_by_id(INNOVATELABS_ID).await.unwrap().unwrap();

        let mut tasks = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    store.reserve_seat(INNOVATELABS_ID, Role::Agent, false).await.map(|_| ())
                } else {
                    store
                        .modify(
                            INNOVATELABS_ID,
                            Box::new(move |account: &mut Account| -> AppResult<()> {
                                account.account_manager = Some(format!("Manager {}", i));
                                Ok(())
                            }),
                        )
                        .await
                        .map(|_| ())
                }
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let after = store.find_by_id(INNOVATELABS_ID).await.unwrap().unwrap();
        assert_eq!(after.seats.agent.used, before.seats.agent.used + 10);
    }

    #[tokio::test]
    async fn reserving_a_full_role() {
        let store = InMemoryAccountStore::with_accounts(sample_accounts());

        // Quantum Dynamics has 1 of 1 admin seats in use
        assert!(matches!(
            store.reserve_seat(QUANTUM_ID, Role::Admin, true).await,
            Err(AppError::SeatLimit(_))
        ));
        assert!(!store.reserve_seat(QUANTUM_ID, Role::Admin, false).await.unwrap());
        assert!(store.reserve_seat(QUANTUM_ID, Role::Supervisor, true).await.unwrap());

        let account = store.find_by_id(QUANTUM_ID).await.unwrap().unwrap();
        assert_eq!(account.seats.admin.used, 2);
        assert_eq!(account.seats.supervisor.used, 1);
    }
}
