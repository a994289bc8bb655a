//! User repository with an in-memory store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::User;

use super::Modified;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Change applied to a stored user under the store's write lock
pub type UserChange = Box<dyn FnOnce(&mut User) -> AppResult<()> + Send>;

/// User repository trait for dependency injection.
///
/// Email addresses are unique, ignoring case.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// List all users in insertion order
    async fn list(&self) -> AppResult<Vec<User>>;

    /// List users belonging to an account
    async fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<User>>;

    /// Store a new user
    async fn insert(&self, user: User) -> AppResult<User>;

    /// Apply `change` to the stored user atomically. Nothing is written
    /// when the change fails or would reuse another user's email.
    async fn modify(&self, id: Uuid, change: UserChange) -> AppResult<Modified<User>>;

    /// Remove a user
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Remove every user of an account, returning how many were removed
    async fn delete_by_account(&self, account_id: Uuid) -> AppResult<usize>;

    /// Refresh the denormalised account name on the account's users
    async fn rename_account(&self, account_id: Uuid, account_name: &str) -> AppResult<usize>;
}

/// In-memory user store
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `users`
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }
}

fn email_taken(users: &[User], candidate: &User) -> bool {
    users
        .iter()
        .any(|u| u.id != candidate.id && u.email.eq_ignore_ascii_case(&candidate.email))
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| u.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id == user.id) {
            return Err(AppError::conflict("User"));
        }
        if email_taken(&users, &user) {
            return Err(AppError::conflict("Email"));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn modify(&self, id: Uuid, change: UserChange) -> AppResult<Modified<User>> {
        let mut users = self.users.write().await;
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(AppError::NotFound)?;

        let before = users[index].clone();
        let mut after = before.clone();
        change(&mut after)?;
        if email_taken(&users, &after) {
            return Err(AppError::conflict("Email"));
        }

        users[index] = after.clone();
        Ok(Modified { before, after })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);

        if users.len() == before {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn delete_by_account(&self, account_id: Uuid) -> AppResult<usize> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.account_id != account_id);
        Ok(before - users.len())
    }

    async fn rename_account(&self, account_id: Uuid, account_name: &str) -> AppResult<usize> {
        let mut users = self.users.write().await;
        let mut renamed = 0;
        for user in users.iter_mut().filter(|u| u.account_id == account_id) {
            user.account_name = account_name.to_string();
            renamed += 1;
        }
        Ok(renamed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::seed::{sample_users, INNOVATELABS_ID, TECHCORP_ID};
    use domain::Role;
    use std::sync::Arc;

    const MIKE_ID: Uuid = Uuid::from_u128(0x102);

    fn newcomer(email: &str) -> User {
        User::invited(
            Uuid::new_v4(),
            "Nora".to_string(),
            "Quinn".to_string(),
            email.to_string(),
            Role::Agent,
            TECHCORP_ID,
            "TechCorp Solutions".to_string(),
        )
    }

    #[tokio::test]
    async fn taken_email_is_rejected_ignoring_case() {
        let store = InMemoryUserStore::with_users(sample_users());

        let result = store.insert(newcomer("Mike@TechCorp.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(field)) if field == "Email"));

        let result = store
            .modify(
                MIKE_ID,
                Box::new(|user: &mut User| -> AppResult<()> {
                    user.email = "SARAH@techcorp.com".to_string();
                    Ok(())
                }),
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let mike = store.find_by_id(MIKE_ID).await.unwrap().unwrap();
        assert_eq!(mike.email, "mike@techcorp.com");
    }

    #[tokio::test]
    async fn concurrent_inserts_of_one_email_admit_one() {
        let store = Arc::new(InMemoryUserStore::new());
        let (first, second) = tokio::join!(
            store.insert(newcomer("dup@techcorp.com")),
            store.insert(newcomer("DUP@techcorp.com")),
        );
        assert!(first.is_ok() != second.is_ok());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn modify_reports_before_and_after() {
        let store = InMemoryUserStore::with_users(sample_users());
        let modified = store
            .modify(
                MIKE_ID,
                Box::new(|user: &mut User| -> AppResult<()> {
                    user.rename(None, Some("Cheng".to_string()));
                    Ok(())
                }),
            )
            .await
            .unwrap();
        assert_eq!(modified.before.name, "Mike Chen");
        assert_eq!(modified.after.name, "Mike Cheng");
        assert_eq!(modified.after.first_name, "Mike");
    }

    #[tokio::test]
    async fn account_rename_and_cascade() {
        let store = InMemoryUserStore::with_users(sample_users());

        let renamed = store.rename_account(INNOVATELABS_ID, "Innovate").await.unwrap();
        assert_eq!(renamed, 3);
        assert!(store
            .list_by_account(INNOVATELABS_ID)
            .await
            .unwrap()
            .iter()
            .all(|u| u.account_name == "Innovate"));

        let removed = store.delete_by_account(TECHCORP_ID).await.unwrap();
        assert_eq!(removed, 4);
        assert_eq!(store.list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn delete_unknown_user_is_not_found() {
        let store = InMemoryUserStore::new();
        assert!(matches!(
            store.delete(Uuid::new_v4()).await,
            Err(AppError::NotFound)
        ));
    }
}
