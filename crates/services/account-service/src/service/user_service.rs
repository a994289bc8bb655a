//! User service - Handles invitations and user lifecycle.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt, SeatPolicyConfig};
use domain::{
    filter_users, require_confirmation, validation, ActivityEntry, ActivityKind, InviteUser,
    OperatorAction, Role, RoleFilter, UpdateUser, User, UserStatus,
};

use crate::actions::{ActionContext, ActionRunner};
use crate::repository::{AccountRepository, ActivityRepository, Modified, UserRepository};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Users matching the search box and role dropdown
    async fn list_users(&self, query: &str, role: RoleFilter) -> AppResult<Vec<User>>;

    /// Users of one account
    async fn list_account_users(&self, account_id: Uuid) -> AppResult<Vec<User>>;

    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Invite a user into an account (creates a pending user)
    async fn invite_user(&self, ctx: &ActionContext, input: InviteUser) -> AppResult<User>;

    /// Update name, email or role
    async fn update_user(&self, ctx: &ActionContext, id: Uuid, patch: UpdateUser) -> AppResult<User>;

    /// Suspend an active/pending user, or activate a suspended one
    async fn toggle_suspension(&self, ctx: &ActionContext, id: Uuid) -> AppResult<User>;

    /// Delete a user; `confirmation` must equal the user's name
    async fn delete_user(&self, ctx: &ActionContext, id: Uuid, confirmation: &str) -> AppResult<()>;
}

/// Concrete implementation of UserService using repositories.
pub struct UserManager {
    accounts: Arc<dyn AccountRepository>,
    users: Arc<dyn UserRepository>,
    activity: Arc<dyn ActivityRepository>,
    runner: ActionRunner,
    seat_policy: SeatPolicyConfig,
}

impl UserManager {
    /// Create new user service instance with repositories
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        users: Arc<dyn UserRepository>,
        activity: Arc<dyn ActivityRepository>,
        runner: ActionRunner,
        seat_policy: SeatPolicyConfig,
    ) -> Self {
        Self {
            accounts,
            users,
            activity,
            runner,
            seat_policy,
        }
    }

    /// Reserve a seat, logging when the role was already full.
    async fn reserve_seat(&self, account_id: Uuid, role: Role) -> AppResult<()> {
        let had_room = self
            .accounts
            .reserve_seat(account_id, role, self.seat_policy.enforce_limits)
            .await?;
        if !had_room {
            warn!(%account_id, %role, "Seat limit exceeded; account is over-allocated");
        }
        Ok(())
    }

    /// Give back a seat taken for a write that did not happen.
    async fn return_seat(&self, account_id: Uuid, role: Role) {
        if let Err(e) = self.accounts.release_seat(account_id, role).await {
            warn!(%account_id, %role, error = %e, "Could not return reserved seat");
        }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(&self, query: &str, role: RoleFilter) -> AppResult<Vec<User>> {
        let users = self.users.list().await?;
        let found: Vec<User> = filter_users(&users, query, role)
            .into_iter()
            .cloned()
            .collect();
        debug!(query, ?role, matched = found.len(), "Filtered users");
        Ok(found)
    }

    async fn list_account_users(&self, account_id: Uuid) -> AppResult<Vec<User>> {
        self.accounts.find_by_id(account_id).await?.ok_or_not_found()?;
        self.users.list_by_account(account_id).await
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found()
    }

    async fn invite_user(&self, ctx: &ActionContext, input: InviteUser) -> AppResult<User> {
        ctx.authorize(OperatorAction::InviteUser { role: input.role })?;

        let first_name = validation::first_name(&input.first_name)?;
        let last_name = validation::last_name(&input.last_name)?;
        let email = input.email.trim().to_string();

        self.runner
            .run(ctx, "invite_user", || async {
                let account = self
                    .accounts
                    .find_by_id(input.account_id)
                    .await?
                    .ok_or_not_found()?;
                self.reserve_seat(account.id, input.role).await?;

                let user = User::invited(
                    Uuid::new_v4(),
                    first_name,
                    last_name,
                    email,
                    input.role,
                    account.id,
                    account.name.clone(),
                );
                let user = match self.users.insert(user).await {
                    Ok(user) => user,
                    Err(e) => {
                        self.return_seat(account.id, input.role).await;
                        return Err(e);
                    }
                };

                if let Some(message) = input.message.as_deref().filter(|m| !m.trim().is_empty()) {
                    debug!(user_id = %user.id, message, "Invitation carries a personal message");
                }

                self.activity
                    .append(
                        ActivityEntry::new(
                            ActivityKind::UserInvited,
                            ctx.operator(),
                            user.id,
                            format!("{} invited to {}", user.name, account.name),
                        )
                        .in_account(account.id),
                    )
                    .await?;

                info!(user_id = %user.id, account_id = %account.id, role = %user.role, "Invitation sent");
                Ok(user)
            })
            .await
    }

    async fn update_user(&self, ctx: &ActionContext, id: Uuid, patch: UpdateUser) -> AppResult<User> {
        let current = self.get_user(id).await?;
        ctx.authorize(OperatorAction::ManageUser { role: current.role })?;
        if let Some(role) = patch.role {
            if role != current.role {
                ctx.authorize(OperatorAction::AssignRole { role })?;
            }
        }

        let first_name = patch.first_name.as_deref().map(validation::first_name).transpose()?;
        let last_name = patch.last_name.as_deref().map(validation::last_name).transpose()?;
        let email = patch.email.map(|e| e.trim().to_string());
        let new_role = patch.role.filter(|role| *role != current.role);

        self.runner
            .run(ctx, "update_user", || async {
                // The new role's seat is taken first so a full role fails
                // before anything is written.
                if let Some(role) = new_role {
                    self.reserve_seat(current.account_id, role).await?;
                }

                let modified = self
                    .users
                    .modify(
                        id,
                        Box::new(move |user: &mut User| -> AppResult<()> {
                            if first_name.is_some() || last_name.is_some() {
                                user.rename(first_name, last_name);
                            }
                            if let Some(email) = email {
                                user.email = email;
                            }
                            if let Some(role) = new_role {
                                user.role = role;
                            }
                            Ok(())
                        }),
                    )
                    .await;

                let Modified { before, after: user } = match modified {
                    Ok(modified) => modified,
                    Err(e) => {
                        if let Some(role) = new_role {
                            self.return_seat(current.account_id, role).await;
                        }
                        return Err(e);
                    }
                };
                if before.role != user.role {
                    self.accounts.release_seat(user.account_id, before.role).await?;
                } else if let Some(role) = new_role {
                    // Another edit already moved the user to this role
                    self.return_seat(user.account_id, role).await;
                }

                self.activity
                    .append(
                        ActivityEntry::new(
                            ActivityKind::UserUpdated,
                            ctx.operator(),
                            user.id,
                            format!("{} has been updated", user.name),
                        )
                        .in_account(user.account_id),
                    )
                    .await?;

                info!(user_id = %user.id, "User updated");
                Ok(user)
            })
            .await
    }

    async fn toggle_suspension(&self, ctx: &ActionContext, id: Uuid) -> AppResult<User> {
        let current = self.get_user(id).await?;
        ctx.authorize(OperatorAction::ManageUser { role: current.role })?;

        self.runner
            .run(ctx, "toggle_user_suspension", || async {
                let user = self
                    .users
                    .modify(
                        id,
                        Box::new(|user: &mut User| -> AppResult<()> {
                            user.toggle_suspension();
                            Ok(())
                        }),
                    )
                    .await?
                    .after;
                let status = user.status;

                let (kind, verb) = match status {
                    UserStatus::Suspended => (ActivityKind::UserSuspended, "suspended"),
                    _ => (ActivityKind::UserActivated, "activated"),
                };
                self.activity
                    .append(
                        ActivityEntry::new(
                            kind,
                            ctx.operator(),
                            user.id,
                            format!("{} has been {}", user.name, verb),
                        )
                        .in_account(user.account_id),
                    )
                    .await?;

                info!(user_id = %user.id, %status, "User {}", verb);
                Ok(user)
            })
            .await
    }

    async fn delete_user(&self, ctx: &ActionContext, id: Uuid, confirmation: &str) -> AppResult<()> {
        ctx.authorize(OperatorAction::DeleteUser)?;

        let user = self.get_user(id).await?;
        require_confirmation(&user.name, confirmation).map_err(|e| {
            warn!(user_id = %id, "User deletion not confirmed");
            AppError::from(e)
        })?;

        self.runner
            .run(ctx, "delete_user", || async {
                self.users.delete(id).await?;
                match self.accounts.release_seat(user.account_id, user.role).await {
                    Ok(()) | Err(AppError::NotFound) => {}
                    Err(e) => return Err(e),
                }

                self.activity
                    .append(
                        ActivityEntry::new(
                            ActivityKind::UserDeleted,
                            ctx.operator(),
                            id,
                            format!("{} has been permanently deleted", user.name),
                        )
                        .in_account(user.account_id),
                    )
                    .await?;

                info!(user_id = %id, "User deleted");
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockAccountRepository, MockActivityRepository, MockUserRepository};
    use chrono::NaiveDate;
    use domain::{Account, Plan, Seats};

    fn manager(accounts: MockAccountRepository, users: MockUserRepository) -> UserManager {
        UserManager::new(
            Arc::new(accounts),
            Arc::new(users),
            Arc::new(MockActivityRepository::new()),
            ActionRunner::immediate(),
            SeatPolicyConfig::default(),
        )
    }

    fn invite(account_id: Uuid, role: Role) -> InviteUser {
        InviteUser {
            account_id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            role,
            message: None,
        }
    }

    #[tokio::test]
    async fn invite_into_unknown_account_is_not_found() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().returning(|_| Ok(None));
        accounts.expect_reserve_seat().never();
        let mut users = MockUserRepository::new();
        users.expect_insert().never();

        let ctx = ActionContext::new(Role::Admin);
        let result = manager(accounts, users)
            .invite_user(&ctx, invite(Uuid::new_v4(), Role::Agent))
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn supervisor_cannot_invite_admins() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().never();
        let users = MockUserRepository::new();

        let ctx = ActionContext::new(Role::Supervisor);
        let result = manager(accounts, users)
            .invite_user(&ctx, invite(Uuid::new_v4(), Role::Admin))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn blank_first_name_is_rejected_before_any_write() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().never();
        accounts.expect_reserve_seat().never();

        let mut form = invite(Uuid::new_v4(), Role::Agent);
        form.first_name = "   ".to_string();
        let result = manager(accounts, MockUserRepository::new())
            .invite_user(&ActionContext::new(Role::Admin), form)
            .await;
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.starts_with("First name")));
    }

    #[tokio::test]
    async fn rejected_insert_gives_the_seat_back() {
        let account_id = Uuid::new_v4();
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_id().returning(|id| {
            Ok(Some(Account::new(
                id,
                "Analytical Engines".to_string(),
                "ops@engines.test".to_string(),
                Plan::Pro,
                Seats::with_totals(1, 1, 5),
                None,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )))
        });
        accounts
            .expect_reserve_seat()
            .times(1)
            .returning(|_, _, _| Ok(true));
        accounts
            .expect_release_seat()
            .withf(move |id, role| *id == account_id && *role == Role::Agent)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .returning(|_| Err(AppError::conflict("Email")));

        let result = manager(accounts, users)
            .invite_user(&ActionContext::new(Role::Admin), invite(account_id, Role::Agent))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn get_user_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let result = manager(MockAccountRepository::new(), users)
            .get_user(Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
