//! Account service - Handles tenant account use cases.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    filter_account_picker, filter_accounts, require_confirmation, validation, Account,
    ActivityEntry, ActivityKind, AccountStatus, CreateAccount, OperatorAction, Role, Seats,
    StatusFilter, UpdateAccount, MIN_ADMIN_SEATS,
};

use crate::actions::{ActionContext, ActionRunner};
use crate::repository::{
    AccountChange, AccountRepository, ActivityRepository, Modified, UserRepository,
};

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Accounts matching the search box and status dropdown
    async fn list_accounts(&self, query: &str, status: StatusFilter) -> AppResult<Vec<Account>>;

    /// Accounts offered by the invite form's picker
    async fn account_picker(&self, query: &str) -> AppResult<Vec<Account>>;

    /// Get account by ID
    async fn get_account(&self, id: Uuid) -> AppResult<Account>;

    /// Create a new account
    async fn create_account(&self, ctx: &ActionContext, input: CreateAccount) -> AppResult<Account>;

    /// Update account details and seat totals
    async fn update_account(
        &self,
        ctx: &ActionContext,
        id: Uuid,
        patch: UpdateAccount,
    ) -> AppResult<Account>;

    /// Suspend an active/trial account, or activate a suspended one
    async fn toggle_suspension(&self, ctx: &ActionContext, id: Uuid) -> AppResult<Account>;

    /// Delete an account and its users; `confirmation` must equal the account name
    async fn delete_account(&self, ctx: &ActionContext, id: Uuid, confirmation: &str)
        -> AppResult<()>;
}

/// Concrete implementation of AccountService using repositories.
pub struct AccountManager {
    accounts: Arc<dyn AccountRepository>,
    users: Arc<dyn UserRepository>,
    activity: Arc<dyn ActivityRepository>,
    runner: ActionRunner,
}

impl AccountManager {
    /// Create new account service instance with repositories
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        users: Arc<dyn UserRepository>,
        activity: Arc<dyn ActivityRepository>,
        runner: ActionRunner,
    ) -> Self {
        Self {
            accounts,
            users,
            activity,
            runner,
        }
    }

    async fn record(&self, entry: ActivityEntry) -> AppResult<()> {
        self.activity.append(entry).await
    }
}

fn check_admin_seats(admin_seats: u32) -> AppResult<()> {
    if admin_seats < MIN_ADMIN_SEATS {
        return Err(AppError::validation("Must have at least 1 admin seat"));
    }
    Ok(())
}

fn normalize_manager(manager: String) -> Option<String> {
    Some(manager.trim().to_string()).filter(|m| !m.is_empty())
}

/// Turn an edit form into a change the store applies under its lock.
fn account_change(patch: UpdateAccount) -> AppResult<AccountChange> {
    let seat_totals: Vec<(Role, u32)> = patch.seat_totals().collect();
    let name = patch.name.as_deref().map(validation::account_name).transpose()?;
    let contact_email = patch.contact_email.map(|e| e.trim().to_string());
    let plan = patch.plan;
    let manager = patch.account_manager.map(normalize_manager);

    let change: AccountChange = Box::new(move |account: &mut Account| -> AppResult<()> {
        if let Some(name) = name {
            account.name = name;
        }
        if let Some(contact_email) = contact_email {
            account.contact_email = contact_email;
        }
        if let Some(plan) = plan {
            account.change_plan(plan);
        }
        for (role, total) in seat_totals {
            account.seats.resize(role, total)?;
        }
        if let Some(manager) = manager {
            account.account_manager = manager;
        }
        Ok(())
    });
    Ok(change)
}

#[async_trait]
impl AccountService for AccountManager {
    async fn list_accounts(&self, query: &str, status: StatusFilter) -> AppResult<Vec<Account>> {
        let accounts = self.accounts.list().await?;
        let found: Vec<Account> = filter_accounts(&accounts, query, status)
            .into_iter()
            .cloned()
            .collect();
        debug!(query, ?status, matched = found.len(), "Filtered accounts");
        Ok(found)
    }

    async fn account_picker(&self, query: &str) -> AppResult<Vec<Account>> {
        let accounts = self.accounts.list().await?;
        Ok(filter_account_picker(&accounts, query)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn get_account(&self, id: Uuid) -> AppResult<Account> {
        self.accounts.find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_account(&self, ctx: &ActionContext, input: CreateAccount) -> AppResult<Account> {
        ctx.authorize(OperatorAction::ManageAccounts)?;
        check_admin_seats(input.admin_seats)?;

        let name = validation::account_name(&input.name)?;
        let contact_email = input.contact_email.trim().to_string();

        self.runner
            .run(ctx, "create_account", || async {
                let account = Account::new(
                    Uuid::new_v4(),
                    name,
                    contact_email,
                    input.plan,
                    Seats::with_totals(input.admin_seats, input.supervisor_seats, input.agent_seats),
                    input.account_manager.and_then(normalize_manager),
                    Utc::now().date_naive(),
                );
                let account = self.accounts.insert(account).await?;

                self.record(ActivityEntry::new(
                    ActivityKind::AccountCreated,
                    ctx.operator(),
                    account.id,
                    format!("{} joined on {} plan", account.name, account.plan),
                ))
                .await?;

                info!(account_id = %account.id, name = %account.name, "Account created");
                Ok(account)
            })
            .await
    }

    async fn update_account(
        &self,
        ctx: &ActionContext,
        id: Uuid,
        patch: UpdateAccount,
    ) -> AppResult<Account> {
        ctx.authorize(OperatorAction::ManageAccounts)?;
        if let Some(admin_seats) = patch.admin_seats {
            check_admin_seats(admin_seats)?;
        }

        let change = account_change(patch)?;

        self.runner
            .run(ctx, "update_account", || async {
                let Modified {
                    before,
                    after: account,
                } = self.accounts.modify(id, change).await?;

                if account.name != before.name {
                    let renamed = self.users.rename_account(id, &account.name).await?;
                    debug!(account_id = %id, renamed, "Refreshed account name on users");
                }

                self.record(ActivityEntry::new(
                    ActivityKind::AccountUpdated,
                    ctx.operator(),
                    account.id,
                    format!("{} has been updated", account.name),
                ))
                .await?;

                info!(account_id = %account.id, "Account updated");
                Ok(account)
            })
            .await
    }

    async fn toggle_suspension(&self, ctx: &ActionContext, id: Uuid) -> AppResult<Account> {
        ctx.authorize(OperatorAction::ManageAccounts)?;

        self.runner
            .run(ctx, "toggle_account_suspension", || async {
                let account = self
                    .accounts
                    .modify(
                        id,
                        Box::new(|account: &mut Account| -> AppResult<()> {
                            account.toggle_suspension();
                            Ok(())
                        }),
                    )
                    .await?
                    .after;
                let status = account.status;

                let (kind, verb) = match status {
                    AccountStatus::Suspended => (ActivityKind::AccountSuspended, "suspended"),
                    _ => (ActivityKind::AccountActivated, "activated"),
                };
                self.record(ActivityEntry::new(
                    kind,
                    ctx.operator(),
                    account.id,
                    format!("{} has been {}", account.name, verb),
                ))
                .await?;

                info!(account_id = %account.id, %status, "Account {}", verb);
                Ok(account)
            })
            .await
    }

    async fn delete_account(
        &self,
        ctx: &ActionContext,
        id: Uuid,
        confirmation: &str,
    ) -> AppResult<()> {
        ctx.authorize(OperatorAction::ManageAccounts)?;

        let account = self.get_account(id).await?;
        require_confirmation(&account.name, confirmation).map_err(|e| {
            tracing::warn!(account_id = %id, "Account deletion not confirmed");
            AppError::from(e)
        })?;

        self.runner
            .run(ctx, "delete_account", || async {
                let removed_users = self.users.delete_by_account(id).await?;
                self.accounts.delete(id).await?;

                self.record(ActivityEntry::new(
                    ActivityKind::AccountDeleted,
                    ctx.operator(),
                    id,
                    format!("{} has been permanently deleted", account.name),
                ))
                .await?;

                info!(account_id = %id, removed_users, "Account deleted");
                Ok(())
            })
            .await
    }
}
