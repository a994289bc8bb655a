//! Wiring of repositories into services.

use std::sync::Arc;

use tracing::info;

use common::AppResult;

use crate::actions::ActionRunner;
use crate::config::ConsoleConfig;
use crate::repository::seed::{sample_accounts, sample_users};
use crate::repository::{
    AccountRepository, ActivityRepository, InMemoryAccountStore, InMemoryActivityLog,
    InMemoryUserStore, UserRepository,
};
use crate::service::{
    AccountManager, AccountService, Dashboard, DashboardService, Impersonator,
    ImpersonationService, UserManager, UserService,
};

/// All console services, sharing one registry.
#[derive(Clone)]
pub struct Services {
    pub accounts: Arc<dyn AccountService>,
    pub users: Arc<dyn UserService>,
    pub impersonation: Arc<dyn ImpersonationService>,
    pub dashboard: Arc<dyn DashboardService>,
    pub config: ConsoleConfig,
}

impl Services {
    /// Build services over the given repositories.
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        user_repo: Arc<dyn UserRepository>,
        activity_repo: Arc<dyn ActivityRepository>,
        config: ConsoleConfig,
    ) -> AppResult<Self> {
        config.validate()?;
        let runner = ActionRunner::new(config.action_latency());

        Ok(Self {
            accounts: Arc::new(AccountManager::new(
                account_repo.clone(),
                user_repo.clone(),
                activity_repo.clone(),
                runner,
            )),
            users: Arc::new(UserManager::new(
                account_repo.clone(),
                user_repo.clone(),
                activity_repo.clone(),
                runner,
                config.seat_policy,
            )),
            impersonation: Arc::new(Impersonator::new(
                user_repo.clone(),
                activity_repo.clone(),
                runner,
                config.impersonation.clone(),
            )),
            dashboard: Arc::new(Dashboard::new(account_repo, user_repo, activity_repo)),
            config,
        })
    }

    /// Services over in-memory stores, seeded when `seed_sample_data` is set.
    pub fn in_memory(config: ConsoleConfig) -> AppResult<Self> {
        let (accounts, users) = if config.seed_sample_data {
            (sample_accounts(), sample_users())
        } else {
            (Vec::new(), Vec::new())
        };
        info!(
            accounts = accounts.len(),
            users = users.len(),
            "Initialising in-memory registry"
        );

        Self::new(
            Arc::new(InMemoryAccountStore::with_accounts(accounts)),
            Arc::new(InMemoryUserStore::with_users(users)),
            Arc::new(InMemoryActivityLog::new()),
            config,
        )
    }
}
