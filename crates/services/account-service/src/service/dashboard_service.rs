//! Dashboard service - Registry totals and the recent activity feed.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use common::AppResult;
use domain::{AccountStatus, ActivityEntry, UserStatus};

use crate::repository::{AccountRepository, ActivityRepository, UserRepository};

/// Headline numbers for the dashboard cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_accounts: usize,
    pub active_accounts: usize,
    pub trial_accounts: usize,
    pub suspended_accounts: usize,
    pub total_users: usize,
    pub active_users: usize,
    pub pending_users: usize,
    pub suspended_users: usize,
    pub conversations_this_month: u64,
    pub active_workflows: u64,
}

/// Dashboard service trait for dependency injection.
#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn stats(&self) -> AppResult<DashboardStats>;

    /// Newest entries first
    async fn recent_activity(&self, limit: usize) -> AppResult<Vec<ActivityEntry>>;

    /// Audit trail of one account or user, oldest first
    async fn activity_for(&self, target_id: Uuid) -> AppResult<Vec<ActivityEntry>>;
}

pub struct Dashboard {
    accounts: Arc<dyn AccountRepository>,
    users: Arc<dyn UserRepository>,
    activity: Arc<dyn ActivityRepository>,
}

impl Dashboard {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        users: Arc<dyn UserRepository>,
        activity: Arc<dyn ActivityRepository>,
    ) -> Self {
        Self {
            accounts,
            users,
            activity,
        }
    }
}

#[async_trait]
impl DashboardService for Dashboard {
    async fn stats(&self) -> AppResult<DashboardStats> {
        let accounts = self.accounts.list().await?;
        let users = self.users.list().await?;

        let count_accounts = |status| accounts.iter().filter(|a| a.status == status).count();
        let count_users = |status| users.iter().filter(|u| u.status == status).count();

        Ok(DashboardStats {
            total_accounts: accounts.len(),
            active_accounts: count_accounts(AccountStatus::Active),
            trial_accounts: count_accounts(AccountStatus::Trial),
            suspended_accounts: count_accounts(AccountStatus::Suspended),
            total_users: users.len(),
            active_users: count_users(UserStatus::Active),
            pending_users: count_users(UserStatus::Pending),
            suspended_users: count_users(UserStatus::Suspended),
            conversations_this_month: accounts.iter().map(|a| a.conversations_this_month).sum(),
            active_workflows: accounts.iter().map(|a| u64::from(a.active_workflows)).sum(),
        })
    }

    async fn recent_activity(&self, limit: usize) -> AppResult<Vec<ActivityEntry>> {
        self.activity.recent(limit).await
    }

    async fn activity_for(&self, target_id: Uuid) -> AppResult<Vec<ActivityEntry>> {
        self.activity.for_target(target_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::seed::{sample_accounts, sample_users};
    use crate::repository::{InMemoryAccountStore, InMemoryActivityLog, InMemoryUserStore};

    #[tokio::test]
    async fn stats_over_sample_registry() {
        let dashboard = Dashboard::new(
            Arc::new(InMemoryAccountStore::with_accounts(sample_accounts())),
            Arc::new(InMemoryUserStore::with_users(sample_users())),
            Arc::new(InMemoryActivityLog::new()),
        );

        let stats = dashboard.stats().await.unwrap();
        assert_eq!(stats.total_accounts, 4);
        assert_eq!(stats.active_accounts, 2);
        assert_eq!(stats.trial_accounts, 1);
        assert_eq!(stats.suspended_accounts, 1);
        assert_eq!(stats.total_users, 8);
        assert_eq!(stats.active_users, 7);
        assert_eq!(stats.pending_users, 1);
        assert_eq!(stats.suspended_users, 0);
        assert_eq!(stats.conversations_this_month, 1247 + 856 + 234);
        assert_eq!(stats.active_workflows, 24 + 8 + 3 + 15);
    }
}
