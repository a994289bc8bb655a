//! Append-only activity (audit) log.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::AppResult;
use domain::ActivityEntry;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Activity repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Append an entry
    async fn append(&self, entry: ActivityEntry) -> AppResult<()>;

    /// Most recent entries, newest first
    async fn recent(&self, limit: usize) -> AppResult<Vec<ActivityEntry>>;

    /// All entries about one entity, oldest first
    async fn for_target(&self, target_id: Uuid) -> AppResult<Vec<ActivityEntry>>;
}

/// In-memory activity log
#[derive(Debug, Default)]
pub struct InMemoryActivityLog {
    entries: RwLock<Vec<ActivityEntry>>,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityLog {
    async fn append(&self, entry: ActivityEntry) -> AppResult<()> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> AppResult<Vec<ActivityEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().rev().take(limit).cloned().collect())
    }

    async fn for_target(&self, target_id: Uuid) -> AppResult<Vec<ActivityEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| e.target_id == target_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{ActivityKind, Role};

    #[tokio::test]
    async fn recent_is_newest_first_and_bounded() {
        let log = InMemoryActivityLog::new();
        let account = Uuid::new_v4();
        let user = Uuid::new_v4();
        for (kind, target) in [
            (ActivityKind::AccountCreated, account),
            (ActivityKind::UserInvited, user),
            (ActivityKind::UserSuspended, user),
        ] {
            log.append(ActivityEntry::new(kind, Role::Admin, target, "entry"))
                .await
                .unwrap();
        }

        let recent = log.recent(2).await.unwrap();
        let kinds: Vec<_> = recent.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ActivityKind::UserSuspended, ActivityKind::UserInvited]);

        let trail = log.for_target(user).await.unwrap();
        let kinds: Vec<_> = trail.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ActivityKind::UserInvited, ActivityKind::UserSuspended]);
    }
}
