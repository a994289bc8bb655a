//! Cancellable mutating actions.
//!
//! Every mutation runs inside an [`ActionContext`] carrying the operator's
//! role and a cancellation token. The [`ActionRunner`] only commits while
//! the token is live: once the initiator goes away (the dialog closes, the
//! HTTP client disconnects) a pending action can no longer touch state.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use common::{AppError, AppResult};
use domain::{authorize, OperatorAction, Role};

/// Who is acting, and whether they still care about the outcome.
#[derive(Debug, Clone)]
pub struct ActionContext {
    operator: Role,
    cancel: CancellationToken,
}

impl ActionContext {
    /// Context with a fresh token.
    pub fn new(operator: Role) -> Self {
        Self::with_token(operator, CancellationToken::new())
    }

    /// Context bound to an existing token (e.g. a child of a request token).
    pub fn with_token(operator: Role, cancel: CancellationToken) -> Self {
        Self { operator, cancel }
    }

    pub fn operator(&self) -> Role {
        self.operator
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Abandon the action.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Check the operator's role against `action`.
    pub fn authorize(&self, action: OperatorAction) -> AppResult<()> {
        authorize(self.operator, action).map_err(|e| {
            warn!(operator = %self.operator, ?action, "Operator not allowed to perform action");
            AppError::from(e)
        })
    }
}

/// Runs commits after an optional simulated backend round trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionRunner {
    latency: Duration,
}

impl ActionRunner {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// No simulated latency.
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Wait out the latency, then run `commit` unless `ctx` was cancelled.
    pub async fn run<T, F, Fut>(&self, ctx: &ActionContext, action: &'static str, commit: F) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if !self.latency.is_zero() {
            tokio::select! {
                biased;
                _ = ctx.token().cancelled() => {
                    warn!(action, "Action cancelled while in flight");
                    return Err(AppError::Cancelled);
                }
                _ = tokio::time::sleep(self.latency) => {}
            }
        }

        if ctx.is_cancelled() {
            warn!(action, "Action cancelled before commit");
            return Err(AppError::Cancelled);
        }

        debug!(action, operator = %ctx.operator(), "Committing action");
        commit().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn commits_when_live() {
        let runner = ActionRunner::immediate();
        let ctx = ActionContext::new(Role::Admin);
        let result = runner.run(&ctx, "noop", || async { Ok(7) }).await;
        assert_eq!(tokio_test::assert_ok!(result), 7);
    }

    #[tokio::test]
    async fn cancelled_context_never_commits() {
        let runner = ActionRunner::immediate();
        let ctx = ActionContext::new(Role::Admin);
        ctx.cancel();

        let committed = Arc::new(AtomicBool::new(false));
        let flag = committed.clone();
        let result = runner
            .run(&ctx, "noop", || async move {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(!committed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn cancel_during_latency_aborts() {
        let runner = ActionRunner::new(Duration::from_secs(30));
        let ctx = ActionContext::new(Role::Admin);

        let closer = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            closer.cancel();
        });

        let committed = Arc::new(AtomicBool::new(false));
        let flag = committed.clone();
        let result = runner
            .run(&ctx, "slow", || async move {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(!committed.load(Ordering::SeqCst));
    }

    #[test]
    fn authorize_maps_to_forbidden() {
        let ctx = ActionContext::new(Role::Agent);
        assert!(matches!(
            ctx.authorize(OperatorAction::ManageAccounts),
            Err(AppError::Forbidden)
        ));
        assert!(ctx.authorize(OperatorAction::View).is_ok());
    }
}
