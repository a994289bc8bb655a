//! Impersonation service - Audited "sign in as user" sessions.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, ImpersonationConfig, OptionExt};
use domain::{
    get_role_definition, ActivityEntry, ActivityKind, OperatorAction, Role, User,
    SECONDS_PER_MINUTE, TOKEN_TYPE_BEARER,
};

use crate::actions::{ActionContext, ActionRunner};
use crate::repository::{ActivityRepository, UserRepository};

/// Session token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpersonationClaims {
    /// Impersonated user
    pub sub: Uuid,
    pub account_id: Uuid,
    pub role: Role,
    /// Label of the operator's role
    pub impersonated_by: String,
    /// Audit entry written before the token was issued
    pub audit_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Issued impersonation session
#[derive(Debug, Clone, Serialize)]
pub struct ImpersonationSession {
    /// Signed session token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub audit_id: Uuid,
    pub user: User,
}

/// Impersonation service trait for dependency injection.
#[async_trait]
pub trait ImpersonationService: Send + Sync {
    /// Audit and open a session as `user_id`
    async fn impersonate(&self, ctx: &ActionContext, user_id: Uuid) -> AppResult<ImpersonationSession>;

    /// Verify a session token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<ImpersonationClaims>;
}

/// Concrete implementation of ImpersonationService.
pub struct Impersonator {
    users: Arc<dyn UserRepository>,
    activity: Arc<dyn ActivityRepository>,
    runner: ActionRunner,
    config: ImpersonationConfig,
}

impl Impersonator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        activity: Arc<dyn ActivityRepository>,
        runner: ActionRunner,
        config: ImpersonationConfig,
    ) -> Self {
        Self {
            users,
            activity,
            runner,
            config,
        }
    }

    fn secret_bytes(&self) -> &[u8] {
        self.config.secret.as_bytes()
    }

    fn issue_token(&self, claims: &ImpersonationClaims) -> AppResult<String> {
        Ok(encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret_bytes()),
        )?)
    }
}

#[async_trait]
impl ImpersonationService for Impersonator {
    async fn impersonate(&self, ctx: &ActionContext, user_id: Uuid) -> AppResult<ImpersonationSession> {
        ctx.authorize(OperatorAction::Impersonate)?;

        let user = self.users.find_by_id(user_id).await?.ok_or_not_found()?;
        if !user.is_active() {
            warn!(%user_id, status = %user.status, "Refusing to impersonate inactive user");
            return Err(AppError::validation(format!(
                "Cannot sign in as a {} user",
                user.status
            )));
        }

        self.runner
            .run(ctx, "impersonate_user", || async {
                let entry = ActivityEntry::new(
                    ActivityKind::UserImpersonated,
                    ctx.operator(),
                    user.id,
                    format!("{} signed in as {}", ctx.operator(), user.name),
                )
                .in_account(user.account_id);
                let audit_id = entry.id;
                self.activity.append(entry).await?;

                let now = Utc::now();
                let claims = ImpersonationClaims {
                    sub: user.id,
                    account_id: user.account_id,
                    role: user.role,
                    impersonated_by: get_role_definition(ctx.operator()).label.to_string(),
                    audit_id,
                    exp: (now + Duration::minutes(self.config.ttl_minutes)).timestamp(),
                    iat: now.timestamp(),
                };
                let access_token = self.issue_token(&claims)?;

                info!(user_id = %user.id, %audit_id, "Impersonation session issued");
                Ok(ImpersonationSession {
                    access_token,
                    token_type: TOKEN_TYPE_BEARER.to_string(),
                    expires_in: self.config.ttl_minutes * SECONDS_PER_MINUTE,
                    audit_id,
                    user: user.clone(),
                })
            })
            .await
    }

    fn verify_token(&self, token: &str) -> AppResult<ImpersonationClaims> {
        let token_data = decode::<ImpersonationClaims>(
            token,
            &DecodingKey::from_secret(self.secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockActivityRepository, MockUserRepository};
    use domain::UserStatus;

    const SECRET: &str = "an-impersonation-secret-for-unit-tests";

    fn user(status: UserStatus) -> User {
        let mut user = User::invited(
            Uuid::new_v4(),
            "Mike".to_string(),
            "Chen".to_string(),
            "mike@techcorp.com".to_string(),
            Role::Agent,
            Uuid::new_v4(),
            "TechCorp Solutions".to_string(),
        );
        user.status = status;
        user
    }

    fn impersonator(users: MockUserRepository, activity: MockActivityRepository) -> Impersonator {
        Impersonator::new(
            Arc::new(users),
            Arc::new(activity),
            ActionRunner::immediate(),
            ImpersonationConfig {
                secret: SECRET.to_string(),
                ttl_minutes: 60,
            },
        )
    }

    #[tokio::test]
    async fn issues_verifiable_token_after_audit() {
        let target = user(UserStatus::Active);
        let returned = target.clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(returned.clone())));
        let mut activity = MockActivityRepository::new();
        activity
            .expect_append()
            .times(1)
            .withf(|entry| entry.kind == ActivityKind::UserImpersonated)
            .returning(|_| Ok(()));

        let service = impersonator(users, activity);
        let ctx = ActionContext::new(Role::Admin);
        let session = service.impersonate(&ctx, target.id).await.unwrap();

        assert_eq!(session.token_type, "Bearer");
        assert_eq!(session.expires_in, 3600);

        let claims = service.verify_token(&session.access_token).unwrap();
        assert_eq!(claims.sub, target.id);
        assert_eq!(claims.account_id, target.account_id);
        assert_eq!(claims.role, Role::Agent);
        assert_eq!(claims.impersonated_by, "Admin");
        assert_eq!(claims.audit_id, session.audit_id);
    }

    #[tokio::test]
    async fn pending_user_cannot_be_impersonated() {
        let target = user(UserStatus::Pending);
        let returned = target.clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(returned.clone())));
        let mut activity = MockActivityRepository::new();
        activity.expect_append().never();

        let ctx = ActionContext::new(Role::Admin);
        let result = impersonator(users, activity).impersonate(&ctx, target.id).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn only_admins_impersonate() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();

        let ctx = ActionContext::new(Role::Supervisor);
        let result = impersonator(users, MockActivityRepository::new())
            .impersonate(&ctx, Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = impersonator(MockUserRepository::new(), MockActivityRepository::new());
        assert!(service.verify_token("not.a.token").is_err());
    }
}
