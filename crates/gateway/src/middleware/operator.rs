//! Operator identification middleware.

use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use account_service_lib::ActionContext;
use common::{AppError, AppResult};
use domain::Role;

/// Header carrying the console operator's role.
pub const OPERATOR_ROLE_HEADER: &str = "x-operator-role";

/// Operator of the current request.
#[derive(Debug, Clone)]
pub struct CurrentOperator {
    pub role: Role,
    cancel: CancellationToken,
}

impl CurrentOperator {
    /// Action context cancelled when the request is dropped.
    pub fn context(&self) -> ActionContext {
        ActionContext::with_token(self.role, self.cancel.child_token())
    }
}

/// Resolve the operator role and tie a cancellation token to the request.
///
/// A client that disconnects drops this future, and with it the guard,
/// so any action still waiting to commit is cancelled.
pub async fn operator_middleware(mut request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let role = operator_role(request.headers())?;

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    debug!(%role, path = %request.uri().path(), "Operator resolved");
    request
        .extensions_mut()
        .insert(CurrentOperator { role, cancel });

    Ok(next.run(request).await)
}

/// Parse the operator header.
fn operator_role(headers: &HeaderMap) -> AppResult<Role> {
    headers
        .get(OPERATOR_ROLE_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| Role::from_alias(value.trim()))
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn accepts_canonical_and_lowercase_roles() {
        let mut headers = HeaderMap::new();
        headers.insert(OPERATOR_ROLE_HEADER, HeaderValue::from_static("Supervisor"));
        assert_eq!(tokio_test::assert_ok!(operator_role(&headers)), Role::Supervisor);

        headers.insert(OPERATOR_ROLE_HEADER, HeaderValue::from_static("agent"));
        assert_eq!(tokio_test::assert_ok!(operator_role(&headers)), Role::Agent);
    }

    #[test]
    fn missing_or_unknown_role_is_unauthorized() {
        let mut headers = HeaderMap::new();
        assert!(matches!(operator_role(&headers), Err(AppError::Unauthorized)));

        headers.insert(OPERATOR_ROLE_HEADER, HeaderValue::from_static("ADMIN"));
        assert!(matches!(operator_role(&headers), Err(AppError::Unauthorized)));
    }
}
