//! User handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use account_service_lib::service::ImpersonationSession;
use common::AppResult;
use domain::{InviteUser, Role, RoleFilter, UpdateUser, UserResponse};

use crate::extractors::ValidatedJson;
use crate::handlers::account_handler::ConfirmationQuery;
use crate::middleware::CurrentOperator;
use crate::state::AppState;

/// Invitation request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InviteUserRequest {
    pub account_id: Uuid,
    #[validate(length(min = 2, message = "First name must be at least 2 characters"))]
    #[schema(example = "Nora")]
    pub first_name: String,
    #[validate(length(min = 2, message = "Last name must be at least 2 characters"))]
    #[schema(example = "Quinn")]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "nora@techcorp.com")]
    pub email: String,
    /// Canonical or lowercase role name
    #[schema(example = "agent")]
    pub role: Role,
    /// Personal note for the invitee
    pub message: Option<String>,
}

impl From<InviteUserRequest> for InviteUser {
    fn from(req: InviteUserRequest) -> Self {
        Self {
            account_id: req.account_id,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            role: req.role,
            message: req.message,
        }
    }
}

/// User edit request; the owning account cannot change
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, message = "First name must be at least 2 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 2, message = "Last name must be at least 2 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            role: req.role,
        }
    }
}

/// Search box and role dropdown
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Case-insensitive substring of name, email or account name
    pub search: Option<String>,
    /// `all`, `Admin`, `Supervisor` or `Agent`
    pub role: Option<String>,
}

/// Impersonation session returned to the console
#[derive(Debug, Serialize, ToSchema)]
pub struct ImpersonationResponse {
    /// Signed session token
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    /// Audit entry recorded for this session
    pub audit_id: Uuid,
    pub user: UserResponse,
}

impl From<ImpersonationSession> for ImpersonationResponse {
    fn from(session: ImpersonationSession) -> Self {
        Self {
            access_token: session.access_token,
            token_type: session.token_type,
            expires_in: session.expires_in,
            audit_id: session.audit_id,
            user: UserResponse::from(session.user),
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(invite_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/suspension", post(toggle_user_suspension))
        .route("/:id/impersonate", post(impersonate_user))
}

/// List users matching the search and role filter
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("operator_role" = [])),
    params(UserQuery),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserResponse>),
        (status = 400, description = "Unknown role filter"),
        (status = 401, description = "Operator role missing")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let role = match query.role.as_deref() {
        Some(role) => role.parse::<RoleFilter>()?,
        None => RoleFilter::All,
    };
    let users = state
        .services
        .users
        .list_users(query.search.as_deref().unwrap_or_default(), role)
        .await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("operator_role" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 401, description = "Operator role missing"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Invite a user into an account
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("operator_role" = [])),
    request_body = InviteUserRequest,
    responses(
        (status = 201, description = "Pending user created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Operator cannot invite this role"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Email already in use, or no seat left")
    )
)]
pub async fn invite_user(
    Extension(operator): Extension<CurrentOperator>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<InviteUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .services
        .users
        .invite_user(&operator.context(), payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Edit a user's name, email or role
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("operator_role" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Operator cannot manage this user or assign this role"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use, or no seat left")
    )
)]
pub async fn update_user(
    Extension(operator): Extension<CurrentOperator>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users
        .update_user(&operator.context(), id, payload.into())
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Suspend a user or reactivate a suspended one
#[utoipa::path(
    post,
    path = "/users/{id}/suspension",
    tag = "Users",
    security(("operator_role" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "New user state", body = UserResponse),
        (status = 403, description = "Operator cannot manage this user"),
        (status = 404, description = "User not found")
    )
)]
pub async fn toggle_user_suspension(
    Extension(operator): Extension<CurrentOperator>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users
        .toggle_suspension(&operator.context(), id)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Delete a user (admin only, typed confirmation)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("operator_role" = [])),
    params(("id" = Uuid, Path, description = "User ID"), ConfirmationQuery),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Confirmation does not match the user name"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(operator): Extension<CurrentOperator>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmationQuery>,
) -> AppResult<StatusCode> {
    state
        .services
        .users
        .delete_user(
            &operator.context(),
            id,
            query.confirmation.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Sign in as an active user (admin only, audited)
#[utoipa::path(
    post,
    path = "/users/{id}/impersonate",
    tag = "Users",
    security(("operator_role" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Session issued", body = ImpersonationResponse),
        (status = 400, description = "User is not active"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn impersonate_user(
    Extension(operator): Extension<CurrentOperator>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ImpersonationResponse>> {
    let session = state
        .services
        .impersonation
        .impersonate(&operator.context(), id)
        .await?;
    Ok(Json(ImpersonationResponse::from(session)))
}
