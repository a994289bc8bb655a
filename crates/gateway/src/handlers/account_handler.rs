//! Account handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{
    AccountResponse, CreateAccount, Plan, SeatsResponse, StatusFilter, UpdateAccount, UserResponse,
};

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentOperator;
use crate::state::AppState;

/// Account creation request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[validate(length(min = 2, message = "Company name must be at least 2 characters"))]
    #[schema(example = "Acme Support")]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "ops@acme.com")]
    pub contact_email: String,
    pub plan: Plan,
    #[validate(range(min = 1, message = "Must have at least 1 admin seat"))]
    #[schema(example = 2)]
    pub admin_seats: u32,
    #[serde(default)]
    pub supervisor_seats: u32,
    #[serde(default)]
    pub agent_seats: u32,
    #[schema(example = "Sarah Chen")]
    pub account_manager: Option<String>,
}

impl From<CreateAccountRequest> for CreateAccount {
    fn from(req: CreateAccountRequest) -> Self {
        Self {
            name: req.name,
            contact_email: req.contact_email,
            plan: req.plan,
            admin_seats: req.admin_seats,
            supervisor_seats: req.supervisor_seats,
            agent_seats: req.agent_seats,
            account_manager: req.account_manager,
        }
    }
}

/// Account edit request; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub contact_email: Option<String>,
    pub plan: Option<Plan>,
    #[validate(range(min = 1, message = "Must have at least 1 admin seat"))]
    pub admin_seats: Option<u32>,
    pub supervisor_seats: Option<u32>,
    pub agent_seats: Option<u32>,
    pub account_manager: Option<String>,
}

impl From<UpdateAccountRequest> for UpdateAccount {
    fn from(req: UpdateAccountRequest) -> Self {
        Self {
            name: req.name,
            contact_email: req.contact_email,
            plan: req.plan,
            admin_seats: req.admin_seats,
            supervisor_seats: req.supervisor_seats,
            agent_seats: req.agent_seats,
            account_manager: req.account_manager,
        }
    }
}

/// Search box and status dropdown
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccountQuery {
    /// Case-insensitive substring of name or contact email
    pub search: Option<String>,
    /// `all`, `Active`, `Trial` or `Suspended`
    pub status: Option<String>,
}

/// Account picker search
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PickerQuery {
    /// Substring of name, contact email or plan
    pub search: Option<String>,
}

/// Typed confirmation for destructive actions
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConfirmationQuery {
    /// Must equal the target's name exactly
    pub confirmation: Option<String>,
}

/// Create account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/picker", get(account_picker))
        .route(
            "/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/:id/suspension", post(toggle_account_suspension))
        .route("/:id/seats", get(get_account_seats))
        .route("/:id/users", get(list_account_users))
}

/// List accounts matching the search and status filter
#[utoipa::path(
    get,
    path = "/accounts",
    tag = "Accounts",
    security(("operator_role" = [])),
    params(AccountQuery),
    responses(
        (status = 200, description = "Matching accounts", body = Vec<AccountResponse>),
        (status = 400, description = "Unknown status filter"),
        (status = 401, description = "Operator role missing")
    )
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> AppResult<Json<Vec<AccountResponse>>> {
    let status = match query.status.as_deref() {
        Some(status) => status.parse::<StatusFilter>()?,
        None => StatusFilter::All,
    };
    let accounts = state
        .services
        .accounts
        .list_accounts(query.search.as_deref().unwrap_or_default(), status)
        .await?;
    Ok(Json(accounts.iter().map(AccountResponse::from).collect()))
}

/// Accounts offered by the invite form's picker
#[utoipa::path(
    get,
    path = "/accounts/picker",
    tag = "Accounts",
    security(("operator_role" = [])),
    params(PickerQuery),
    responses(
        (status = 200, description = "Matching accounts", body = Vec<AccountResponse>),
        (status = 401, description = "Operator role missing")
    )
)]
pub async fn account_picker(
    State(state): State<AppState>,
    Query(query): Query<PickerQuery>,
) -> AppResult<Json<Vec<AccountResponse>>> {
    let accounts = state
        .services
        .accounts
        .account_picker(query.search.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(accounts.iter().map(AccountResponse::from).collect()))
}

/// Get account by ID
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("operator_role" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account details", body = AccountResponse),
        (status = 401, description = "Operator role missing"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    let account = state.services.accounts.get_account(id).await?;
    Ok(Json(AccountResponse::from(account)))
}

/// Create a new account (admin only)
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "Accounts",
    security(("operator_role" = [])),
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 409, description = "Name or contact email already in use")
    )
)]
pub async fn create_account(
    Extension(operator): Extension<CurrentOperator>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAccountRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let account = state
        .services
        .accounts
        .create_account(&operator.context(), payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// Edit account details and seat totals (admin only)
#[utoipa::path(
    put,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("operator_role" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Name or contact email already in use")
    )
)]
pub async fn update_account(
    Extension(operator): Extension<CurrentOperator>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAccountRequest>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .accounts
        .update_account(&operator.context(), id, payload.into())
        .await?;
    Ok(Json(AccountResponse::from(account)))
}

/// Suspend an active account or reactivate a suspended one (admin only)
#[utoipa::path(
    post,
    path = "/accounts/{id}/suspension",
    tag = "Accounts",
    security(("operator_role" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "New account state", body = AccountResponse),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Action cancelled")
    )
)]
pub async fn toggle_account_suspension(
    Extension(operator): Extension<CurrentOperator>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .accounts
        .toggle_suspension(&operator.context(), id)
        .await?;
    Ok(Json(AccountResponse::from(account)))
}

/// Delete an account and its users (admin only, typed confirmation)
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("operator_role" = [])),
    params(("id" = Uuid, Path, description = "Account ID"), ConfirmationQuery),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Confirmation does not match the account name"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn delete_account(
    Extension(operator): Extension<CurrentOperator>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmationQuery>,
) -> AppResult<StatusCode> {
    state
        .services
        .accounts
        .delete_account(
            &operator.context(),
            id,
            query.confirmation.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Seat usage per role
#[utoipa::path(
    get,
    path = "/accounts/{id}/seats",
    tag = "Accounts",
    security(("operator_role" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Seat usage", body = SeatsResponse),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account_seats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SeatsResponse>> {
    let account = state.services.accounts.get_account(id).await?;
    Ok(Json(SeatsResponse::from(&account.seats)))
}

/// Users belonging to an account
#[utoipa::path(
    get,
    path = "/accounts/{id}/users",
    tag = "Accounts",
    security(("operator_role" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account users", body = Vec<UserResponse>),
        (status = 404, description = "Account not found")
    )
)]
pub async fn list_account_users(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.services.users.list_account_users(id).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}
