//! OpenAPI documentation.

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::account_handler::{CreateAccountRequest, UpdateAccountRequest};
use crate::handlers::dashboard_handler::DashboardResponse;
use crate::handlers::role_handler::RoleResponse;
use crate::handlers::user_handler::{ImpersonationResponse, InviteUserRequest, UpdateUserRequest};
use crate::middleware::OPERATOR_ROLE_HEADER;
use domain::{
    AccountResponse, AccountStatus, ActivityEntry, ActivityKind, Plan, Role, SeatResponse,
    SeatsResponse, UserResponse, UserStatus,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::role_handler::list_roles,
        crate::handlers::role_handler::get_role,
        crate::handlers::dashboard_handler::dashboard,
        crate::handlers::dashboard_handler::activity,
        crate::handlers::account_handler::list_accounts,
        crate::handlers::account_handler::account_picker,
        crate::handlers::account_handler::get_account,
        crate::handlers::account_handler::create_account,
        crate::handlers::account_handler::update_account,
        crate::handlers::account_handler::toggle_account_suspension,
        crate::handlers::account_handler::delete_account,
        crate::handlers::account_handler::get_account_seats,
        crate::handlers::account_handler::list_account_users,
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::invite_user,
        crate::handlers::user_handler::update_user,
        crate::handlers::user_handler::toggle_user_suspension,
        crate::handlers::user_handler::delete_user,
        crate::handlers::user_handler::impersonate_user,
    ),
    components(
        schemas(
            Role,
            RoleResponse,
            Plan,
            AccountStatus,
            UserStatus,
            SeatResponse,
            SeatsResponse,
            AccountResponse,
            CreateAccountRequest,
            UpdateAccountRequest,
            UserResponse,
            InviteUserRequest,
            UpdateUserRequest,
            ImpersonationResponse,
            ActivityKind,
            ActivityEntry,
            DashboardResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Roles", description = "Role hierarchy"),
        (name = "Dashboard", description = "Registry totals and audit feed"),
        (name = "Accounts", description = "Tenant account management"),
        (name = "Users", description = "User management and impersonation"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "operator_role",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    OPERATOR_ROLE_HEADER,
                    "Role of the console operator: Admin, Supervisor or Agent",
                ))),
            );
        }
    }
}
