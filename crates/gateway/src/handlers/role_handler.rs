//! Role handlers.

use axum::{extract::Path, response::Json, routing::get, Router};
use serde::Serialize;
use utoipa::ToSchema;

use common::{AppError, AppResult};
use domain::{get_role_definition, roles_by_hierarchy, Role, RoleDefinition};

use crate::state::AppState;

/// Role description shown on the roles page
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResponse {
    pub name: Role,
    pub label: String,
    pub description: String,
    pub permissions: Vec<String>,
    #[schema(example = "purple")]
    pub color: String,
    /// 1 is the highest authority
    pub level: u8,
}

impl From<&RoleDefinition> for RoleResponse {
    fn from(definition: &RoleDefinition) -> Self {
        Self {
            name: definition.name,
            label: definition.label.to_string(),
            description: definition.description.to_string(),
            permissions: definition.permissions.iter().map(|p| p.to_string()).collect(),
            color: definition.color.to_string(),
            level: definition.level,
        }
    }
}

/// Create role routes
pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles))
        .route("/:role", get(get_role))
}

/// Roles ordered from highest to lowest authority
#[utoipa::path(
    get,
    path = "/roles",
    tag = "Roles",
    security(("operator_role" = [])),
    responses(
        (status = 200, description = "Role hierarchy", body = Vec<RoleResponse>)
    )
)]
pub async fn list_roles() -> Json<Vec<RoleResponse>> {
    Json(roles_by_hierarchy().into_iter().map(RoleResponse::from).collect())
}

/// One role's definition
#[utoipa::path(
    get,
    path = "/roles/{role}",
    tag = "Roles",
    security(("operator_role" = [])),
    params(("role" = String, Path, description = "Admin, Supervisor or Agent")),
    responses(
        (status = 200, description = "Role definition", body = RoleResponse),
        (status = 404, description = "Unknown role")
    )
)]
pub async fn get_role(Path(role): Path<String>) -> AppResult<Json<RoleResponse>> {
    let role = Role::from_alias(&role).ok_or(AppError::NotFound)?;
    Ok(Json(RoleResponse::from(get_role_definition(role))))
}
