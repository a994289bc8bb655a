//! Route configuration.

use axum::{middleware, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{account_routes, dashboard_routes, health_routes, role_routes, user_routes};
use crate::middleware::operator_middleware;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let operator = || middleware::from_fn(operator_middleware);

    Router::new()
        // Health check (no operator required)
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Console routes (operator role required)
        .nest("/roles", role_routes().route_layer(operator()))
        .nest("/accounts", account_routes().route_layer(operator()))
        .nest("/users", user_routes().route_layer(operator()))
        .merge(dashboard_routes().route_layer(operator()))
        .with_state(state)
}
