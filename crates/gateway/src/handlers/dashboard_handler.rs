//! Dashboard and activity feed handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use account_service_lib::service::DashboardStats;
use common::AppResult;
use domain::ActivityEntry;

use crate::state::AppState;

/// Dashboard cards plus the latest activity
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
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
    pub recent_activity: Vec<ActivityEntry>,
}

impl DashboardResponse {
    fn new(stats: DashboardStats, recent_activity: Vec<ActivityEntry>) -> Self {
        Self {
            total_accounts: stats.total_accounts,
            active_accounts: stats.active_accounts,
            trial_accounts: stats.trial_accounts,
            suspended_accounts: stats.suspended_accounts,
            total_users: stats.total_users,
            active_users: stats.active_users,
            pending_users: stats.pending_users,
            suspended_users: stats.suspended_users,
            conversations_this_month: stats.conversations_this_month,
            active_workflows: stats.active_workflows,
            recent_activity,
        }
    }
}

/// Feed size and subject
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedQuery {
    /// Number of entries; defaults to ACTIVITY_FEED_LIMIT
    pub limit: Option<usize>,
    /// Only entries about this account or user, oldest first
    pub target: Option<Uuid>,
}

/// Create dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/activity", get(activity))
}

fn feed_limit(state: &AppState, query: &FeedQuery) -> usize {
    query
        .limit
        .unwrap_or(state.services.config.activity_feed_limit)
}

/// Registry totals and recent activity
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "Dashboard",
    security(("operator_role" = [])),
    params(FeedQuery),
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 401, description = "Operator role missing")
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let stats = state.services.dashboard.stats().await?;
    let recent = state
        .services
        .dashboard
        .recent_activity(feed_limit(&state, &query))
        .await?;
    Ok(Json(DashboardResponse::new(stats, recent)))
}

/// Audit log, newest first, or one entity's trail
#[utoipa::path(
    get,
    path = "/activity",
    tag = "Dashboard",
    security(("operator_role" = [])),
    params(FeedQuery),
    responses(
        (status = 200, description = "Activity entries", body = Vec<ActivityEntry>),
        (status = 401, description = "Operator role missing")
    )
)]
pub async fn activity(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<ActivityEntry>>> {
    let entries = match query.target {
        Some(target_id) => state.services.dashboard.activity_for(target_id).await?,
        None => {
            state
                .services
                .dashboard
                .recent_activity(feed_limit(&state, &query))
                .await?
        }
    };
    Ok(Json(entries))
}
