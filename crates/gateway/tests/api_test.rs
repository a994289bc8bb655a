//! Integration tests for API endpoints.
//!
//! These tests drive the router in-process over the seeded in-memory
//! registry.

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

use account_service_lib::repository::seed::{NEXGEN_ID, TECHCORP_ID};
use account_service_lib::{ConsoleConfig, Services};
use domain::StatusFilter;
use gateway_lib::config::GatewayConfig;
use gateway_lib::middleware::OPERATOR_ROLE_HEADER;
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;

// =============================================================================
// Helpers
// =============================================================================

fn app() -> Router {
    let services = Services::in_memory(ConsoleConfig::default()).unwrap();
    create_router(AppState::new(services, GatewayConfig::default()))
}

fn request(method: Method, uri: &str, role: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder.header(OPERATOR_ROLE_HEADER, role);
    }
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn names(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect()
}

// =============================================================================
// Health & roles
// =============================================================================

#[tokio::test]
async fn health_needs_no_operator() {
    let app = app();
    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["registry"]["accounts"], 4);
}

#[tokio::test]
async fn console_routes_require_operator_role() {
    let app = app();
    let (status, body) = send(&app, request(Method::GET, "/accounts", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, request(Method::GET, "/accounts", Some("Owner"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn roles_are_listed_by_hierarchy() {
    let app = app();
    let (status, body) = send(&app, request(Method::GET, "/roles", Some("Agent"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let levels: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["level"].as_u64().unwrap())
        .collect();
    assert_eq!(levels, vec![1, 2, 3]);
    assert_eq!(body[0]["name"], "Admin");

    let (status, body) =
        send(&app, request(Method::GET, "/roles/supervisor", Some("Agent"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["color"], "blue");
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn account_filters() {
    let app = app();

    let (status, body) = send(
        &app,
        request(Method::GET, "/accounts?status=Suspended", Some("Admin"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["NexGen Technologies"]);

    let (status, body) = send(
        &app,
        request(Method::GET, "/accounts?search=quantum&status=all", Some("Admin"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Quantum Dynamics"]);
    assert_eq!(body[0]["next_renewal"], "N/A");

    let (status, body) = send(
        &app,
        request(Method::GET, "/accounts?status=suspended", Some("Admin"), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn picker_matches_plan() {
    let app = app();
    let (status, body) = send(
        &app,
        request(Method::GET, "/accounts/picker?search=%20free%20", Some("Admin"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Quantum Dynamics"]);
}

#[tokio::test]
async fn seats_report_availability() {
    let app = app();
    let uri = format!("/accounts/{}/seats", TECHCORP_ID);
    let (status, body) = send(&app, request(Method::GET, &uri, Some("Agent"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin"], json!({"used": 2, "total": 5, "available": 3}));
    assert_eq!(body["agent"]["available"], 0);
}

#[tokio::test]
async fn create_account_validates_and_authorizes() {
    let app = app();
    let payload = json!({
        "name": "Acme Support",
        "contact_email": "ops@acme.com",
        "plan": "Free",
        "admin_seats": 1,
        "agent_seats": 4
    });

    let (status, _) = send(
        &app,
        request(Method::POST, "/accounts", Some("Supervisor"), Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let invalid = json!({
        "name": "Acme Support",
        "contact_email": "ops@acme.com",
        "plan": "Pro",
        "admin_seats": 0
    });
    let (status, body) = send(
        &app,
        request(Method::POST, "/accounts", Some("Admin"), Some(invalid)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Must have at least 1 admin seat");

    let (status, body) = send(
        &app,
        request(Method::POST, "/accounts", Some("Admin"), Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "Active");
    assert_eq!(body["next_renewal"], "N/A");
    assert_eq!(body["seats"]["agent"], json!({"used": 0, "total": 4, "available": 4}));

    let (status, _) = send(
        &app,
        request(Method::POST, "/accounts", Some("Admin"), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn delete_account_requires_typed_name() {
    let app = app();
    let uri = format!("/accounts/{}?confirmation=nexgen", NEXGEN_ID);
    let (status, _) = send(&app, request(Method::DELETE, &uri, Some("Admin"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/accounts/{}?confirmation=NexGen%20Technologies", NEXGEN_ID);
    let (status, _) = send(&app, request(Method::DELETE, &uri, Some("Admin"), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let uri = format!("/accounts/{}", NEXGEN_ID);
    let (status, _) = send(&app, request(Method::GET, &uri, Some("Admin"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn invite_with_lowercase_role() {
    let app = app();
    let payload = json!({
        "account_id": TECHCORP_ID,
        "first_name": "Nora",
        "last_name": "Quinn",
        "email": "nora@techcorp.com",
        "role": "supervisor"
    });
    let (status, body) = send(
        &app,
        request(Method::POST, "/users", Some("Admin"), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Nora Quinn");
    assert_eq!(body["role"], "Supervisor");
    assert_eq!(body["status"], "Pending");

    let (_, body) = send(
        &app,
        request(Method::GET, "/users?search=nora&role=Supervisor", Some("Agent"), None),
    )
    .await;
    assert_eq!(names(&body), vec!["Nora Quinn"]);
}

#[tokio::test]
async fn invite_rejects_short_names() {
    let app = app();
    let payload = json!({
        "account_id": TECHCORP_ID,
        "first_name": "N",
        "last_name": "Quinn",
        "email": "nora@techcorp.com",
        "role": "agent"
    });
    let (status, body) = send(
        &app,
        request(Method::POST, "/users", Some("Admin"), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "First name must be at least 2 characters"
    );
}

#[tokio::test]
async fn impersonation_is_admin_only_and_audited() {
    let app = app();
    let uri = format!("/users/{}/impersonate", uuid::Uuid::from_u128(0x102));

    let (status, _) = send(&app, request(Method::POST, &uri, Some("Supervisor"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, request(Method::POST, &uri, Some("Admin"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["name"], "Mike Chen");
    let audit_id = body["audit_id"].clone();

    let (_, feed) = send(&app, request(Method::GET, "/activity?limit=1", Some("Admin"), None)).await;
    assert_eq!(feed[0]["kind"], "user_impersonated");
    assert_eq!(feed[0]["id"], audit_id);
}

#[tokio::test]
async fn dashboard_counts_registry() {
    let app = app();
    let (status, body) = send(&app, request(Method::GET, "/dashboard", Some("Agent"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_accounts"], 4);
    assert_eq!(body["pending_users"], 1);
    assert!(body["recent_activity"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn activity_trail_for_one_account() {
    let app = app();
    let uri = format!("/accounts/{}/suspension", TECHCORP_ID);
    let (status, _) = send(&app, request(Method::POST, &uri, Some("Admin"), None)).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/activity?target={}", TECHCORP_ID);
    let (status, trail) = send(&app, request(Method::GET, &uri, Some("Agent"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trail.as_array().unwrap().len(), 1);

    let uri = format!("/activity?target={}", NEXGEN_ID);
    let (_, trail) = send(&app, request(Method::GET, &uri, Some("Agent"), None)).await;
    assert!(trail.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn dropped_request_commits_nothing() {
    let config = ConsoleConfig {
        action_latency_ms: 200,
        ..ConsoleConfig::default()
    };
    let services = Services::in_memory(config).unwrap();
    let app = create_router(AppState::new(services.clone(), GatewayConfig::default()));

    let payload = json!({
        "name": "Acme Support",
        "contact_email": "ops@acme.com",
        "plan": "Pro",
        "admin_seats": 1
    });
    let pending = app.oneshot(request(Method::POST, "/accounts", Some("Admin"), Some(payload)));
    let outcome = tokio::time::timeout(Duration::from_millis(50), pending).await;
    assert!(outcome.is_err(), "request should still be waiting on the action");

    // Outlive the action latency; the dropped request must not commit late
    tokio::time::sleep(Duration::from_millis(300)).await;

    let found = services
        .accounts
        .list_accounts("acme", StatusFilter::All)
        .await
        .unwrap();
    assert!(found.is_empty());
    assert!(services.dashboard.recent_activity(5).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_account_name_is_rejected() {
    let app = app();
    let payload = json!({
        "name": "    ",
        "contact_email": "ops@acme.com",
        "plan": "Pro",
        "admin_seats": 1
    });
    let (status, body) = send(
        &app,
        request(Method::POST, "/accounts", Some("Admin"), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Company name must be at least 2 characters"
    );
}
