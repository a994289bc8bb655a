//! HTTP handlers.

pub mod account_handler;
pub mod dashboard_handler;
pub mod health_handler;
pub mod role_handler;
pub mod user_handler;

pub use account_handler::account_routes;
pub use dashboard_handler::dashboard_routes;
pub use health_handler::health_routes;
pub use role_handler::role_routes;
pub use user_handler::user_routes;
