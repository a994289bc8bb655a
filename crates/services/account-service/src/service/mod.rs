//! Service layer for business logic.

mod account_service;
mod dashboard_service;
mod impersonation_service;
mod user_service;

pub use account_service::{AccountManager, AccountService};
pub use dashboard_service::{Dashboard, DashboardService, DashboardStats};
pub use impersonation_service::{
    ImpersonationClaims, ImpersonationService, ImpersonationSession, Impersonator,
};
pub use user_service::{UserManager, UserService};
