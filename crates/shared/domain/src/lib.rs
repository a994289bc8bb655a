//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the role hierarchy, accounts and their seats, users, the filter engine
//! and the typed confirmation gate.

pub mod account;
pub mod activity;
pub mod confirmation;
pub mod constants;
pub mod error;
pub mod filter;
pub mod role;
pub mod seats;
pub mod user;
pub mod validation;

pub use account::{
    Account, AccountResponse, AccountStatus, CreateAccount, Plan, SeatResponse, SeatsResponse,
    UpdateAccount,
};
pub use activity::{ActivityEntry, ActivityKind};
pub use confirmation::{require_confirmation, ConfirmationGate};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use filter::{filter_account_picker, filter_accounts, filter_users, RoleFilter, StatusFilter};
pub use role::{
    authorize, get_role_definition, roles_by_hierarchy, OperatorAction, Role, RoleDefinition,
};
pub use seats::{SeatAllocation, Seats};
pub use user::{full_name, InviteUser, UpdateUser, User, UserResponse, UserStatus};
