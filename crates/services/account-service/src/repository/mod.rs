//! Repository layer for data access.

mod account_repository;
mod activity_repository;
pub mod seed;
mod user_repository;

pub use account_repository::{AccountChange, AccountRepository, InMemoryAccountStore};
pub use activity_repository::{ActivityRepository, InMemoryActivityLog};
pub use user_repository::{InMemoryUserStore, UserChange, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use activity_repository::MockActivityRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// A stored record as it was before and after an atomic change
#[derive(Debug, Clone, PartialEq)]
pub struct Modified<T> {
    pub before: T,
    pub after: T,
}
