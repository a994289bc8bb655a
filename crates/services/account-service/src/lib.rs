//! Account Service Library
//!
//! This crate provides the console's account and user management: an
//! in-memory registry behind repository traits, the services that mutate
//! it, and the audit log every mutation writes to.

pub mod actions;
pub mod config;
pub mod container;
pub mod repository;
pub mod service;

pub use actions::{ActionContext, ActionRunner};
pub use config::ConsoleConfig;
pub use container::Services;
