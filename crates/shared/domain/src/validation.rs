//! Normalisation of free-text form fields.
//!
//! Names are stored trimmed, so their minimum lengths are checked after
//! trimming.

use crate::constants::{MIN_ACCOUNT_NAME_LENGTH, MIN_PERSON_NAME_LENGTH};
use crate::error::{DomainError, DomainResult};

/// `value` without surrounding whitespace, provided at least `min_len`
/// characters remain.
pub fn trimmed_min_length(value: &str, min_len: usize, field: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() < min_len {
        return Err(DomainError::validation(format!(
            "{} must be at least {} characters",
            field, min_len
        )));
    }
    Ok(trimmed.to_string())
}

/// Company name of an account
pub fn account_name(value: &str) -> DomainResult<String> {
    trimmed_min_length(value, MIN_ACCOUNT_NAME_LENGTH, "Company name")
}

pub fn first_name(value: &str) -> DomainResult<String> {
    trimmed_min_length(value, MIN_PERSON_NAME_LENGTH, "First name")
}

pub fn last_name(value: &str) -> DomainResult<String> {
    trimmed_min_length(value, MIN_PERSON_NAME_LENGTH, "Last name")
}
