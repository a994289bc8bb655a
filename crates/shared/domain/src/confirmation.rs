//! Typed confirmation for destructive actions.
//!
//! A delete stays disabled until the operator has typed the target's
//! display name exactly (case and whitespace included).

use crate::error::{DomainError, DomainResult};

/// Confirmation lock guarding a destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationGate {
    expected: String,
    input: String,
}

impl ConfirmationGate {
    /// Lock that opens on exactly `expected`.
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            input: String::new(),
        }
    }

    /// Replace the typed text.
    pub fn type_text(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Clear the typed text, as when the dialog closes.
    pub fn reset(&mut self) {
        self.input.clear();
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Whether the confirm action is enabled.
    pub fn is_satisfied(&self) -> bool {
        !self.expected.is_empty() && self.input == self.expected
    }

    /// Fail unless the gate is open.
    pub fn check(&self) -> DomainResult<()> {
        if self.is_satisfied() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "Type '{}' to confirm",
                self.expected
            )))
        }
    }
}

/// One-shot check of a supplied confirmation against a display name.
pub fn require_confirmation(expected: &str, supplied: &str) -> DomainResult<()> {
    let mut gate = ConfirmationGate::new(expected);
    gate.type_text(supplied);
    gate.check()
}
