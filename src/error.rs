//! Error types for the advance engine.
//!
//! Recoverable, user-actionable conditions (preconditions, field validation
//! and state conflicts) are distinct variants so callers can render specific
//! feedback. Storage failures collapse into a generic [`EngineError::Persistence`]
//! whose message is safe to display.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::AdvanceStatus;

/// Field name used for errors attached to the requested amount input.
pub const REQUESTED_AMOUNT_FIELD: &str = "requested_amount";

/// A business precondition that blocks any calculation for an employee.
///
/// Variants are ordered the way they are checked; the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ineligibility {
    /// The employee account is not active.
    AccountInactive,
    /// The employee's company is not active.
    CompanyInactive,
    /// No salary is registered for the employee.
    SalaryNotRegistered,
    /// No hire date is registered for the employee.
    HireDateNotRegistered,
    /// No bank account is registered for the employee.
    BankAccountNotRegistered,
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Ineligibility::AccountInactive => "account inactive",
            Ineligibility::CompanyInactive => "company inactive",
            Ineligibility::SalaryNotRegistered => "salary not registered",
            Ineligibility::HireDateNotRegistered => "hire date not registered",
            Ineligibility::BankAccountNotRegistered => "bank account not registered",
        };
        f.write_str(message)
    }
}

/// Field-level validation errors keyed by input field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Creates a set holding a single error for `field`.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.into(), message.into());
        Self(errors)
    }

    /// Returns the message attached to `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Returns the errors as a map of field name to message.
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

/// Why a status transition was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionConflict {
    /// The request is already in the target status.
    AlreadyInState {
        /// The status the request is in.
        status: AdvanceStatus,
    },
    /// The request has been paid and can no longer change.
    AlreadyPaid,
    /// The strict transition policy does not allow this edge.
    NotAllowed {
        /// The current status.
        from: AdvanceStatus,
        /// The requested target status.
        to: AdvanceStatus,
    },
    /// Another transition was committed after the guard was evaluated.
    ConcurrentModification,
}

impl fmt::Display for TransitionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionConflict::AlreadyInState { status } => {
                write!(f, "already in that state ({status})")
            }
            TransitionConflict::AlreadyPaid => f.write_str("already paid, immutable"),
            TransitionConflict::NotAllowed { from, to } => {
                write!(f, "transition from {from} to {to} is not allowed")
            }
            TransitionConflict::ConcurrentModification => {
                f.write_str("request was modified concurrently")
            }
        }
    }
}

/// The main error type for the advance engine.
///
/// # Example
///
/// ```
/// use advance_engine::error::{EngineError, Ineligibility};
///
/// let error = EngineError::Ineligible(Ineligibility::AccountInactive);
/// assert_eq!(error.to_string(), "Advance not available: account inactive");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A business precondition is unmet.
    #[error("Advance not available: {0}")]
    Ineligible(Ineligibility),

    /// One or more input fields are invalid.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// An illegal status transition was attempted.
    #[error("Cannot change status of request {request_id}: {conflict}")]
    StateConflict {
        /// The request the transition targeted.
        request_id: Uuid,
        /// Why the transition was rejected.
        conflict: TransitionConflict,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The id that was looked up.
        employee_id: String,
    },

    /// No company exists with the given id.
    #[error("Company not found: {company_id}")]
    CompanyNotFound {
        /// The id that was looked up.
        company_id: String,
    },

    /// No advance request exists with the given id.
    #[error("Advance request not found: {request_id}")]
    RequestNotFound {
        /// The id that was looked up.
        request_id: Uuid,
    },

    /// The underlying store failed. The root cause is logged, not carried.
    #[error("An error occurred during {operation}")]
    Persistence {
        /// The operation that failed (e.g. "creation", "update").
        operation: &'static str,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Builds a validation error attached to the requested amount field.
    pub fn requested_amount(message: impl Into<String>) -> Self {
        EngineError::Validation(FieldErrors::single(REQUESTED_AMOUNT_FIELD, message))
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
