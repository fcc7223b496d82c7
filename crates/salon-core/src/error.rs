//! # Error Types
//!
//! Domain-specific error types for salon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  salon-core errors (this file)                                         │
//! │  ├── Violation        - One broken rule (field, uniqueness, state)     │
//! │  ├── ValidationError  - Ordered, non-empty list of violations          │
//! │  └── CoreError        - General domain errors                          │
//! │                                                                         │
//! │  salon-db errors (separate crate)                                      │
//! │  └── DbError          - NotFound, Validation(..), storage failures     │
//! │                                                                         │
//! │  Flow: Violation* → ValidationError → DbError::Validation → caller     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every violation renders a message a form can show as-is
//! 3. Violations are collected, never thrown one at a time
//! 4. Lookups that fail are NOT violations (see `DbError::NotFound`)

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Violation
// =============================================================================

/// Fields that must be unique among persons of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UniqueField {
    Email,
    Phone,
    TaxId,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UniqueField::Email => "email",
            UniqueField::Phone => "phone number",
            UniqueField::TaxId => "CPF",
        };
        f.write_str(label)
    }
}

/// Category of a [`Violation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A single field breaks a structural rule.
    Field,
    /// A value already belongs to another record of the same kind.
    Uniqueness,
    /// The scheduling state machine forbids the operation.
    StateTransition,
}

/// A single broken business rule.
///
/// ## When This Occurs
/// ```text
/// create client ("Maria", "maria@yahoo.com", "1234")
///      │
///      ▼
/// validate_person_fields
///      │
///      ├── IncompleteName
///      ├── PhoneDigits
///      └── EmailDomainNotAllowed { domain: "yahoo" }
///      │
///      ▼
/// ValidationError (3 violations) ── the form shows all three at once
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, TS)]
#[ts(export)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Violation {
    /// Name has fewer than two words.
    #[error("full name must contain at least a first and a last name")]
    IncompleteName,

    /// Phone does not have exactly 11 digits.
    #[error("phone number must have 11 digits, e.g. (XX) XXXXX-XXXX")]
    PhoneDigits,

    /// CPF does not have exactly 11 digits.
    #[error("CPF must have 11 digits")]
    TaxIdDigits,

    /// Email without exactly one `@`.
    #[error("invalid email format")]
    InvalidEmailFormat,

    /// Email provider outside the allow-list.
    #[error("email domain '{domain}' is not allowed; use gmail, hotmail or outlook")]
    EmailDomainNotAllowed { domain: String },

    /// Service name is empty or whitespace.
    #[error("service must have a name")]
    ServiceNameRequired,

    /// Service price is zero or negative.
    #[error("service price must be greater than R$ 0,00")]
    PriceNotPositive,

    /// Value already used by another record of the same kind.
    #[error("this {field} is already in use")]
    Duplicate { field: UniqueField },

    /// Client already holds a Scheduled or Executing appointment.
    #[error("client already has an active appointment (scheduled or executing)")]
    ActiveAppointment,

    /// Appointment date is before today.
    #[error("appointments cannot be booked on past dates")]
    PastDate,

    /// Update attempted on a Completed or Canceled appointment.
    #[error("appointment is in a final state and cannot be altered")]
    FinalState,

    /// Cancel attempted on a Completed or Canceled appointment.
    #[error("appointment is already in a final state and cannot be canceled")]
    AlreadyFinal,
}

impl Violation {
    /// Returns the taxonomy bucket of this violation.
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::IncompleteName
            | Violation::PhoneDigits
            | Violation::TaxIdDigits
            | Violation::InvalidEmailFormat
            | Violation::EmailDomainNotAllowed { .. }
            | Violation::ServiceNameRequired
            | Violation::PriceNotPositive => ViolationKind::Field,
            Violation::Duplicate { .. } => ViolationKind::Uniqueness,
            Violation::ActiveAppointment
            | Violation::PastDate
            | Violation::FinalState
            | Violation::AlreadyFinal => ViolationKind::StateTransition,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Every violation found by one create/update/cancel call, in the order the
/// rules ran. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, TS)]
#[ts(export)]
#[error("{}", self.summary())]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Turns a collected list into a result: empty means the input passed.
    ///
    /// ## Example
    /// ```rust
    /// use salon_core::{ValidationError, Violation};
    ///
    /// assert!(ValidationError::check(vec![]).is_ok());
    ///
    /// let err = ValidationError::check(vec![Violation::PastDate]).unwrap_err();
    /// assert_eq!(err.violations(), &[Violation::PastDate]);
    /// ```
    pub fn check(violations: Vec<Violation>) -> Result<(), ValidationError> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }

    /// Wraps a single violation.
    pub fn single(violation: Violation) -> Self {
        ValidationError {
            violations: vec![violation],
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Human-readable messages, one per violation, in order.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    pub fn contains(&self, violation: &Violation) -> bool {
        self.violations.contains(violation)
    }

    fn summary(&self) -> String {
        format!(
            "{} validation error(s): {}",
            self.violations.len(),
            self.messages().join("; ")
        )
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Text that cannot be read as a monetary amount.
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),

    /// Business rule violations (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Unit Tests
// =============================================================================
