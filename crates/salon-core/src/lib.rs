//! # salon-core: Pure Business Logic for the Salon
//!
//! This crate holds every business rule of the salon as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Salon Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 salon-admin (command line)                       │   │
//! │  │        agenda, tracking, report, add-service, cancel            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 salon-db (services + repositories)               │   │
//! │  │      ClientService, EmployeeService, CatalogService,            │   │
//! │  │      SchedulingService  ── one transaction per operation        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ calls                                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ salon-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │   types   │  │   money   │  │ validation │  │scheduling│  │   │
//! │  │   │  Client   │  │   Money   │  │ phone, CPF │  │  status  │  │   │
//! │  │   │ Scheduling│  │           │  │   email    │  │  rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities and their create/patch inputs
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Violations and the aggregated validation error
//! - [`validation`] - Contact field normalization and checks
//! - [`scheduling`] - Appointment state machine rules
//!
//! ## Aggregated Validation
//!
//! Rules never stop at the first failure. Every check returns the list of
//! [`Violation`]s it found, callers concatenate the lists and turn a
//! non-empty list into a single [`ValidationError`]:
//!
//! ```rust
//! use salon_core::validation::validate_person_fields;
//! use salon_core::{ValidationError, Violation};
//!
//! let violations = validate_person_fields("Maria", "maria@badhost.com", "123", None);
//! assert_eq!(violations.len(), 3);
//!
//! let err = ValidationError::check(violations).unwrap_err();
//! assert!(err.contains(&Violation::IncompleteName));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod scheduling;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, UniqueField, ValidationError, Violation, ViolationKind};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Email providers accepted for clients and employees.
///
/// Matched against the first label of the email domain, case-insensitively,
/// so `ana@Gmail.com.br` is accepted and `ana@mail.gmail.com` is not.
pub const ALLOWED_EMAIL_DOMAINS: [&str; 3] = ["gmail", "hotmail", "outlook"];

/// Number of digits in a Brazilian mobile number with area code.
pub const PHONE_DIGITS: usize = 11;

/// Number of digits in a CPF.
pub const TAX_ID_DIGITS: usize = 11;
