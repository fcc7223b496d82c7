//! # Service Module
//!
//! Business operations that combine salon-core rules with storage.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Call, One Transaction                            │
//! │                                                                         │
//! │  ClientService::create(input)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  begin_write(pool)   (BEGIN IMMEDIATE)                                 │
//! │       │                                                                 │
//! │       ├── salon_core::validation  → field violations                   │
//! │       ├── Repo::email_in_use ...  → Duplicate violations               │
//! │       │                                                                 │
//! │       ├── any violations? ── yes ──► drop tx (rollback), Err(list)     │
//! │       │                                                                 │
//! │       ▼ no                                                              │
//! │  Repo::insert(&mut *tx) → tx.commit()                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every query of an operation runs on the transaction's connection. Do not
//! reach back into the pool while a transaction is open: the in-memory pool
//! has a single connection.
//!
//! Writes start with `BEGIN IMMEDIATE`. A deferred transaction reads from a
//! WAL snapshot and then fails with `database is locked` when another writer
//! committed first; an immediate one waits for the write lock instead, so the
//! check and the write see the same state.
//!
//! ## Available Services
//!
//! - [`ClientService`] - Client registry
//! - [`EmployeeService`] - Employee registry
//! - [`CatalogService`] - Service catalog
//! - [`SchedulingService`] - Appointment state machine and reporting

pub mod catalog;
pub mod client;
pub mod employee;
pub mod scheduling;

pub use catalog::CatalogService;
pub use client::ClientService;
pub use employee::EmployeeService;
pub use scheduling::SchedulingService;

use salon_core::{UniqueField, ValidationError, Violation};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::warn;

use crate::error::{DbError, DbResult};

/// Opens a transaction that holds the write lock from its first statement.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Fails with every collected violation, logging the rejection.
pub(crate) fn reject_violations(operation: &'static str, violations: Vec<Violation>) -> DbResult<()> {
    ValidationError::check(violations).map_err(|err| {
        warn!(
            operation,
            violations = err.violations().len(),
            error = %err,
            "Operation rejected"
        );
        DbError::Validation(err)
    })
}

/// Maps a UNIQUE failure on a person table to the matching `Duplicate`.
///
/// Only reached when another writer stored the same value after our own
/// uniqueness check ran.
pub(crate) fn person_unique_violation(err: DbError) -> DbError {
    let DbError::UniqueViolation { field, .. } = &err else {
        return err;
    };

    let unique = if field.ends_with(".email") {
        UniqueField::Email
    } else if field.ends_with(".phone") {
        UniqueField::Phone
    } else if field.ends_with(".tax_id") {
        UniqueField::TaxId
    } else {
        return err;
    };

    ValidationError::single(Violation::Duplicate { field: unique }).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_mapping() {
        let err = person_unique_violation(DbError::duplicate("employee.tax_id", "unknown"));
        assert_eq!(
            err.violations(),
            Some(&[Violation::Duplicate { field: UniqueField::TaxId }][..])
        );

        let other = person_unique_violation(DbError::duplicate("scheduling.client_id", "unknown"));
        assert!(matches!(other, DbError::UniqueViolation { .. }));

        let untouched = person_unique_violation(DbError::not_found("Client", "x"));
        assert!(untouched.is_not_found());
    }

    #[test]
    fn test_reject_violations() {
        assert!(reject_violations("test", vec![]).is_ok());

        let err = reject_violations("test", vec![Violation::PhoneDigits]).unwrap_err();
        assert_eq!(err.violations(), Some(&[Violation::PhoneDigits][..]));
    }
}
