//! # Scheduling Rules
//!
//! The appointment state machine as pure functions. The database layer
//! gathers the facts (does the client already hold an active appointment?
//! what is today?) and these functions decide.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create   has_active? ── ActiveAppointment                             │
//! │           date < today? ── PastDate            (both reported)         │
//! │                                                                         │
//! │  update   status final? ── FinalState                                  │
//! │           new date < today? ── PastDate        (both reported)         │
//! │                                                                         │
//! │  cancel   status final? ── AlreadyFinal                                │
//! │           else ── status = Canceled                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::{ValidationError, Violation};
use crate::types::{Scheduling, SchedulingPatch, SchedulingStatus};

/// Checks whether a new appointment may be booked.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use salon_core::scheduling::check_create;
/// use salon_core::Violation;
///
/// let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
/// let yesterday = today.pred_opt().unwrap();
///
/// assert!(check_create(false, today, today).is_empty());
/// assert_eq!(
///     check_create(true, yesterday, today),
///     vec![Violation::ActiveAppointment, Violation::PastDate]
/// );
/// ```
pub fn check_create(client_has_active: bool, date: NaiveDate, today: NaiveDate) -> Vec<Violation> {
    let mut violations = Vec::new();

    if client_has_active {
        violations.push(Violation::ActiveAppointment);
    }

    if date < today {
        violations.push(Violation::PastDate);
    }

    violations
}

/// Checks whether `patch` may be applied to an appointment in `current`.
pub fn check_update(
    current: SchedulingStatus,
    patch: &SchedulingPatch,
    today: NaiveDate,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if current.is_final() {
        violations.push(Violation::FinalState);
    }

    if matches!(patch.date, Some(date) if date < today) {
        violations.push(Violation::PastDate);
    }

    violations
}

/// Checks whether an appointment in `current` may be canceled.
pub fn check_cancel(current: SchedulingStatus) -> Vec<Violation> {
    if current.is_final() {
        vec![Violation::AlreadyFinal]
    } else {
        Vec::new()
    }
}

/// Validates and applies a patch, returning the updated appointment.
///
/// The input is left untouched when any rule fails. `updated_at` is stamped
/// by the database layer on write.
pub fn apply_update(
    scheduling: &Scheduling,
    patch: SchedulingPatch,
    today: NaiveDate,
) -> Result<Scheduling, ValidationError> {
    ValidationError::check(check_update(scheduling.status, &patch, today))?;

    let mut updated = scheduling.clone();
    if let Some(professional_id) = patch.professional_id {
        updated.professional_id = Some(professional_id);
    }
    if let Some(service_id) = patch.service_id {
        updated.service_id = service_id;
    }
    if let Some(date) = patch.date {
        updated.date = date;
    }
    if let Some(time) = patch.time {
        updated.time = time;
    }
    if let Some(status) = patch.status {
        updated.status = status;
    }

    Ok(updated)
}

/// Moves an active appointment to Canceled.
pub fn apply_cancel(scheduling: &Scheduling) -> Result<Scheduling, ValidationError> {
    ValidationError::check(check_cancel(scheduling.status))?;

    let mut canceled = scheduling.clone();
    canceled.status = SchedulingStatus::Canceled;
    Ok(canceled)
}

// =============================================================================
// Unit Tests
// =============================================================================
