//! # Scheduling Service
//!
//! The appointment engine: create, update and cancel under the rules in
//! [`salon_core::scheduling`], plus the reporting reads.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   create ──► Scheduled ◄──── update ────► Executing                    │
//! │                 │   \                      /   │                        │
//! │                 │    └── update/cancel ───┘    │                        │
//! │                 ▼                              ▼                        │
//! │            Completed                       Canceled                     │
//! │        (final: update → FinalState, cancel → AlreadyFinal)             │
//! │                                                                         │
//! │   Per client: at most one row in Scheduled or Executing.               │
//! │   Checked inside the transaction; the partial unique index             │
//! │   uq_scheduling_active_client catches anything that slips through.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Order
//! 1. Unknown appointment / client / professional / service → `NotFound`
//! 2. Rule violations, all of them → `Validation`

use chrono::{Local, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::repository::{
    generate_id, ClientRepository, EmployeeRepository, SalonServiceRepository,
    SchedulingRepository,
};
use crate::service::{begin_write, reject_violations};
use salon_core::scheduling::{apply_cancel, apply_update, check_cancel, check_create, check_update};
use salon_core::{
    NewScheduling, Scheduling, SchedulingPatch, SchedulingStatus, ValidationError, Violation,
};

/// Source of "today" for the past-date rule.
pub type Clock = fn() -> NaiveDate;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Appointment operations.
///
/// ## Usage
/// ```rust,ignore
/// let agenda = db.schedulings();
///
/// let booked = agenda.create(NewScheduling { .. }).await?;
/// agenda.cancel(&booked.id).await?;
///
/// // tests pin the date
/// let agenda = db.schedulings().with_clock(|| NaiveDate::from_ymd_opt(2026, 5, 10).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct SchedulingService {
    pool: SqlitePool,
    today: Clock,
}

impl SchedulingService {
    /// Creates a service that uses the local calendar date as "today".
    pub fn new(pool: SqlitePool) -> Self {
        SchedulingService {
            pool,
            today: local_today,
        }
    }

    /// Replaces the date source.
    pub fn with_clock(mut self, today: Clock) -> Self {
        self.today = today;
        self
    }

    /// Books a new appointment in Scheduled.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - client, professional or service unknown
    /// * `Err(DbError::Validation)` - `ActiveAppointment` and/or `PastDate`
    pub async fn create(&self, input: NewScheduling) -> DbResult<Scheduling> {
        let today = (self.today)();
        let mut tx = begin_write(&self.pool).await?;

        if !ClientRepository::exists(&mut *tx, &input.client_id).await? {
            return Err(DbError::not_found("Client", &input.client_id));
        }
        if !EmployeeRepository::exists(&mut *tx, &input.professional_id).await? {
            return Err(DbError::not_found("Employee", &input.professional_id));
        }
        if !SalonServiceRepository::exists(&mut *tx, &input.service_id).await? {
            return Err(DbError::not_found("SalonService", &input.service_id));
        }

        let has_active = SchedulingRepository::has_active(&mut *tx, &input.client_id).await?;
        reject_violations("scheduling.create", check_create(has_active, input.date, today))?;

        let now = Utc::now();
        let scheduling = Scheduling {
            id: generate_id(),
            client_id: input.client_id,
            professional_id: Some(input.professional_id),
            service_id: input.service_id,
            date: input.date,
            time: input.time,
            status: SchedulingStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };

        SchedulingRepository::insert(&mut *tx, &scheduling)
            .await
            .map_err(active_appointment_violation)?;
        tx.commit().await?;

        info!(
            id = %scheduling.id,
            client_id = %scheduling.client_id,
            date = %scheduling.date,
            time = %scheduling.time,
            "Appointment booked"
        );
        Ok(scheduling)
    }

    /// Applies a patch to an appointment that is not yet final.
    ///
    /// The client of an appointment never changes. A supplied date must not
    /// be in the past.
    pub async fn update(&self, id: &str, patch: SchedulingPatch) -> DbResult<Scheduling> {
        let today = (self.today)();
        let mut tx = begin_write(&self.pool).await?;

        let current = SchedulingRepository::fetch(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Scheduling", id))?;

        if let Some(professional_id) = patch.professional_id.as_deref() {
            if !EmployeeRepository::exists(&mut *tx, professional_id).await? {
                return Err(DbError::not_found("Employee", professional_id));
            }
        }
        if let Some(service_id) = patch.service_id.as_deref() {
            if !SalonServiceRepository::exists(&mut *tx, service_id).await? {
                return Err(DbError::not_found("SalonService", service_id));
            }
        }

        reject_violations("scheduling.update", check_update(current.status, &patch, today))?;
        let next = apply_update(&current, patch, today)?;

        let updated = SchedulingRepository::update(&mut *tx, &next)
            .await
            .map_err(active_appointment_violation)?;
        tx.commit().await?;

        info!(
            id = %updated.id,
            from = current.status.as_str(),
            to = updated.status.as_str(),
            "Appointment updated"
        );
        Ok(updated)
    }

    /// Moves a Scheduled or Executing appointment to Canceled.
    ///
    /// The row is kept so it still shows in the agenda.
    pub async fn cancel(&self, id: &str) -> DbResult<Scheduling> {
        let mut tx = begin_write(&self.pool).await?;

        let current = SchedulingRepository::fetch(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Scheduling", id))?;

        reject_violations("scheduling.cancel", check_cancel(current.status))?;
        let canceled = SchedulingRepository::update(&mut *tx, &apply_cancel(&current)?).await?;
        tx.commit().await?;

        info!(id = %canceled.id, from = current.status.as_str(), "Appointment canceled");
        Ok(canceled)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Scheduling>> {
        self.repository().get_by_id(id).await
    }

    /// Agenda: Scheduled and Canceled, by date and time.
    pub async fn list_scheduled_and_canceled(&self) -> DbResult<Vec<Scheduling>> {
        self.repository().list_scheduled_and_canceled().await
    }

    /// Tracking: Completed and Executing, by date and time.
    pub async fn list_completed_and_executing(&self) -> DbResult<Vec<Scheduling>> {
        self.repository().list_completed_and_executing().await
    }

    /// Report: Completed, optionally limited to one date.
    pub async fn list_completed(&self, date: Option<NaiveDate>) -> DbResult<Vec<Scheduling>> {
        self.repository().list_completed(date).await
    }

    pub async fn client_has_active_scheduling(&self, client_id: &str) -> DbResult<bool> {
        self.repository().client_has_active_scheduling(client_id).await
    }

    fn repository(&self) -> SchedulingRepository {
        SchedulingRepository::new(self.pool.clone())
    }
}

/// The only UNIQUE constraint a scheduling write can break is the
/// one-active-appointment index.
fn active_appointment_violation(err: DbError) -> DbError {
    match err {
        DbError::UniqueViolation { .. } => {
            ValidationError::single(Violation::ActiveAppointment).into()
        }
        other => other,
    }
}

// =============================================================================
// Tests
// =============================================================================
