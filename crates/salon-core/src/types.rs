//! # Domain Types
//!
//! Core domain types used throughout the salon.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Client      │   │    Employee     │   │  SalonService   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  full_name      │   │  full_name      │   │  name           │       │
//! │  │  email  UNIQUE  │   │  email  UNIQUE  │   │  price_cents    │       │
//! │  │  phone  UNIQUE  │   │  phone  UNIQUE  │   └────────┬────────┘       │
//! │  └────────┬────────┘   │  tax_id UNIQUE  │            │ CASCADE        │
//! │           │ CASCADE    └────────┬────────┘            │                │
//! │           │                     │ SET NULL            │                │
//! │           ▼                     ▼                     ▼                │
//! │  ┌──────────────────────────────────────────────────────────────┐      │
//! │  │  Scheduling                                                  │      │
//! │  │  client_id · professional_id? · service_id · date · time     │      │
//! │  │  status: Scheduled │ Executing │ Completed │ Canceled         │      │
//! │  └──────────────────────────────────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Inputs
//! Every entity has a `New*` input (all fields required) and a `*Patch`
//! input (all fields optional, unset means "keep the current value").
//! `SchedulingPatch` has no `client_id`: the owning client never changes.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Client
// =============================================================================

/// A salon client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Client {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Trimmed full name, at least two words.
    pub full_name: String,

    /// Email on an allow-listed provider.
    pub email: String,

    /// Phone in display form `(DD) DDDDD-DDDD`.
    pub phone: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewClient {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Partial update of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

// =============================================================================
// Employee
// =============================================================================

/// A salon professional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Employee {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub full_name: String,

    pub email: String,

    /// Phone in display form `(DD) DDDDD-DDDD`.
    pub phone: String,

    /// CPF in display form `DDD.DDD.DDD-DD`.
    pub tax_id: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewEmployee {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub tax_id: String,
}

/// Partial update of an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeePatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
}

// =============================================================================
// Salon Service
// =============================================================================

/// A priced service offering (haircut, manicure, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalonService {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Trimmed, non-empty display name.
    pub name: String,

    /// Price in centavos, always > 0.
    pub price_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl SalonService {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for creating a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSalonService {
    pub name: String,
    pub price: Money,
}

/// Partial update of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalonServicePatch {
    pub name: Option<String>,
    pub price: Option<Money>,
}

// =============================================================================
// Scheduling Status
// =============================================================================

/// Lifecycle state of an appointment.
///
/// ```text
///              ┌────────────┐  update   ┌────────────┐
///  create ───► │ Scheduled  │ ◄───────► │ Executing  │
///              └─────┬──────┘           └─────┬──────┘
///                    │ update / cancel        │ update / cancel
///                    ▼                        ▼
///              ┌────────────┐           ┌────────────┐
///              │ Completed  │           │  Canceled  │   (final: no way out)
///              └────────────┘           └────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingStatus {
    /// Booked, not started.
    Scheduled,
    /// Service in progress.
    Executing,
    /// Service delivered.
    Completed,
    /// Called off; the row is kept.
    Canceled,
}

impl Default for SchedulingStatus {
    fn default() -> Self {
        SchedulingStatus::Scheduled
    }
}

impl SchedulingStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [SchedulingStatus; 4] = [
        SchedulingStatus::Scheduled,
        SchedulingStatus::Executing,
        SchedulingStatus::Completed,
        SchedulingStatus::Canceled,
    ];

    /// Completed and Canceled admit no further transition.
    #[inline]
    pub const fn is_final(&self) -> bool {
        matches!(self, SchedulingStatus::Completed | SchedulingStatus::Canceled)
    }

    /// Scheduled and Executing count against the one-per-client limit.
    #[inline]
    pub const fn is_active(&self) -> bool {
        !self.is_final()
    }

    /// Value stored in the `scheduling.status` column.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SchedulingStatus::Scheduled => "scheduled",
            SchedulingStatus::Executing => "executing",
            SchedulingStatus::Completed => "completed",
            SchedulingStatus::Canceled => "canceled",
        }
    }
}

// =============================================================================
// Scheduling
// =============================================================================

/// An appointment of a client for a service, optionally with a professional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Scheduling {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning client; fixed after creation.
    pub client_id: String,

    /// Assigned professional; cleared when the employee is deleted.
    pub professional_id: Option<String>,

    pub service_id: String,

    #[ts(as = "String")]
    pub date: NaiveDate,

    #[ts(as = "String")]
    pub time: NaiveTime,

    pub status: SchedulingStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for booking an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewScheduling {
    pub client_id: String,
    pub professional_id: String,
    pub service_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub time: NaiveTime,
}

/// Partial update of an appointment. The client cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SchedulingPatch {
    pub professional_id: Option<String>,
    pub service_id: Option<String>,
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub time: Option<NaiveTime>,
    pub status: Option<SchedulingStatus>,
}

impl SchedulingPatch {
    /// True when the patch would leave the appointment untouched.
    pub fn is_empty(&self) -> bool {
        self.professional_id.is_none()
            && self.service_id.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.status.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
