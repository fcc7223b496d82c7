//! # Repository Module
//!
//! SQL access for the salon entities.
//!
//! ## Two Kinds of Methods
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Access Paths                              │
//! │                                                                         │
//! │  Reads (pool)                         Writes (transaction)             │
//! │  ────────────                         ────────────────────             │
//! │  repo.get_by_id(id)                   Repo::insert(&mut *tx, ..)       │
//! │  repo.list_all()                      Repo::update(&mut *tx, ..)       │
//! │  repo.list_completed(date)            Repo::email_in_use(&mut *tx, ..) │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  SqlitePool ──► any free conn         the service's open transaction   │
//! │                                                                         │
//! │  Services run check + write on one connection so the check still       │
//! │  holds when the row is written.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ClientRepository`] - Client rows and uniqueness lookups
//! - [`EmployeeRepository`] - Employee rows and uniqueness lookups
//! - [`SalonServiceRepository`] - Service catalog rows
//! - [`SchedulingRepository`] - Appointments and the reporting queries

pub mod client;
pub mod employee;
pub mod salon_service;
pub mod scheduling;

pub use client::ClientRepository;
pub use employee::EmployeeRepository;
pub use salon_service::SalonServiceRepository;
pub use scheduling::SchedulingRepository;

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::error::DbResult;

/// Generates a new entity ID.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Whether `column` of `table` already holds `value` on a row other than
/// `exclude_id`.
///
/// `table` and `column` are always crate constants, never caller input.
pub(crate) async fn value_in_use(
    conn: &mut SqliteConnection,
    table: &'static str,
    column: &'static str,
    value: &str,
    exclude_id: Option<&str>,
) -> DbResult<bool> {
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?1 AND (?2 IS NULL OR id <> ?2)");

    let count: i64 = sqlx::query_scalar(&sql)
        .bind(value)
        .bind(exclude_id)
        .fetch_one(conn)
        .await?;

    Ok(count > 0)
}

/// Whether a row with `id` exists in `table`.
pub(crate) async fn row_exists(
    conn: &mut SqliteConnection,
    table: &'static str,
    id: &str,
) -> DbResult<bool> {
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE id = ?1");

    let count: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(conn).await?;

    Ok(count > 0)
}
