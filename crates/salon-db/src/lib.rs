//! # salon-db: Database Layer for the Salon
//!
//! SQLite storage for clients, employees, services and appointments, and the
//! transactional operations that enforce the salon's rules against it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Salon Data Flow                                 │
//! │                                                                         │
//! │  salon-admin (or any HTTP layer)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     salon-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Services    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │               │    │               │    │  (embedded)  │  │   │
//! │  │   │ ClientService │───►│ ClientRepo    │    │              │  │   │
//! │  │   │ EmployeeSvc   │    │ EmployeeRepo  │    │ 001_initial  │  │   │
//! │  │   │ CatalogSvc    │    │ SalonSvcRepo  │    │   _schema    │  │   │
//! │  │   │ SchedulingSvc │    │ SchedulingRepo│    │              │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │ rules                                             │   │
//! │  │           ▼                                                   │   │
//! │  │       salon-core (validation, scheduling state machine)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL, foreign keys on)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - SQL per entity
//! - [`service`] - Validated, transactional operations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use salon_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("salon.db")).await?;
//!
//! let maria = db.clients().create(new_client).await?;
//! let booked = db.schedulings().create(new_scheduling).await?;
//! let report = db.schedulings().list_completed(None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::{
    ClientRepository, EmployeeRepository, SalonServiceRepository, SchedulingRepository,
};
pub use service::{CatalogService, ClientService, EmployeeService, SchedulingService};
