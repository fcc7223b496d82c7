//! # Commands
//!
//! Parsing and execution of the salon-admin subcommands.
//!
//! ```text
//! salon-admin migrate                     apply pending migrations
//! salon-admin status                      health + record counts
//! salon-admin clients | employees | services
//! salon-admin agenda                      scheduled + canceled
//! salon-admin tracking                    completed + executing
//! salon-admin report [YYYY-MM-DD]         completed, optional date
//! salon-admin add-service <name> <price>  e.g. add-service "Corte" 45,90
//! salon-admin cancel <scheduling-id>
//! ```

use chrono::NaiveDate;
use serde_json::{json, Value};
use tracing::debug;

use salon_core::{Money, NewSalonService};
use salon_db::{ClientRepository, Database, EmployeeRepository, SalonServiceRepository, SchedulingRepository};

use crate::error::{AdminError, ErrorCode};

pub const USAGE: &str = "usage: salon-admin <migrate|status|clients|employees|services|agenda|tracking|report [YYYY-MM-DD]|add-service <name> <price>|cancel <id>>";

/// One parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Migrate,
    Status,
    Clients,
    Employees,
    Services,
    Agenda,
    Tracking,
    Report { date: Option<NaiveDate> },
    AddService { name: String, price: Money },
    Cancel { id: String },
}

impl Command {
    /// Parses the arguments after the program name.
    pub fn parse(args: &[String]) -> Result<Command, AdminError> {
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| AdminError::usage(USAGE))?;

        let command = match (name.as_str(), rest) {
            ("migrate", []) => Command::Migrate,
            ("status", []) => Command::Status,
            ("clients", []) => Command::Clients,
            ("employees", []) => Command::Employees,
            ("services", []) => Command::Services,
            ("agenda", []) => Command::Agenda,
            ("tracking", []) => Command::Tracking,
            ("report", []) => Command::Report { date: None },
            ("report", [date]) => Command::Report {
                date: Some(
                    NaiveDate::parse_from_str(date, "%Y-%m-%d")
                        .map_err(|_| AdminError::usage(format!("invalid date '{date}', expected YYYY-MM-DD")))?,
                ),
            },
            ("add-service", [name, price]) => Command::AddService {
                name: name.clone(),
                price: price.parse()?,
            },
            ("cancel", [id]) => Command::Cancel { id: id.clone() },
            _ => return Err(AdminError::usage(USAGE)),
        };

        Ok(command)
    }

    /// Runs the command, returning what to print.
    pub async fn run(self, db: &Database) -> Result<Value, AdminError> {
        debug!(command = ?self, "Running command");

        let output = match self {
            Command::Migrate => {
                db.run_migrations().await?;
                let (total, applied) = db.migration_status().await?;
                json!({ "migrations": total, "applied": applied })
            }
            Command::Status => status(db).await?,
            Command::Clients => json!(db.clients().list_all().await?),
            Command::Employees => json!(db.employees().list_all().await?),
            Command::Services => {
                let services = db.catalog().list_all().await?;
                let rows: Vec<Value> = services
                    .iter()
                    .map(|s| json!({ "id": s.id, "name": s.name, "price": s.price().to_string() }))
                    .collect();
                Value::Array(rows)
            }
            Command::Agenda => json!(db.schedulings().list_scheduled_and_canceled().await?),
            Command::Tracking => json!(db.schedulings().list_completed_and_executing().await?),
            Command::Report { date } => report(db, date).await?,
            Command::AddService { name, price } => {
                json!(db.catalog().create(NewSalonService { name, price }).await?)
            }
            Command::Cancel { id } => json!(db.schedulings().cancel(&id).await?),
        };

        Ok(output)
    }
}

async fn status(db: &Database) -> Result<Value, AdminError> {
    let pool = db.pool().clone();
    let (total, applied) = db.migration_status().await?;

    Ok(json!({
        "healthy": db.health_check().await,
        "migrations": { "total": total, "applied": applied },
        "clients": ClientRepository::new(pool.clone()).count().await?,
        "employees": EmployeeRepository::new(pool.clone()).count().await?,
        "services": SalonServiceRepository::new(pool.clone()).count().await?,
        "schedulings": SchedulingRepository::new(pool).count().await?,
    }))
}

/// Completed appointments with the revenue they add up to.
///
/// Appointments whose service no longer exists are gone with it (cascade),
/// so every row has a price. A total beyond the `Money` range is an error.
async fn report(db: &Database, date: Option<NaiveDate>) -> Result<Value, AdminError> {
    let completed = db.schedulings().list_completed(date).await?;
    let catalog = db.catalog().list_all().await?;

    let total = completed
        .iter()
        .filter_map(|s| catalog.iter().find(|svc| svc.id == s.service_id))
        .try_fold(Money::zero(), |acc, svc| acc.checked_add(svc.price()))
        .ok_or_else(|| AdminError::new(ErrorCode::Internal, "revenue total overflows"))?;

    Ok(json!({
        "date": date,
        "count": completed.len(),
        "total": total.to_string(),
        "appointments": completed,
    }))
}
