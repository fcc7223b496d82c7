//! # Scheduling Repository
//!
//! Database operations for appointments, plus the reporting queries.
//!
//! ## Reporting Views
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Query                          Statuses                 Order          │
//! │  ─────────────────────────────  ───────────────────────  ───────────── │
//! │  list_scheduled_and_canceled    scheduled, canceled      date, time    │
//! │  list_completed_and_executing   completed, executing     date, time    │
//! │  list_completed(Some(day))      completed on `day`       date, time    │
//! │  list_completed(None)           completed                date, time    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Active Appointment Per Client
//! The partial unique index `uq_scheduling_active_client` rejects a second
//! row with `status NOT IN ('completed', 'canceled')` for the same client.
//! Writes that trip it surface as [`DbError::UniqueViolation`].

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use salon_core::Scheduling;

/// Repository for appointment database operations.
#[derive(Debug, Clone)]
pub struct SchedulingRepository {
    pool: SqlitePool,
}

impl SchedulingRepository {
    /// Creates a new SchedulingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SchedulingRepository { pool }
    }

    /// Gets an appointment by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Scheduling>> {
        let scheduling = sqlx::query_as::<_, Scheduling>(
            r#"
            SELECT id, client_id, professional_id, service_id, date, time, status,
                   created_at, updated_at
            FROM scheduling
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(scheduling)
    }

    /// Agenda view: booked and called-off appointments.
    pub async fn list_scheduled_and_canceled(&self) -> DbResult<Vec<Scheduling>> {
        let schedulings = sqlx::query_as::<_, Scheduling>(
            r#"
            SELECT id, client_id, professional_id, service_id, date, time, status,
                   created_at, updated_at
            FROM scheduling
            WHERE status IN ('scheduled', 'canceled')
            ORDER BY date, time
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = schedulings.len(), "Listed scheduled and canceled appointments");
        Ok(schedulings)
    }

    /// Tracking view: appointments in progress or done.
    pub async fn list_completed_and_executing(&self) -> DbResult<Vec<Scheduling>> {
        let schedulings = sqlx::query_as::<_, Scheduling>(
            r#"
            SELECT id, client_id, professional_id, service_id, date, time, status,
                   created_at, updated_at
            FROM scheduling
            WHERE status IN ('completed', 'executing')
            ORDER BY date, time
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = schedulings.len(), "Listed completed and executing appointments");
        Ok(schedulings)
    }

    /// Report view: completed appointments, optionally on one date only.
    pub async fn list_completed(&self, date: Option<NaiveDate>) -> DbResult<Vec<Scheduling>> {
        let schedulings = sqlx::query_as::<_, Scheduling>(
            r#"
            SELECT id, client_id, professional_id, service_id, date, time, status,
                   created_at, updated_at
            FROM scheduling
            WHERE status = 'completed'
              AND (?1 IS NULL OR date = ?1)
            ORDER BY date, time
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = schedulings.len(), date = ?date, "Listed completed appointments");
        Ok(schedulings)
    }

    /// Whether the client currently holds a Scheduled or Executing appointment.
    pub async fn client_has_active_scheduling(&self, client_id: &str) -> DbResult<bool> {
        Ok(self.count_active_for_client(client_id).await? > 0)
    }

    /// Number of Scheduled or Executing appointments of a client.
    ///
    /// Never more than one while the index is in place.
    pub async fn count_active_for_client(&self, client_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM scheduling
            WHERE client_id = ?1
              AND status NOT IN ('completed', 'canceled')
            "#,
        )
        .bind(client_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Counts appointments (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scheduling")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped operations
    // -------------------------------------------------------------------------

    pub(crate) async fn fetch(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Scheduling>> {
        let scheduling = sqlx::query_as::<_, Scheduling>(
            r#"
            SELECT id, client_id, professional_id, service_id, date, time, status,
                   created_at, updated_at
            FROM scheduling
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(scheduling)
    }

    /// Active-appointment check on the caller's transaction.
    pub(crate) async fn has_active(conn: &mut SqliteConnection, client_id: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM scheduling
            WHERE client_id = ?1
              AND status NOT IN ('completed', 'canceled')
            "#,
        )
        .bind(client_id)
        .fetch_one(conn)
        .await?;

        Ok(count > 0)
    }

    /// Inserts a new appointment.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the client already has an active one
    pub(crate) async fn insert(conn: &mut SqliteConnection, scheduling: &Scheduling) -> DbResult<()> {
        debug!(
            id = %scheduling.id,
            client_id = %scheduling.client_id,
            date = %scheduling.date,
            "Inserting scheduling"
        );

        sqlx::query(
            r#"
            INSERT INTO scheduling (
                id, client_id, professional_id, service_id, date, time, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&scheduling.id)
        .bind(&scheduling.client_id)
        .bind(&scheduling.professional_id)
        .bind(&scheduling.service_id)
        .bind(scheduling.date)
        .bind(scheduling.time)
        .bind(scheduling.status)
        .bind(scheduling.created_at)
        .bind(scheduling.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Writes every mutable column and stamps `updated_at`.
    ///
    /// `client_id` is never rewritten.
    pub(crate) async fn update(
        conn: &mut SqliteConnection,
        scheduling: &Scheduling,
    ) -> DbResult<Scheduling> {
        debug!(id = %scheduling.id, status = %scheduling.status.as_str(), "Updating scheduling");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE scheduling SET
                professional_id = ?2,
                service_id = ?3,
                date = ?4,
                time = ?5,
                status = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&scheduling.id)
        .bind(&scheduling.professional_id)
        .bind(&scheduling.service_id)
        .bind(scheduling.date)
        .bind(scheduling.time)
        .bind(scheduling.status)
        .bind(now)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Scheduling", &scheduling.id));
        }

        Ok(Scheduling {
            updated_at: now,
            ..scheduling.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::{generate_id, ClientRepository, SalonServiceRepository};
    use chrono::NaiveTime;
    use salon_core::{Client, SalonService, SchedulingStatus};

    struct Fixture {
        db: Database,
        client_id: String,
        service_id: String,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let client = Client {
            id: generate_id(),
            full_name: "Maria Silva".to_string(),
            email: "maria@gmail.com".to_string(),
            phone: "(11) 98765-4321".to_string(),
            created_at: now,
            updated_at: now,
        };
        let service = SalonService {
            id: generate_id(),
            name: "Corte".to_string(),
            price_cents: 4590,
            created_at: now,
            updated_at: now,
        };

        let mut conn = db.pool().acquire().await.unwrap();
        ClientRepository::insert(&mut conn, &client).await.unwrap();
        SalonServiceRepository::insert(&mut conn, &service).await.unwrap();
        drop(conn);

        Fixture {
            db,
            client_id: client.id,
            service_id: service.id,
        }
    }

    fn appointment(f: &Fixture, day: u32, hour: u32, status: SchedulingStatus) -> Scheduling {
        let now = Utc::now();
        Scheduling {
            id: generate_id(),
            client_id: f.client_id.clone(),
            professional_id: None,
            service_id: f.service_id.clone(),
            date: NaiveDate::from_ymd_opt(2026, 5, day).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_reporting_queries_filter_and_order() {
        let f = fixture().await;
        {
            let mut conn = f.db.pool().acquire().await.unwrap();
            for s in [
                appointment(&f, 12, 9, SchedulingStatus::Canceled),
                appointment(&f, 10, 15, SchedulingStatus::Completed),
                appointment(&f, 10, 9, SchedulingStatus::Completed),
                appointment(&f, 11, 10, SchedulingStatus::Scheduled),
            ] {
                SchedulingRepository::insert(&mut conn, &s).await.unwrap();
            }
        }

        let repo = SchedulingRepository::new(f.db.pool().clone());

        let agenda = repo.list_scheduled_and_canceled().await.unwrap();
        let statuses: Vec<_> = agenda.iter().map(|s| s.status).collect();
        assert_eq!(statuses, vec![SchedulingStatus::Scheduled, SchedulingStatus::Canceled]);

        let tracking = repo.list_completed_and_executing().await.unwrap();
        assert_eq!(tracking.len(), 2);
        assert!(tracking[0].time < tracking[1].time);

        let day10 = NaiveDate::from_ymd_opt(2026, 5, 10);
        assert_eq!(repo.list_completed(day10).await.unwrap().len(), 2);
        assert!(repo
            .list_completed(NaiveDate::from_ymd_opt(2026, 5, 11))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(repo.list_completed(None).await.unwrap().len(), 2);

        assert!(repo.client_has_active_scheduling(&f.client_id).await.unwrap());
        assert_eq!(repo.count_active_for_client(&f.client_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_partial_index_blocks_second_active_row() {
        let f = fixture().await;
        let mut conn = f.db.pool().acquire().await.unwrap();

        SchedulingRepository::insert(&mut conn, &appointment(&f, 10, 9, SchedulingStatus::Scheduled))
            .await
            .unwrap();
        // final rows do not count
        SchedulingRepository::insert(&mut conn, &appointment(&f, 10, 10, SchedulingStatus::Canceled))
            .await
            .unwrap();

        let err = SchedulingRepository::insert(
            &mut conn,
            &appointment(&f, 11, 9, SchedulingStatus::Executing),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_round_trip_keeps_date_time_and_status() {
        let f = fixture().await;
        let original = appointment(&f, 20, 14, SchedulingStatus::Executing);
        {
            let mut conn = f.db.pool().acquire().await.unwrap();
            SchedulingRepository::insert(&mut conn, &original).await.unwrap();
        }

        let stored = SchedulingRepository::new(f.db.pool().clone())
            .get_by_id(&original.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.date, original.date);
        assert_eq!(stored.time, original.time);
        assert_eq!(stored.status, SchedulingStatus::Executing);
        assert_eq!(stored.professional_id, None);
    }
}
