//! # Salon Service Repository
//!
//! Database operations for the service catalog.
//!
//! Prices are stored as integer cents (`price_cents INTEGER CHECK > 0`).

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::row_exists;
use salon_core::SalonService;

/// Repository for service catalog operations.
#[derive(Debug, Clone)]
pub struct SalonServiceRepository {
    pool: SqlitePool,
}

impl SalonServiceRepository {
    /// Creates a new SalonServiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalonServiceRepository { pool }
    }

    /// Gets a service by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SalonService>> {
        let service = sqlx::query_as::<_, SalonService>(
            r#"
            SELECT id, name, price_cents, created_at, updated_at
            FROM salon_service
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    /// Lists the catalog ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<SalonService>> {
        let services = sqlx::query_as::<_, SalonService>(
            r#"
            SELECT id, name, price_cents, created_at, updated_at
            FROM salon_service
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM salon_service")
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
    ) -> DbResult<Option<SalonService>> {
        let service = sqlx::query_as::<_, SalonService>(
            r#"
            SELECT id, name, price_cents, created_at, updated_at
            FROM salon_service
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(service)
    }

    pub(crate) async fn exists(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
        row_exists(conn, "salon_service", id).await
    }

    pub(crate) async fn insert(conn: &mut SqliteConnection, service: &SalonService) -> DbResult<()> {
        debug!(id = %service.id, name = %service.name, price_cents = service.price_cents, "Inserting service");

        sqlx::query(
            r#"
            INSERT INTO salon_service (id, name, price_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(service.price_cents)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub(crate) async fn update(
        conn: &mut SqliteConnection,
        service: &SalonService,
    ) -> DbResult<SalonService> {
        debug!(id = %service.id, "Updating service");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE salon_service SET
                name = ?2,
                price_cents = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(service.price_cents)
        .bind(now)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SalonService", &service.id));
        }

        Ok(SalonService {
            updated_at: now,
            ..service.clone()
        })
    }

    /// Deletes a service and, by cascade, every appointment for it.
    pub(crate) async fn delete(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting service");

        let result = sqlx::query("DELETE FROM salon_service WHERE id = ?1")
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SalonService", id));
        }

        Ok(())
    }
}
