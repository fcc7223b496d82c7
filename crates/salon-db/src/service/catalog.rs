//! # Catalog Service
//!
//! Validated CRUD over the priced services the salon offers.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::repository::{generate_id, SalonServiceRepository};
use crate::service::{begin_write, reject_violations};
use salon_core::validation::validate_service_fields;
use salon_core::{NewSalonService, SalonService, SalonServicePatch};

/// Service catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let corte = db
///     .catalog()
///     .create(NewSalonService {
///         name: "Corte".into(),
///         price: "45,90".parse()?,
///     })
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogService { pool }
    }

    /// Validates and stores a new service.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - blank name and/or non-positive price
    pub async fn create(&self, input: NewSalonService) -> DbResult<SalonService> {
        let name = input.name.trim();
        reject_violations("salon_service", validate_service_fields(name, input.price))?;

        let now = Utc::now();
        let service = SalonService {
            id: generate_id(),
            name: name.to_string(),
            price_cents: input.price.cents(),
            created_at: now,
            updated_at: now,
        };

        let mut tx = begin_write(&self.pool).await?;
        SalonServiceRepository::insert(&mut *tx, &service).await?;
        tx.commit().await?;

        info!(id = %service.id, price = %input.price, "Service created");
        Ok(service)
    }

    /// Applies a patch; unsupplied fields keep their stored values.
    pub async fn update(&self, id: &str, patch: SalonServicePatch) -> DbResult<SalonService> {
        let mut tx = begin_write(&self.pool).await?;

        let current = SalonServiceRepository::fetch(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("SalonService", id))?;

        let name = patch
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or_else(|| current.name.clone());
        let price = patch.price.unwrap_or_else(|| current.price());

        reject_violations("salon_service", validate_service_fields(&name, price))?;

        let updated = SalonServiceRepository::update(
            &mut *tx,
            &SalonService {
                name,
                price_cents: price.cents(),
                ..current
            },
        )
        .await?;
        tx.commit().await?;

        info!(id = %updated.id, "Service updated");
        Ok(updated)
    }

    /// Deletes a service together with every appointment booked for it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;
        SalonServiceRepository::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!(id = %id, "Service deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SalonService>> {
        SalonServiceRepository::new(self.pool.clone()).get_by_id(id).await
    }

    /// The whole catalog, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<SalonService>> {
        SalonServiceRepository::new(self.pool.clone()).list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use salon_core::{Money, Violation};

    #[tokio::test]
    async fn test_create_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();

        let corte = catalog
            .create(NewSalonService {
                name: " Corte ".to_string(),
                price: "45,90".parse().unwrap(),
            })
            .await
            .unwrap();
        assert_eq!(corte.name, "Corte");
        assert_eq!(corte.price_cents, 4590);

        let all = catalog.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].price(), Money::from_cents(4590));
    }

    #[tokio::test]
    async fn test_both_rules_reported() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .catalog()
            .create(NewSalonService {
                name: "   ".to_string(),
                price: Money::zero(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.violations(),
            Some(&[Violation::ServiceNameRequired, Violation::PriceNotPositive][..])
        );
    }

    #[tokio::test]
    async fn test_update_price_only() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();
        let created = catalog
            .create(NewSalonService {
                name: "Escova".to_string(),
                price: Money::from_cents(6000),
            })
            .await
            .unwrap();

        let updated = catalog
            .update(
                &created.id,
                SalonServicePatch {
                    price: Some(Money::from_cents(6500)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Escova");
        assert_eq!(updated.price_cents, 6500);

        let err = catalog
            .update(
                &created.id,
                SalonServicePatch {
                    price: Some(Money::from_cents(-1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.violations(), Some(&[Violation::PriceNotPositive][..]));

        assert!(catalog
            .update("missing", SalonServicePatch::default())
            .await
            .unwrap_err()
            .is_not_found());
    }
}
