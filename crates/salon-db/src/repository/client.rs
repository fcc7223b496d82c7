//! # Client Repository
//!
//! Database operations for clients.
//!
//! Email is compared case-insensitively (`COLLATE NOCASE` on the column);
//! phone is compared on its stored `(DD) DDDDD-DDDD` form.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{row_exists, value_in_use};
use salon_core::Client;

/// Repository for client database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ClientRepository::new(pool);
///
/// let everyone = repo.list_all().await?;
/// let maria = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Gets a client by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Client))` - Client found
    /// * `Ok(None)` - Client not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, full_name, email, phone, created_at, updated_at
            FROM client
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Lists every client ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, full_name, email, phone, created_at, updated_at
            FROM client
            ORDER BY full_name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = clients.len(), "Listed clients");
        Ok(clients)
    }

    /// Counts clients (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM client")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped operations
    // -------------------------------------------------------------------------

    /// Loads a client on the caller's connection.
    pub(crate) async fn fetch(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, full_name, email, phone, created_at, updated_at
            FROM client
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(client)
    }

    pub(crate) async fn exists(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
        row_exists(conn, "client", id).await
    }

    /// Whether another client already uses `email` (case-insensitive).
    pub(crate) async fn email_in_use(
        conn: &mut SqliteConnection,
        email: &str,
        exclude_id: Option<&str>,
    ) -> DbResult<bool> {
        value_in_use(conn, "client", "email", email, exclude_id).await
    }

    /// Whether another client already uses the normalized `phone`.
    pub(crate) async fn phone_in_use(
        conn: &mut SqliteConnection,
        phone: &str,
        exclude_id: Option<&str>,
    ) -> DbResult<bool> {
        value_in_use(conn, "client", "phone", phone, exclude_id).await
    }

    /// Inserts a new client.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - email or phone already stored
    pub(crate) async fn insert(conn: &mut SqliteConnection, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, email = %client.email, "Inserting client");

        sqlx::query(
            r#"
            INSERT INTO client (id, full_name, email, phone, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&client.id)
        .bind(&client.full_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Overwrites a client's fields and stamps `updated_at`.
    ///
    /// Returns the stored row.
    pub(crate) async fn update(conn: &mut SqliteConnection, client: &Client) -> DbResult<Client> {
        debug!(id = %client.id, "Updating client");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE client SET
                full_name = ?2,
                email = ?3,
                phone = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&client.id)
        .bind(&client.full_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(now)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", &client.id));
        }

        Ok(Client {
            updated_at: now,
            ..client.clone()
        })
    }

    /// Deletes a client. Its appointments go with it (`ON DELETE CASCADE`).
    pub(crate) async fn delete(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting client");

        let result = sqlx::query("DELETE FROM client WHERE id = ?1")
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::generate_id;

    fn client(name: &str, email: &str, phone: &str) -> Client {
        let now = Utc::now();
        Client {
            id: generate_id(),
            full_name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let zoe = client("Zoe Lima", "zoe@gmail.com", "(11) 90000-0001");
        let ana = client("Ana Souza", "ana@gmail.com", "(11) 90000-0002");
        {
            let mut conn = db.pool().acquire().await.unwrap();
            ClientRepository::insert(&mut conn, &zoe).await.unwrap();
            ClientRepository::insert(&mut conn, &ana).await.unwrap();
        }

        let repo = ClientRepository::new(db.pool().clone());
        let names: Vec<_> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.full_name)
            .collect();
        assert_eq!(names, vec!["Ana Souza", "Zoe Lima"]);

        let found = repo.get_by_id(&ana.id).await.unwrap().unwrap();
        assert_eq!(found.email, "ana@gmail.com");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_email_lookup_ignores_case_and_excluded_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let maria = client("Maria Silva", "Maria@Gmail.com", "(11) 98765-4321");

        let mut conn = db.pool().acquire().await.unwrap();
        ClientRepository::insert(&mut conn, &maria).await.unwrap();

        assert!(ClientRepository::email_in_use(&mut conn, "maria@gmail.com", None)
            .await
            .unwrap());
        assert!(!ClientRepository::email_in_use(&mut conn, "maria@gmail.com", Some(&maria.id))
            .await
            .unwrap());
        assert!(ClientRepository::phone_in_use(&mut conn, "(11) 98765-4321", None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unique_column_backstop() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        ClientRepository::insert(&mut conn, &client("Ana Souza", "ana@gmail.com", "(11) 90000-0001"))
            .await
            .unwrap();
        let err = ClientRepository::insert(&mut conn, &client("Ana Lima", "ANA@gmail.com", "(11) 90000-0002"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        let ghost = client("Ghost Person", "ghost@gmail.com", "(11) 90000-0009");

        assert!(ClientRepository::update(&mut conn, &ghost).await.unwrap_err().is_not_found());
        assert!(ClientRepository::delete(&mut conn, &ghost.id).await.unwrap_err().is_not_found());
    }
}
