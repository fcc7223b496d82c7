//! # Employee Repository
//!
//! Database operations for employees (the professionals on appointments).
//!
//! Deleting an employee keeps their appointments: `scheduling.professional_id`
//! is set to NULL by the foreign key.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{row_exists, value_in_use};
use salon_core::Employee;

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Gets an employee by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, full_name, email, phone, tax_id, created_at, updated_at
            FROM employee
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Lists every employee ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, full_name, email, phone, tax_id, created_at, updated_at
            FROM employee
            ORDER BY full_name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped operations
    // -------------------------------------------------------------------------

    pub(crate) async fn fetch(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, full_name, email, phone, tax_id, created_at, updated_at
            FROM employee
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(employee)
    }

    pub(crate) async fn exists(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
        row_exists(conn, "employee", id).await
    }

    pub(crate) async fn email_in_use(
        conn: &mut SqliteConnection,
        email: &str,
        exclude_id: Option<&str>,
    ) -> DbResult<bool> {
        value_in_use(conn, "employee", "email", email, exclude_id).await
    }

    pub(crate) async fn phone_in_use(
        conn: &mut SqliteConnection,
        phone: &str,
        exclude_id: Option<&str>,
    ) -> DbResult<bool> {
        value_in_use(conn, "employee", "phone", phone, exclude_id).await
    }

    /// Whether another employee already uses the normalized CPF.
    pub(crate) async fn tax_id_in_use(
        conn: &mut SqliteConnection,
        tax_id: &str,
        exclude_id: Option<&str>,
    ) -> DbResult<bool> {
        value_in_use(conn, "employee", "tax_id", tax_id, exclude_id).await
    }

    pub(crate) async fn insert(conn: &mut SqliteConnection, employee: &Employee) -> DbResult<()> {
        debug!(id = %employee.id, email = %employee.email, "Inserting employee");

        sqlx::query(
            r#"
            INSERT INTO employee (id, full_name, email, phone, tax_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(&employee.tax_id)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub(crate) async fn update(
        conn: &mut SqliteConnection,
        employee: &Employee,
    ) -> DbResult<Employee> {
        debug!(id = %employee.id, "Updating employee");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE employee SET
                full_name = ?2,
                email = ?3,
                phone = ?4,
                tax_id = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(&employee.tax_id)
        .bind(now)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", &employee.id));
        }

        Ok(Employee {
            updated_at: now,
            ..employee.clone()
        })
    }

    /// Deletes an employee. Their appointments stay, with no professional.
    pub(crate) async fn delete(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting employee");

        let result = sqlx::query("DELETE FROM employee WHERE id = ?1")
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::generate_id;

    #[tokio::test]
    async fn test_tax_id_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let joana = Employee {
            id: generate_id(),
            full_name: "Joana Prado".to_string(),
            email: "joana@outlook.com".to_string(),
            phone: "(21) 99876-5432".to_string(),
            tax_id: "123.456.789-09".to_string(),
            created_at: now,
            updated_at: now,
        };

        {
            let mut conn = db.pool().acquire().await.unwrap();
            EmployeeRepository::insert(&mut conn, &joana).await.unwrap();

            assert!(EmployeeRepository::tax_id_in_use(&mut conn, "123.456.789-09", None)
                .await
                .unwrap());
            assert!(!EmployeeRepository::tax_id_in_use(&mut conn, "123.456.789-09", Some(&joana.id))
                .await
                .unwrap());
            assert!(EmployeeRepository::exists(&mut conn, &joana.id).await.unwrap());
        }

        let repo = EmployeeRepository::new(db.pool().clone());
        let stored = repo.get_by_id(&joana.id).await.unwrap().unwrap();
        assert_eq!(stored.tax_id, joana.tax_id);
        assert_eq!(stored.full_name, "Joana Prado");
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
