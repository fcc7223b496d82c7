//! # Employee Service
//!
//! Validated create/update/delete for employees. Same pipeline as
//! [`ClientService`](crate::service::ClientService) with the CPF added:
//! validated as 11 digits, stored as `DDD.DDD.DDD-DD`, unique among employees.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::repository::{generate_id, EmployeeRepository};
use crate::service::{begin_write, person_unique_violation, reject_violations};
use salon_core::validation::{normalized_phone, normalized_tax_id, validate_person_fields};
use salon_core::{Employee, EmployeePatch, NewEmployee, UniqueField, Violation};

/// Employee registry operations.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    pool: SqlitePool,
}

impl EmployeeService {
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeService { pool }
    }

    /// Validates and stores a new employee.
    pub async fn create(&self, input: NewEmployee) -> DbResult<Employee> {
        let mut tx = begin_write(&self.pool).await?;

        let employee = checked_employee(
            &mut *tx,
            None,
            PersonFields {
                full_name: &input.full_name,
                email: &input.email,
                phone: &input.phone,
                tax_id: &input.tax_id,
            },
        )
        .await?;

        EmployeeRepository::insert(&mut *tx, &employee)
            .await
            .map_err(person_unique_violation)?;
        tx.commit().await?;

        info!(id = %employee.id, "Employee created");
        Ok(employee)
    }

    /// Re-validates an employee with the patch applied.
    pub async fn update(&self, id: &str, patch: EmployeePatch) -> DbResult<Employee> {
        let mut tx = begin_write(&self.pool).await?;

        let current = EmployeeRepository::fetch(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Employee", id))?;

        let full_name = patch.full_name.unwrap_or_else(|| current.full_name.clone());
        let email = patch.email.unwrap_or_else(|| current.email.clone());
        let phone = patch.phone.unwrap_or_else(|| current.phone.clone());
        let tax_id = patch.tax_id.unwrap_or_else(|| current.tax_id.clone());

        let checked = checked_employee(
            &mut *tx,
            Some(&current),
            PersonFields {
                full_name: &full_name,
                email: &email,
                phone: &phone,
                tax_id: &tax_id,
            },
        )
        .await?;

        let updated = EmployeeRepository::update(&mut *tx, &checked)
            .await
            .map_err(person_unique_violation)?;
        tx.commit().await?;

        info!(id = %updated.id, "Employee updated");
        Ok(updated)
    }

    /// Deletes an employee. Appointments they were on stay, unassigned.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;
        EmployeeRepository::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!(id = %id, "Employee deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Employee>> {
        EmployeeRepository::new(self.pool.clone()).get_by_id(id).await
    }

    /// Every employee, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Employee>> {
        EmployeeRepository::new(self.pool.clone()).list_all().await
    }
}

struct PersonFields<'a> {
    full_name: &'a str,
    email: &'a str,
    phone: &'a str,
    tax_id: &'a str,
}

async fn checked_employee(
    conn: &mut SqliteConnection,
    current: Option<&Employee>,
    fields: PersonFields<'_>,
) -> DbResult<Employee> {
    let full_name = fields.full_name.trim();
    let email = fields.email.trim();
    let exclude_id = current.map(|e| e.id.as_str());

    let mut violations = validate_person_fields(full_name, email, fields.phone, Some(fields.tax_id));
    let phone = normalized_phone(fields.phone);
    let tax_id = normalized_tax_id(fields.tax_id);

    if EmployeeRepository::email_in_use(conn, email, exclude_id).await? {
        violations.push(Violation::Duplicate { field: UniqueField::Email });
    }
    if let Some(phone) = phone.as_deref() {
        if EmployeeRepository::phone_in_use(conn, phone, exclude_id).await? {
            violations.push(Violation::Duplicate { field: UniqueField::Phone });
        }
    }
    if let Some(tax_id) = tax_id.as_deref() {
        if EmployeeRepository::tax_id_in_use(conn, tax_id, exclude_id).await? {
            violations.push(Violation::Duplicate { field: UniqueField::TaxId });
        }
    }

    reject_violations("employee", violations)?;

    let (Some(phone), Some(tax_id)) = (phone, tax_id) else {
        return Err(DbError::Internal(
            "phone or CPF passed validation without 11 digits".to_string(),
        ));
    };
    let now = Utc::now();

    Ok(match current {
        Some(current) => Employee {
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone,
            tax_id,
            ..current.clone()
        },
        None => Employee {
            id: generate_id(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone,
            tax_id,
            created_at: now,
            updated_at: now,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn joana() -> NewEmployee {
        NewEmployee {
            full_name: "Joana Prado".to_string(),
            email: "joana@outlook.com".to_string(),
            phone: "(21) 99876-5432".to_string(),
            tax_id: "12345678909".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_formats_tax_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let created = db.employees().create(joana()).await.unwrap();
        assert_eq!(created.tax_id, "123.456.789-09");
        assert_eq!(created.phone, "(21) 99876-5432");
    }

    #[tokio::test]
    async fn test_all_field_violations_in_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .employees()
            .create(NewEmployee {
                full_name: "Joana".to_string(),
                email: "joana@yahoo.com".to_string(),
                phone: "9999".to_string(),
                tax_id: "123".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.violations(),
            Some(
                &[
                    Violation::IncompleteName,
                    Violation::PhoneDigits,
                    Violation::TaxIdDigits,
                    Violation::EmailDomainNotAllowed { domain: "yahoo".to_string() },
                ][..]
            )
        );
    }

    #[tokio::test]
    async fn test_duplicates_reported_per_field() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let employees = db.employees();
        employees.create(joana()).await.unwrap();

        let err = employees
            .create(NewEmployee {
                full_name: "Outra Pessoa".to_string(),
                email: "JOANA@outlook.com".to_string(),
                phone: "21998765432".to_string(),
                tax_id: "123.456.789-09".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.violations(),
            Some(
                &[
                    Violation::Duplicate { field: UniqueField::Email },
                    Violation::Duplicate { field: UniqueField::Phone },
                    Violation::Duplicate { field: UniqueField::TaxId },
                ][..]
            )
        );
    }

    #[tokio::test]
    async fn test_clients_and_employees_do_not_share_uniqueness() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.clients()
            .create(salon_core::NewClient {
                full_name: "Joana Prado".to_string(),
                email: "joana@outlook.com".to_string(),
                phone: "21998765432".to_string(),
            })
            .await
            .unwrap();

        assert!(db.employees().create(joana()).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_keeps_unpatched_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let employees = db.employees();
        let created = employees.create(joana()).await.unwrap();

        let updated = employees
            .update(
                &created.id,
                EmployeePatch {
                    phone: Some("21 91111 2222".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.phone, "(21) 91111-2222");
        assert_eq!(updated.tax_id, created.tax_id);
        assert_eq!(updated.email, created.email);
    }
}
