//! # Client Service
//!
//! Validated create/update/delete for clients.
//!
//! ## Rules Applied
//! ```text
//! field rules (salon-core)            uniqueness (this module)
//! ────────────────────────            ────────────────────────
//! name: first + last                  email: not used by another client
//! phone: 11 digits                    phone: not used by another client
//! email: one '@', allowed provider           (only checked when valid)
//! ```
//!
//! All violations are reported together; the row is written only when the
//! list is empty.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::repository::{generate_id, ClientRepository};
use crate::service::{begin_write, person_unique_violation, reject_violations};
use salon_core::validation::{normalized_phone, validate_person_fields};
use salon_core::{Client, ClientPatch, NewClient, UniqueField, Violation};

/// Client registry operations.
///
/// ## Usage
/// ```rust,ignore
/// let clients = db.clients();
///
/// let maria = clients
///     .create(NewClient {
///         full_name: "Maria Silva".into(),
///         email: "maria@gmail.com".into(),
///         phone: "11987654321".into(),
///     })
///     .await?;
/// assert_eq!(maria.phone, "(11) 98765-4321");
/// ```
#[derive(Debug, Clone)]
pub struct ClientService {
    pool: SqlitePool,
}

impl ClientService {
    pub fn new(pool: SqlitePool) -> Self {
        ClientService { pool }
    }

    /// Validates and stores a new client.
    ///
    /// ## Returns
    /// * `Ok(Client)` - stored with trimmed name/email and formatted phone
    /// * `Err(DbError::Validation)` - every field and uniqueness violation
    pub async fn create(&self, input: NewClient) -> DbResult<Client> {
        let mut tx = begin_write(&self.pool).await?;

        let client = checked_client(&mut *tx, None, &input.full_name, &input.email, &input.phone).await?;

        ClientRepository::insert(&mut *tx, &client)
            .await
            .map_err(person_unique_violation)?;
        tx.commit().await?;

        info!(id = %client.id, "Client created");
        Ok(client)
    }

    /// Re-validates a client with the patch applied.
    ///
    /// Fields left as `None` keep their stored values. The client's own email
    /// and phone never count as duplicates.
    pub async fn update(&self, id: &str, patch: ClientPatch) -> DbResult<Client> {
        let mut tx = begin_write(&self.pool).await?;

        let current = ClientRepository::fetch(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", id))?;

        let full_name = patch.full_name.unwrap_or_else(|| current.full_name.clone());
        let email = patch.email.unwrap_or_else(|| current.email.clone());
        let phone = patch.phone.unwrap_or_else(|| current.phone.clone());

        let checked = checked_client(&mut *tx, Some(&current), &full_name, &email, &phone).await?;

        let updated = ClientRepository::update(&mut *tx, &checked)
            .await
            .map_err(person_unique_violation)?;
        tx.commit().await?;

        info!(id = %updated.id, "Client updated");
        Ok(updated)
    }

    /// Deletes a client together with all of their appointments.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;
        ClientRepository::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!(id = %id, "Client deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        ClientRepository::new(self.pool.clone()).get_by_id(id).await
    }

    /// Every client, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Client>> {
        ClientRepository::new(self.pool.clone()).list_all().await
    }
}

/// Runs the field and uniqueness rules and builds the row to store.
///
/// `current` is the stored row on update; a fresh id and timestamps are
/// assigned otherwise.
async fn checked_client(
    conn: &mut SqliteConnection,
    current: Option<&Client>,
    full_name: &str,
    email: &str,
    phone: &str,
) -> DbResult<Client> {
    let full_name = full_name.trim();
    let email = email.trim();
    let exclude_id = current.map(|c| c.id.as_str());

    let mut violations = validate_person_fields(full_name, email, phone, None);
    let phone = normalized_phone(phone);

    if ClientRepository::email_in_use(conn, email, exclude_id).await? {
        violations.push(Violation::Duplicate { field: UniqueField::Email });
    }
    if let Some(phone) = phone.as_deref() {
        if ClientRepository::phone_in_use(conn, phone, exclude_id).await? {
            violations.push(Violation::Duplicate { field: UniqueField::Phone });
        }
    }

    reject_violations("client", violations)?;

    let phone = phone.ok_or_else(|| DbError::Internal("phone passed validation without 11 digits".to_string()))?;
    let now = Utc::now();

    Ok(match current {
        Some(current) => Client {
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone,
            ..current.clone()
        },
        None => Client {
            id: generate_id(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone,
            created_at: now,
            updated_at: now,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn maria() -> NewClient {
        NewClient {
            full_name: "  Maria Silva ".to_string(),
            email: "maria@gmail.com".to_string(),
            phone: "11987654321".to_string(),
        }
    }

    async fn service() -> ClientService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.clients()
    }

    #[tokio::test]
    async fn test_create_normalizes_fields() {
        let clients = service().await;

        let created = clients.create(maria()).await.unwrap();
        assert_eq!(created.full_name, "Maria Silva");
        assert_eq!(created.phone, "(11) 98765-4321");

        let stored = clients.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.phone, "(11) 98765-4321");
        assert_eq!(stored.email, "maria@gmail.com");
    }

    #[tokio::test]
    async fn test_phone_punctuation_does_not_matter() {
        let clients = service().await;

        for (i, raw) in ["(11) 98765-4321", "11 98765 4321", "11.98765.4321"].iter().enumerate() {
            let created = clients
                .create(NewClient {
                    full_name: format!("Pessoa Numero{i}"),
                    email: format!("p{i}@hotmail.com"),
                    phone: raw.to_string(),
                })
                .await;

            if i == 0 {
                assert_eq!(created.unwrap().phone, "(11) 98765-4321");
            } else {
                // same digits as the first one
                let err = created.unwrap_err();
                assert_eq!(
                    err.violations(),
                    Some(&[Violation::Duplicate { field: UniqueField::Phone }][..])
                );
            }
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_and_incomplete_name_reported_together() {
        let clients = service().await;
        clients.create(maria()).await.unwrap();

        let err = clients
            .create(NewClient {
                full_name: "Maria".to_string(),
                email: "MARIA@gmail.com".to_string(),
                phone: "21912345678".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.violations(),
            Some(
                &[
                    Violation::IncompleteName,
                    Violation::Duplicate { field: UniqueField::Email },
                ][..]
            )
        );
        assert_eq!(clients.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_email_rules() {
        let clients = service().await;

        let err = clients
            .create(NewClient {
                email: "user@badhost.xyz".to_string(),
                ..maria()
            })
            .await
            .unwrap_err();
        assert_eq!(
            err.violations(),
            Some(&[Violation::EmailDomainNotAllowed { domain: "badhost".to_string() }][..])
        );

        let err = clients
            .create(NewClient {
                email: "userexample.com".to_string(),
                ..maria()
            })
            .await
            .unwrap_err();
        assert_eq!(err.violations(), Some(&[Violation::InvalidEmailFormat][..]));
    }

    #[tokio::test]
    async fn test_self_update_is_idempotent() {
        let clients = service().await;
        let created = clients.create(maria()).await.unwrap();

        let updated = clients
            .update(
                &created.id,
                ClientPatch {
                    full_name: Some(created.full_name.clone()),
                    email: Some(created.email.clone()),
                    phone: Some(created.phone.clone()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.full_name, created.full_name);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.phone, created.phone);

        // an empty patch is fine too
        let again = clients.update(&created.id, ClientPatch::default()).await.unwrap();
        assert_eq!(again.phone, created.phone);
    }

    #[tokio::test]
    async fn test_update_cannot_take_another_clients_email() {
        let clients = service().await;
        clients.create(maria()).await.unwrap();
        let joao = clients
            .create(NewClient {
                full_name: "Joao Pereira".to_string(),
                email: "joao@outlook.com".to_string(),
                phone: "31988887777".to_string(),
            })
            .await
            .unwrap();

        let err = clients
            .update(
                &joao.id,
                ClientPatch {
                    email: Some("maria@gmail.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.violations(),
            Some(&[Violation::Duplicate { field: UniqueField::Email }][..])
        );

        let stored = clients.get_by_id(&joao.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "joao@outlook.com");
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let clients = service().await;

        let err = clients.update("missing", ClientPatch::default()).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(clients.delete("missing").await.unwrap_err().is_not_found());
        assert!(clients.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("salon.db")).max_connections(5))
            .await
            .unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let clients = db.clients();
                // pairs share an email
                let input = NewClient {
                    full_name: format!("Pessoa Numero{i}"),
                    email: format!("p{}@gmail.com", i / 2),
                    phone: format!("119876543{i:02}"),
                };
                tokio::spawn(async move { clients.create(input).await })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert_eq!(
                    err.violations(),
                    Some(&[Violation::Duplicate { field: UniqueField::Email }][..]),
                    "{err:?}"
                ),
            }
        }

        assert_eq!(created, 4);
        assert_eq!(db.clients().list_all().await.unwrap().len(), 4);
        db.close().await;
    }
}
