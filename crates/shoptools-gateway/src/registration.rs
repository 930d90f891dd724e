//! # Registration Saga
//!
//! Sign-up writes three records that have to exist together:
//!
//! ```text
//!   1. credential  (email + argon2 hash)        ── EmailInUse on duplicate
//!   2. company     (company_<identity id>)
//!   3. identity    (role master, company id)
//!
//!   failure at step N  ──►  undo steps N-1 .. 1, newest first
//! ```
//!
//! Undo failures are logged and do not replace the original error.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shoptools_core::validation::{validate_password, validate_registration};
use shoptools_core::{company_id_for, Company, Identity, Role};
use shoptools_db::{CredentialRecord, Database, DbError};

use crate::auth::hash_password;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Registration;

/// A step whose effect is undone on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Credential,
    Company,
}

pub struct RegistrationSaga<'a> {
    db: &'a Database,
    identity_id: String,
    completed: Vec<Step>,
}

impl<'a> RegistrationSaga<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self::with_identity_id(db, Uuid::new_v4().to_string())
    }

    /// Uses a fixed identity id instead of a fresh one.
    pub fn with_identity_id(db: &'a Database, identity_id: impl Into<String>) -> Self {
        RegistrationSaga {
            db,
            identity_id: identity_id.into(),
            completed: Vec::new(),
        }
    }

    /// Steps that have completed and not been undone.
    pub fn completed(&self) -> &[Step] {
        &self.completed
    }

    /// Runs every step, undoing completed ones if a later step fails.
    ///
    /// ## Errors
    /// * `WeakPassword` - password below the minimum length
    /// * `Validation` - any other invalid field
    /// * `EmailInUse` - a credential already has this email
    pub async fn run(&mut self, registration: &Registration) -> GatewayResult<Identity> {
        if validate_password(&registration.password).is_err() {
            return Err(GatewayError::WeakPassword);
        }
        validate_registration(
            &registration.email,
            &registration.password,
            &registration.name,
            &registration.phone,
            &registration.company_name,
        )?;

        // Credentials match case-insensitively; the profile keeps the address as typed.
        let email = registration.email.trim().to_string();
        let now = Utc::now();

        // Step 1: credential
        let password_hash = hash_password(&registration.password)?;
        let credential = CredentialRecord {
            identity_id: self.identity_id.clone(),
            email: email.to_lowercase(),
            password_hash,
            created_at: now,
        };
        self.db
            .credentials()
            .insert(&credential)
            .await
            .map_err(|e| match e {
                DbError::UniqueViolation { ref field, .. } if field == "email" => {
                    GatewayError::EmailInUse
                }
                other => GatewayError::from(other),
            })?;
        self.completed.push(Step::Credential);
        debug!(identity_id = %self.identity_id, "Registration: credential created");

        // Step 2: company
        let company = Company {
            id: company_id_for(&self.identity_id),
            name: registration.company_name.trim().to_string(),
            master_id: self.identity_id.clone(),
            created_at: now,
            updated_at: now,
        };
        if let Err(e) = self.db.companies().insert(&company).await {
            self.compensate().await;
            return Err(e.into());
        }
        self.completed.push(Step::Company);
        debug!(company_id = %company.id, "Registration: company created");

        // Step 3: identity
        let identity = Identity {
            id: self.identity_id.clone(),
            name: registration.name.trim().to_string(),
            email,
            role: Role::Master,
            company_id: company.id.clone(),
            phone: registration.phone.trim().to_string(),
            avatar: None,
            website: None,
            wechat: None,
            facebook: None,
            instagram: None,
            youtube: None,
            created_at: now,
            updated_at: now,
        };
        if let Err(e) = self.db.identities().insert(&identity).await {
            self.compensate().await;
            return Err(e.into());
        }

        info!(identity_id = %identity.id, company_id = %identity.company_id, "Registered new company");
        Ok(identity)
    }

    async fn compensate(&mut self) {
        while let Some(step) = self.completed.pop() {
            let result = match step {
                Step::Company => self
                    .db
                    .companies()
                    .delete(&company_id_for(&self.identity_id))
                    .await,
                Step::Credential => self.db.credentials().delete(&self.identity_id).await,
            };

            match result {
                Ok(_) => debug!(?step, identity_id = %self.identity_id, "Registration step undone"),
                Err(e) => warn!(
                    ?step,
                    identity_id = %self.identity_id,
                    error = %e,
                    "Failed to undo registration step"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoptools_db::DbConfig;

    fn registration(email: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: "secret-pass".to_string(),
            name: "Mina Park".to_string(),
            phone: "+82 10 1234 5678".to_string(),
            company_name: "Park Trading".to_string(),
        }
    }

    async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_registers_all_three_records() {
        let db = database().await;
        let mut saga = RegistrationSaga::new(&db);

        let identity = saga.run(&registration("Mina@Example.com")).await.unwrap();
        assert_eq!(identity.role, Role::Master);
        assert_eq!(identity.email, "Mina@Example.com");
        assert_eq!(identity.company_id, company_id_for(&identity.id));
        assert_eq!(saga.completed(), &[Step::Credential, Step::Company]);

        let company = db.companies().get_by_id(&identity.company_id).await.unwrap().unwrap();
        assert_eq!(company.master_id, identity.id);
        assert_eq!(company.name, "Park Trading");
        assert!(db.credentials().get_by_email("mina@example.com").await.unwrap().is_some());
        assert_eq!(db.identities().get_by_id(&identity.id).await.unwrap(), Some(identity));
    }

    #[tokio::test]
    async fn test_weak_password_and_duplicate_email() {
        let db = database().await;

        let mut weak = registration("a@example.com");
        weak.password = "12345".to_string();
        assert!(matches!(
            RegistrationSaga::new(&db).run(&weak).await,
            Err(GatewayError::WeakPassword)
        ));

        RegistrationSaga::new(&db)
            .run(&registration("a@example.com"))
            .await
            .unwrap();
        assert!(matches!(
            RegistrationSaga::new(&db).run(&registration("A@example.com")).await,
            Err(GatewayError::EmailInUse)
        ));
    }

    #[tokio::test]
    async fn test_identity_failure_undoes_company_and_credential() {
        let db = database().await;

        // An identity row without a credential occupies the id, so step 3
        // hits a primary key conflict after steps 1 and 2 succeed.
        let now = Utc::now();
        db.companies()
            .insert(&Company {
                id: "company_spare".to_string(),
                name: "Spare".to_string(),
                master_id: "taken".to_string(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        db.identities()
            .insert(&Identity {
                id: "taken".to_string(),
                name: "Orphan".to_string(),
                email: "orphan@example.com".to_string(),
                role: Role::User,
                company_id: "company_spare".to_string(),
                phone: "+1 555 0100".to_string(),
                avatar: None,
                website: None,
                wechat: None,
                facebook: None,
                instagram: None,
                youtube: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let mut saga = RegistrationSaga::with_identity_id(&db, "taken");
        let result = saga.run(&registration("second@example.com")).await;

        assert!(result.is_err());
        assert!(saga.completed().is_empty());
        assert!(db
            .credentials()
            .get_by_email("second@example.com")
            .await
            .unwrap()
            .is_none());
        assert!(db
            .companies()
            .get_by_id(&company_id_for("taken"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_company_failure_undoes_credential() {
        let db = database().await;
        db.companies()
            .insert(&Company {
                id: company_id_for("fixed"),
                name: "Taken".to_string(),
                master_id: "someone".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        let mut saga = RegistrationSaga::with_identity_id(&db, "fixed");
        assert!(saga.run(&registration("c@example.com")).await.is_err());
        assert!(db.credentials().get_by_email("c@example.com").await.unwrap().is_none());

        let company = db.companies().get_by_id(&company_id_for("fixed")).await.unwrap();
        assert_eq!(company.map(|c| c.name), Some("Taken".to_string()));
    }
}
