//! User accounts: registration, credential checks and role management.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::{KopiError, Result};
use crate::storage::{Role, SeaOrmStorage, User};
use crate::utils::password::{check_password_strength, hash_password, verify_password};
use crate::utils::{generate_user_id, is_plausible_email, normalize_email};

pub const INVALID_CREDENTIALS: &str = "Email atau password salah.";

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct UserService {
    storage: Arc<SeaOrmStorage>,
}

impl UserService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Self-service registration, always with role `user`.
    pub async fn register(&self, req: RegisterRequest) -> Result<User> {
        self.create_user(&req.name, &req.email, &req.password, Role::User)
            .await
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(KopiError::validation("Nama tidak boleh kosong."));
        }
        let email = normalize_email(email);
        if !is_plausible_email(&email) {
            return Err(KopiError::validation("Format email tidak valid."));
        }
        check_password_strength(password).map_err(KopiError::validation)?;

        let user = User {
            id: generate_user_id(),
            name: name.to_string(),
            email,
            password_hash: hash_password(password)?,
            role,
            created_at: Utc::now(),
        };
        self.storage.insert_user(&user).await?;
        Ok(user)
    }

    /// Checks credentials. Unknown email and wrong password fail the same way.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        let Some(user) = self.storage.get_user(&email).await? else {
            info!("Login failed: unknown email {}", email);
            return Err(KopiError::unauthorized(INVALID_CREDENTIALS));
        };

        match verify_password(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                info!("Login failed: wrong password for {}", email);
                Err(KopiError::unauthorized(INVALID_CREDENTIALS))
            }
            Err(e) => {
                warn!("Stored hash for {} is unreadable: {}", email, e);
                Err(KopiError::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.storage.get_user(&normalize_email(email)).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        self.storage.get_user_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.storage.list_users().await
    }

    pub async fn set_role(&self, email: &str, role: Role) -> Result<User> {
        self.storage
            .update_user_role(&normalize_email(email), role)
            .await
    }

    pub async fn remove(&self, email: &str) -> Result<()> {
        self.storage.remove_user(&normalize_email(email)).await
    }

    /// Makes sure an admin account exists for `email`; an existing user with a
    /// lower role is promoted. Returns true when an account was created.
    pub async fn ensure_admin(&self, email: &str, password: &str, name: &str) -> Result<bool> {
        match self.find_by_email(email).await? {
            Some(user) if user.is_admin() => Ok(false),
            Some(user) => {
                self.set_role(&user.email, Role::Admin).await?;
                info!("Promoted {} to admin", user.email);
                Ok(false)
            }
            None => {
                let user = self.create_user(name, email, password, Role::Admin).await?;
                info!("Bootstrap admin created: {}", user.email);
                Ok(true)
            }
        }
    }
}
