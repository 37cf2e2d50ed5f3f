//! User accounts.
//!
//! The [`UserDirectory`] trait is the narrow lookup interface the
//! authentication gate depends on. [`AccountService`] layers registration
//! and credential checks on top of it.

mod memory;
mod password;

pub use memory::InMemoryUserDirectory;
pub use password::{Argon2Hasher, PasswordHasher};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::DirectoryError;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
}

/// Lookup and creation of accounts by email.
///
/// Emails are matched exactly.
#[async_trait]
pub trait UserDirectory: Send + Sync + Debug {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError>;

    /// Create an account, failing with `EmailAlreadyExists` on a duplicate.
    async fn create(&self, user: NewUser) -> Result<User, DirectoryError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, DirectoryError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}

// =============================================================================
// Account Service
// =============================================================================

/// Registration and login on top of a [`UserDirectory`].
#[derive(Debug, Clone)]
pub struct AccountService {
    directory: Arc<dyn UserDirectory>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(directory: Arc<dyn UserDirectory>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { directory, hasher }
    }

    /// Account service over `directory` with Argon2 hashing.
    pub fn with_argon2(directory: Arc<dyn UserDirectory>) -> Self {
        Self::new(directory, Arc::new(Argon2Hasher::new()))
    }

    pub fn directory(&self) -> &Arc<dyn UserDirectory> {
        &self.directory
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// - `InvalidRegistration` when email or password are blank or the email
    ///   has no `@`
    /// - `EmailAlreadyExists` when the email is taken
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<User, DirectoryError> {
        validate_registration(email, password)?;

        if self.directory.exists_by_email(email).await? {
            return Err(DirectoryError::EmailAlreadyExists(email.to_string()));
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .directory
            .create(NewUser {
                email: email.to_string(),
                name,
                password_hash,
            })
            .await?;

        info!(email = %user.email, "Registered user");
        Ok(user)
    }

    /// Check credentials. Returns `None` for an unknown email or a wrong
    /// password, without distinguishing the two.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DirectoryError> {
        let Some(user) = self.directory.find_by_email(email).await? else {
            debug!("Login for unknown email");
            return Ok(None);
        };

        if !self.hasher.verify(password, &user.password_hash) {
            debug!("Login with wrong password");
            return Ok(None);
        }

        Ok(Some(user))
    }
}

fn validate_registration(email: &str, password: &str) -> Result<(), DirectoryError> {
    let mut problems = Vec::new();

    if email.trim().is_empty() {
        problems.push("Email is required");
    } else if !email.contains('@') {
        problems.push("Email must be valid");
    }
    if password.trim().is_empty() {
        problems.push("Password is required");
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(DirectoryError::InvalidRegistration(problems.join(", ")))
    }
}
