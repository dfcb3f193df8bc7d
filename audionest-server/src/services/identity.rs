//! Account registration, login and token resolution

use audionest_common::models::UserAccount;
use std::sync::Arc;
use tracing::{debug, info};

use super::password::PasswordHasher;
use super::token::TokenHandler;
use crate::traits::UserRepository;
use crate::{Error, Result};

pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    tokens: TokenHandler,
    hasher: PasswordHasher,
}

/// Emails are compared case-insensitively and without surrounding whitespace
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenHandler, hasher: PasswordHasher) -> Self {
        Self { users, tokens, hasher }
    }

    /// Create an account
    ///
    /// # Returns
    /// * `Err(Error::AlreadyRegistered)` - an account with this email exists
    /// * `Err(Error::InvalidInput)` - blank email or password
    pub async fn register(&self, email: &str, password: &str) -> Result<UserAccount> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(Error::InvalidInput("Email must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(Error::InvalidInput("Password must not be empty".to_string()));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(Error::AlreadyRegistered(email));
        }

        let hashed = self.hash_password(password).await?;
        let user = UserAccount::new(email, hashed);

        // The unique email column settles concurrent registrations
        self.users.insert(&user).await?;

        info!("Registered user {} ({})", user.email, user.id);
        Ok(user)
    }

    /// Check credentials and issue a bearer token
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String> {
        let email = normalize_email(email);

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(Error::AuthenticationFailure)?;

        if !self.verify_password(password, &user.hashed_password).await? {
            return Err(Error::AuthenticationFailure);
        }

        self.tokens.issue(&user.email)
    }

    /// Map a bearer token back to its account
    ///
    /// Expired, tampered and malformed tokens, and tokens for accounts that
    /// no longer exist, all fail with `AuthenticationFailure`.
    pub async fn resolve(&self, token: &str) -> Result<UserAccount> {
        let subject = self.tokens.verify(token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            Error::AuthenticationFailure
        })?;

        self.users
            .find_by_email(&subject)
            .await?
            .ok_or(Error::AuthenticationFailure)
    }

    async fn hash_password(&self, password: &str) -> Result<String> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    async fn verify_password(&self, password: &str, hashed: &str) -> Result<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hashed = hashed.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }
}
