//! Password hashing (Argon2id, PHC string format)

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Argon2, Params};

use crate::{Error, Result};

#[derive(Clone, Default)]
pub struct PasswordHasher {
    params: Option<Params>,
}

impl PasswordHasher {
    /// Hasher with explicit cost parameters instead of the Argon2 defaults
    pub fn with_params(params: Params) -> Self {
        Self { params: Some(params) }
    }

    fn argon2(&self) -> Argon2<'static> {
        match &self.params {
            Some(params) => Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params.clone()),
            None => Argon2::default(),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::PasswordHash(e.to_string()))
    }

    /// Check a password against a stored PHC string
    ///
    /// The cost parameters come from the stored string, not from `self`.
    pub fn verify(&self, password: &str, hashed: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hashed).map_err(|e| Error::PasswordHash(e.to_string()))?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
