//! Persisted key-value settings
//!
//! The token signing secret lives here when it is not supplied through
//! configuration, so tokens survive restarts.

use crate::{Error, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::SqlitePool;
use tracing::info;

const TOKEN_SECRET_KEY: &str = "token_signing_secret";
const TOKEN_SECRET_LEN: usize = 64;

/// Read a setting value
pub async fn get_setting(db: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<(Option<String>,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(db)
            .await?;

    Ok(value.and_then(|(v,)| v))
}

/// Load the token signing secret, generating it on first use
pub async fn load_token_secret(db: &SqlitePool) -> Result<String> {
    if let Some(secret) = get_setting(db, TOKEN_SECRET_KEY).await? {
        if secret.len() < TOKEN_SECRET_LEN {
            return Err(Error::Config(format!(
                "Stored token secret is shorter than {} characters",
                TOKEN_SECRET_LEN
            )));
        }
        return Ok(secret);
    }

    initialize_token_secret(db).await
}

/// Generate and store a new random signing secret
///
/// Uses `INSERT OR IGNORE` and re-reads, so two processes racing on first
/// start agree on one secret.
pub async fn initialize_token_secret(db: &SqlitePool) -> Result<String> {
    let candidate: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_SECRET_LEN)
        .map(char::from)
        .collect();

    sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
        .bind(TOKEN_SECRET_KEY)
        .bind(&candidate)
        .execute(db)
        .await?;

    let stored = get_setting(db, TOKEN_SECRET_KEY)
        .await?
        .ok_or_else(|| Error::Internal("Token secret missing after insert".to_string()))?;

    info!("Initialized persisted token signing secret");
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_database;

    async fn set_setting(db: &SqlitePool, key: &str, value: &str) {
        sqlx::query(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)",
        )
        .bind(key)
        .bind(value)
        .execute(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_setting_roundtrip() {
        let db = init_memory_database().await.unwrap();

        assert_eq!(get_setting(&db, "missing").await.unwrap(), None);

        set_setting(&db, "k", "v1").await;
        set_setting(&db, "k", "v2").await;
        assert_eq!(get_setting(&db, "k").await.unwrap(), Some("v2".to_string()));
    }

    #[tokio::test]
    async fn test_token_secret_generated_once() {
        let db = init_memory_database().await.unwrap();

        let first = load_token_secret(&db).await.unwrap();
        let second = load_token_secret(&db).await.unwrap();

        assert_eq!(first.len(), TOKEN_SECRET_LEN);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_short_stored_secret_rejected() {
        let db = init_memory_database().await.unwrap();
        set_setting(&db, TOKEN_SECRET_KEY, "short").await;

        assert!(matches!(load_token_secret(&db).await, Err(Error::Config(_))));
    }
}
