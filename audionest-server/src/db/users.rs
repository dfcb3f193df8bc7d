//! User account persistence

use async_trait::async_trait;
use audionest_common::models::UserAccount;
use sqlx::{Row, SqlitePool};

use super::{is_unique_violation, parse_uuid};
use crate::traits::UserRepository;
use crate::{Error, Result};

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let row = sqlx::query("SELECT id, email, hashed_password FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let id: String = row.get("id");
                Ok(Some(UserAccount {
                    id: parse_uuid("users.id", &id)?,
                    email: row.get("email"),
                    hashed_password: row.get("hashed_password"),
                }))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, user: &UserAccount) -> Result<()> {
        sqlx::query("INSERT INTO users (id, email, hashed_password) VALUES (?, ?, ?)")
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.hashed_password)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::AlreadyRegistered(user.email.clone())
                } else {
                    Error::Database(e)
                }
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audionest_common::db::init_memory_database;

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = SqliteUserRepository::new(init_memory_database().await.unwrap());
        let user = UserAccount::new("a@x.com", "hash");

        repo.insert(&user).await.unwrap();

        let found = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found, user);
        assert!(repo.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_already_registered() {
        let repo = SqliteUserRepository::new(init_memory_database().await.unwrap());
        repo.insert(&UserAccount::new("a@x.com", "h1")).await.unwrap();

        let result = repo.insert(&UserAccount::new("a@x.com", "h2")).await;
        assert!(matches!(result, Err(Error::AlreadyRegistered(email)) if email == "a@x.com"));
    }
}
