//! Database initialization tests
//!
//! Covers first-run creation, reopening an existing file, and the store-level
//! constraints the services rely on.

use audionest_common::db::init::init_database;
use tempfile::TempDir;

async fn insert_user(pool: &sqlx::SqlitePool, id: &str, email: &str) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO users (id, email, hashed_password) VALUES (?, ?, 'h')")
        .bind(id)
        .bind(email)
        .execute(pool)
        .await
        .map(|_| ())
}

async fn insert_artifact(pool: &sqlx::SqlitePool, source_id: &str) {
    sqlx::query(
        "INSERT INTO audio_artifacts (source_id, file_path, bit_rate_kbps, codec) VALUES (?, ?, 320, 'vorbis')",
    )
    .bind(source_id)
    .bind(format!("/audio/{}.ogg", source_id))
    .execute(pool)
    .await
    .unwrap();
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("audionest.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("audionest.db");

    let pool1 = init_database(&db_path).await.unwrap();
    insert_user(&pool1, "u1", "a@x.com").await.unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.as_ref().err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool2.unwrap())
        .await
        .unwrap();
    assert_eq!(count, 1, "Existing rows must survive reopening");
}

#[tokio::test]
async fn test_email_is_unique() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("audionest.db")).await.unwrap();

    insert_user(&pool, "u1", "a@x.com").await.unwrap();
    let duplicate = insert_user(&pool, "u2", "a@x.com").await;

    assert!(duplicate.is_err(), "Second account with the same email must be rejected");
}

#[tokio::test]
async fn test_library_entry_unique_per_user_and_source() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("audionest.db")).await.unwrap();

    insert_user(&pool, "u1", "a@x.com").await.unwrap();
    insert_user(&pool, "u2", "b@x.com").await.unwrap();
    insert_artifact(&pool, "v1").await;

    let insert_entry = |id: &'static str, user: &'static str| {
        let pool = pool.clone();
        async move {
            sqlx::query(
                "INSERT INTO library_entries (id, user_id, source_id, title) VALUES (?, ?, 'v1', 'T')",
            )
            .bind(id)
            .bind(user)
            .execute(&pool)
            .await
        }
    };

    assert!(insert_entry("e1", "u1").await.is_ok());
    assert!(insert_entry("e2", "u2").await.is_ok(), "Other users may own the same source");
    assert!(insert_entry("e3", "u1").await.is_err(), "Same user and source must be rejected");
}

#[tokio::test]
async fn test_library_entry_requires_artifact() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("audionest.db")).await.unwrap();
    insert_user(&pool, "u1", "a@x.com").await.unwrap();

    let result = sqlx::query(
        "INSERT INTO library_entries (id, user_id, source_id, title) VALUES ('e1', 'u1', 'missing', 'T')",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "Foreign key to audio_artifacts must be enforced");
}
