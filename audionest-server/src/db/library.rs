//! Library entry persistence
//!
//! Every read joins the artifact row so callers get a complete `LibraryEntry`.

use async_trait::async_trait;
use audionest_common::models::LibraryEntry;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::artifacts::artifact_from_row;
use super::{is_unique_violation, parse_uuid};
use crate::traits::LibraryEntryRepository;
use crate::{Error, Result};

const SELECT_ENTRY: &str = r#"
    SELECT e.id, e.user_id, e.title, e.artist,
           a.source_id, a.file_path, a.bit_rate_kbps, a.codec
    FROM library_entries e
    JOIN audio_artifacts a ON a.source_id = e.source_id
"#;

pub struct SqliteLibraryRepository {
    pool: SqlitePool,
}

impl SqliteLibraryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn entry_from_row(row: &SqliteRow) -> Result<LibraryEntry> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");

    Ok(LibraryEntry {
        id: parse_uuid("library_entries.id", &id)?,
        user_id: parse_uuid("library_entries.user_id", &user_id)?,
        title: row.get("title"),
        artist: row.get("artist"),
        audio: artifact_from_row(row)?,
    })
}

#[async_trait]
impl LibraryEntryRepository for SqliteLibraryRepository {
    async fn find_by_user_and_source(
        &self,
        user_id: Uuid,
        source_id: &str,
    ) -> Result<Option<LibraryEntry>> {
        let sql = format!("{} WHERE e.user_id = ? AND e.source_id = ?", SELECT_ENTRY);
        let row = sqlx::query(&sql)
            .bind(user_id.to_string())
            .bind(source_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn insert(&self, entry: &LibraryEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO library_entries (id, user_id, source_id, title, artist)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.user_id.to_string())
        .bind(entry.source_id())
        .bind(&entry.title)
        .bind(&entry.artist)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::DuplicateLibraryEntry {
                    user_id: entry.user_id,
                    source_id: entry.source_id().to_string(),
                }
            } else {
                Error::Database(e)
            }
        })?;

        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<LibraryEntry>> {
        let sql = format!("{} WHERE e.user_id = ? ORDER BY e.created_at, e.rowid", SELECT_ENTRY);
        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LibraryEntry>> {
        let sql = format!("{} WHERE e.id = ?", SELECT_ENTRY);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM library_entries WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
