//! Audio artifact persistence
//!
//! One row per external source. Rows are written once and never updated.

use async_trait::async_trait;
use audionest_common::models::{AudioArtifact, AudioCodec};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::PathBuf;

use crate::traits::AudioArtifactRepository;
use crate::{Error, Result};

pub struct SqliteArtifactRepository {
    pool: SqlitePool,
}

impl SqliteArtifactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Map the artifact columns of a row (plain or joined) to an `AudioArtifact`
pub(crate) fn artifact_from_row(row: &SqliteRow) -> Result<AudioArtifact> {
    let bit_rate: i64 = row.get("bit_rate_kbps");
    let codec: String = row.get("codec");
    let file_path: String = row.get("file_path");

    Ok(AudioArtifact {
        source_id: row.get("source_id"),
        file_path: PathBuf::from(file_path),
        bit_rate_kbps: u32::try_from(bit_rate)
            .map_err(|_| Error::Internal(format!("Invalid bit rate {} in audio_artifacts", bit_rate)))?,
        codec: codec.parse::<AudioCodec>()?,
    })
}

#[async_trait]
impl AudioArtifactRepository for SqliteArtifactRepository {
    async fn find(&self, source_id: &str) -> Result<Option<AudioArtifact>> {
        let row = sqlx::query(
            "SELECT source_id, file_path, bit_rate_kbps, codec FROM audio_artifacts WHERE source_id = ?",
        )
        .bind(source_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(artifact_from_row).transpose()
    }

    async fn insert(&self, artifact: &AudioArtifact) -> Result<AudioArtifact> {
        sqlx::query(
            r#"
            INSERT INTO audio_artifacts (source_id, file_path, bit_rate_kbps, codec)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(source_id) DO NOTHING
            "#,
        )
        .bind(&artifact.source_id)
        .bind(artifact.file_path.to_string_lossy().into_owned())
        .bind(i64::from(artifact.bit_rate_kbps))
        .bind(artifact.codec.as_str())
        .execute(&self.pool)
        .await?;

        self.find(&artifact.source_id).await?.ok_or_else(|| {
            Error::Internal(format!(
                "Artifact for source '{}' missing right after insert",
                artifact.source_id
            ))
        })
    }
}
