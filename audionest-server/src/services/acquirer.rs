//! Audio acquisition with deduplication
//!
//! Each source is downloaded and transcoded at most once; the file lives at
//! `<audio_directory>/<source_id>.<ext>` and is shared by every user.
//!
//! Downloads land under a per-call staging name and are renamed into place
//! when complete, so the final path only ever holds a finished file.

use audionest_common::models::{validate_source_id, AudioArtifact, AudioTarget};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::traits::{AudioArtifactRepository, AudioDownloader};
use crate::{Error, Result};

pub struct AudioAcquirer {
    artifacts: Arc<dyn AudioArtifactRepository>,
    downloader: Arc<dyn AudioDownloader>,
    audio_directory: PathBuf,
    target: AudioTarget,
}

impl AudioAcquirer {
    pub fn new(
        artifacts: Arc<dyn AudioArtifactRepository>,
        downloader: Arc<dyn AudioDownloader>,
        audio_directory: PathBuf,
        target: AudioTarget,
    ) -> Self {
        Self {
            artifacts,
            downloader,
            audio_directory,
            target,
        }
    }

    /// Deterministic file location for a source
    pub fn artifact_path(&self, source_id: &str) -> PathBuf {
        self.audio_directory
            .join(format!("{}.{}", source_id, self.target.codec.file_extension()))
    }

    /// Unique in-progress location for one download of a source
    fn staging_path(&self, source_id: &str) -> PathBuf {
        self.audio_directory.join(format!(
            "{}.{}.partial.{}",
            source_id,
            Uuid::new_v4().simple(),
            self.target.codec.file_extension()
        ))
    }

    /// Download into a staging file, then move it to `file_path`
    async fn download_to(&self, source_id: &str, file_path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(&self.audio_directory).await?;

        let staging = self.staging_path(source_id);
        let mut result = self.downloader.download(source_id, &staging, self.target).await;
        if result.is_ok() {
            result = tokio::fs::rename(&staging, file_path).await.map_err(Error::from);
        }

        if result.is_err() {
            if let Err(e) = tokio::fs::remove_file(&staging).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not remove staging file {}: {}", staging.display(), e);
                }
            }
        }
        result
    }

    /// Return the artifact for `source_id`, downloading it on first use
    ///
    /// A file already present at the artifact path (completed by an earlier
    /// request that failed before registering it) is registered without
    /// downloading again. Two concurrent first requests may both download;
    /// each renames a complete file into place and the idempotent artifact
    /// insert settles them on one row.
    pub async fn acquire(&self, source_id: &str) -> Result<AudioArtifact> {
        validate_source_id(source_id).map_err(|e| Error::InvalidSourceId(e.to_string()))?;

        if let Some(existing) = self.artifacts.find(source_id).await? {
            debug!("Audio for '{}' already acquired at {}", source_id, existing.file_path.display());
            return Ok(existing);
        }

        let file_path = self.artifact_path(source_id);

        if tokio::fs::try_exists(&file_path).await? {
            info!("Registering existing file {} for '{}'", file_path.display(), source_id);
        } else {
            self.download_to(source_id, &file_path).await?;
        }

        let artifact = AudioArtifact {
            source_id: source_id.to_string(),
            file_path,
            bit_rate_kbps: self.target.bit_rate_kbps,
            codec: self.target.codec,
        };

        self.artifacts.insert(&artifact).await
    }
}
