//! Seams between the services and their collaborators
//!
//! Storage traits are implemented over SQLite in [`crate::db`]; the external
//! capabilities are implemented by the yt-dlp adapters in [`crate::ytdlp`].
//! Services only ever hold `Arc<dyn Trait>`, so tests swap in mocks or fakes.

use async_trait::async_trait;
use audionest_common::models::{AudioArtifact, AudioTarget, ExternalSource, LibraryEntry, UserAccount};
use std::path::Path;
use uuid::Uuid;

use crate::Result;

/// Account storage
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>>;

    /// Insert a new account
    ///
    /// # Returns
    /// * `Err(Error::AlreadyRegistered)` - email is taken
    async fn insert(&self, user: &UserAccount) -> Result<()>;
}

/// Artifact storage, keyed by source id
#[async_trait]
pub trait AudioArtifactRepository: Send + Sync {
    async fn find(&self, source_id: &str) -> Result<Option<AudioArtifact>>;

    /// Insert an artifact unless one already exists for its source
    ///
    /// Returns whichever row is stored after the call, so two concurrent
    /// acquisitions of the same source agree on a single artifact.
    async fn insert(&self, artifact: &AudioArtifact) -> Result<AudioArtifact>;
}

/// Per-user library storage
#[async_trait]
pub trait LibraryEntryRepository: Send + Sync {
    async fn find_by_user_and_source(
        &self,
        user_id: Uuid,
        source_id: &str,
    ) -> Result<Option<LibraryEntry>>;

    /// Insert an entry
    ///
    /// # Returns
    /// * `Err(Error::DuplicateLibraryEntry)` - the user already holds this source
    async fn insert(&self, entry: &LibraryEntry) -> Result<()>;

    /// All entries of one user, oldest first
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<LibraryEntry>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LibraryEntry>>;

    /// Delete an entry, returning whether a row was removed
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Searches the external video platform
#[async_trait]
pub trait AudioSourceSearcher: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<ExternalSource>>;
}

/// Downloads and transcodes the audio of one external source
#[async_trait]
pub trait AudioDownloader: Send + Sync {
    /// Fetch `source_id` and write it transcoded to `target` at exactly `destination`
    async fn download(&self, source_id: &str, destination: &Path, target: AudioTarget) -> Result<()>;
}
