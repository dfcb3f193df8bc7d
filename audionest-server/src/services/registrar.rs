//! Adding acquired audio to a user's library

use audionest_common::models::{AudioArtifact, LibraryEntry};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::traits::LibraryEntryRepository;
use crate::{Error, Result};

pub struct LibraryEntryRegistrar {
    entries: Arc<dyn LibraryEntryRepository>,
}

impl LibraryEntryRegistrar {
    pub fn new(entries: Arc<dyn LibraryEntryRepository>) -> Self {
        Self { entries }
    }

    /// Fail early when the user already holds an entry for this source
    pub async fn ensure_not_registered(&self, user_id: Uuid, source_id: &str) -> Result<()> {
        match self.entries.find_by_user_and_source(user_id, source_id).await? {
            Some(_) => Err(Error::DuplicateLibraryEntry {
                user_id,
                source_id: source_id.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Create a library entry for `artifact`
    ///
    /// `title` is trimmed and must not be empty; a blank `artist` is stored
    /// as absent. The unique (user, source) constraint in storage decides
    /// races the pre-check cannot see.
    pub async fn register(
        &self,
        user_id: Uuid,
        artifact: &AudioArtifact,
        title: &str,
        artist: Option<&str>,
    ) -> Result<LibraryEntry> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("Title must not be empty".to_string()));
        }

        self.ensure_not_registered(user_id, &artifact.source_id).await?;

        let entry = LibraryEntry {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            artist: artist
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from),
            audio: artifact.clone(),
        };

        self.entries.insert(&entry).await?;

        info!(
            "Added '{}' ({}) to library of user {}",
            entry.title,
            entry.source_id(),
            user_id
        );
        Ok(entry)
    }
}
