//! Reading and removing a user's library entries
//!
//! Entries owned by another user are treated exactly like missing ones.

use audionest_common::models::LibraryEntry;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::traits::LibraryEntryRepository;
use crate::{Error, Result};

pub struct LibraryReader {
    entries: Arc<dyn LibraryEntryRepository>,
}

impl LibraryReader {
    pub fn new(entries: Arc<dyn LibraryEntryRepository>) -> Self {
        Self { entries }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<LibraryEntry>> {
        self.entries.list_by_user(user_id).await
    }

    /// Fetch one of the user's entries
    ///
    /// # Returns
    /// * `Err(Error::EntryNotFound)` - no such entry, or it belongs to someone else
    pub async fn get(&self, user_id: Uuid, entry_id: Uuid) -> Result<LibraryEntry> {
        self.entries
            .find_by_id(entry_id)
            .await?
            .filter(|entry| entry.user_id == user_id)
            .ok_or(Error::EntryNotFound(entry_id))
    }
}

pub struct LibraryRemover {
    entries: Arc<dyn LibraryEntryRepository>,
}

impl LibraryRemover {
    pub fn new(entries: Arc<dyn LibraryEntryRepository>) -> Self {
        Self { entries }
    }

    /// Delete one of the user's entries
    ///
    /// Removing an entry that does not exist (or is not the user's) succeeds
    /// without doing anything. The shared artifact and its file are kept.
    pub async fn remove(&self, user_id: Uuid, entry_id: Uuid) -> Result<()> {
        let owned = self
            .entries
            .find_by_id(entry_id)
            .await?
            .is_some_and(|entry| entry.user_id == user_id);

        if !owned {
            debug!("Nothing to remove for entry {} of user {}", entry_id, user_id);
            return Ok(());
        }

        if self.entries.delete(entry_id).await? {
            info!("Removed entry {} from library of user {}", entry_id, user_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::mocks::MockEntries;
    use audionest_common::models::{AudioArtifact, AudioCodec};
    use std::path::PathBuf;

    fn entry_for(user_id: Uuid) -> LibraryEntry {
        LibraryEntry {
            id: Uuid::new_v4(),
            user_id,
            title: "Song".to_string(),
            artist: None,
            audio: AudioArtifact {
                source_id: "v1".to_string(),
                file_path: PathBuf::from("/audio/v1.ogg"),
                bit_rate_kbps: 320,
                codec: AudioCodec::Vorbis,
            },
        }
    }

    #[tokio::test]
    async fn test_get_own_entry() {
        let owner = Uuid::new_v4();
        let entry = entry_for(owner);
        let id = entry.id;

        let mut entries = MockEntries::new();
        entries
            .expect_find_by_id()
            .returning(move |_| Ok(Some(entry.clone())));

        let found = LibraryReader::new(Arc::new(entries)).get(owner, id).await.unwrap();
        assert_eq!(found.id, id);
    }

    #[tokio::test]
    async fn test_get_other_users_entry_is_not_found() {
        let entry = entry_for(Uuid::new_v4());
        let id = entry.id;

        let mut entries = MockEntries::new();
        entries
            .expect_find_by_id()
            .returning(move |_| Ok(Some(entry.clone())));

        let result = LibraryReader::new(Arc::new(entries))
            .get(Uuid::new_v4(), id)
            .await;
        assert!(matches!(result, Err(Error::EntryNotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok_and_get_still_not_found() {
        let mut entries = MockEntries::new();
        entries.expect_find_by_id().returning(|_| Ok(None));
        entries.expect_delete().never();
        let entries: Arc<dyn LibraryEntryRepository> = Arc::new(entries);

        let id = Uuid::new_v4();
        let user = Uuid::new_v4();
        LibraryRemover::new(entries.clone()).remove(user, id).await.unwrap();

        assert!(matches!(
            LibraryReader::new(entries).get(user, id).await,
            Err(Error::EntryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_leaves_other_users_entry() {
        let entry = entry_for(Uuid::new_v4());
        let id = entry.id;

        let mut entries = MockEntries::new();
        entries
            .expect_find_by_id()
            .returning(move |_| Ok(Some(entry.clone())));
        entries.expect_delete().never();

        LibraryRemover::new(Arc::new(entries))
            .remove(Uuid::new_v4(), id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_remove_own_entry() {
        let owner = Uuid::new_v4();
        let entry = entry_for(owner);
        let id = entry.id;

        let mut entries = MockEntries::new();
        entries
            .expect_find_by_id()
            .returning(move |_| Ok(Some(entry.clone())));
        entries.expect_delete().times(1).returning(|_| Ok(true));

        LibraryRemover::new(Arc::new(entries)).remove(owner, id).await.unwrap();
    }
}
