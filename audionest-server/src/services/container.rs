//! Composition root

use audionest_common::config::Config;
use sqlx::SqlitePool;
use std::sync::Arc;

use super::{
    AudioAcquirer, AudioSourceLookup, IdentityService, LibraryEntryRegistrar, LibraryReader,
    LibraryRemover, PasswordHasher, TokenHandler,
};
use crate::db::{SqliteArtifactRepository, SqliteLibraryRepository, SqliteUserRepository};
use crate::traits::{AudioDownloader, AudioSourceSearcher, LibraryEntryRepository};
use crate::ytdlp::{YtDlpDownloader, YtDlpSearcher};
use crate::Result;

/// Every service the HTTP layer uses, wired once at startup
pub struct ServiceContainer {
    pub lookup: AudioSourceLookup,
    pub acquirer: AudioAcquirer,
    pub registrar: LibraryEntryRegistrar,
    pub reader: LibraryReader,
    pub remover: LibraryRemover,
    pub identity: IdentityService,
}

/// External capabilities, replaceable in tests
pub struct Capabilities {
    pub searcher: Arc<dyn AudioSourceSearcher>,
    pub downloader: Arc<dyn AudioDownloader>,
    pub password_hasher: PasswordHasher,
}

impl Capabilities {
    /// yt-dlp adapters and default Argon2 cost
    pub fn from_config(config: &Config) -> Self {
        Self {
            searcher: Arc::new(YtDlpSearcher::new(
                config.yt_dlp_path.clone(),
                config.search_max_results,
            )),
            downloader: Arc::new(YtDlpDownloader::new(
                config.yt_dlp_path.clone(),
                config.ffmpeg_path.clone(),
            )),
            password_hasher: PasswordHasher::default(),
        }
    }
}

impl ServiceContainer {
    /// Production wiring: SQLite storage and yt-dlp
    pub fn new(config: &Config, db: SqlitePool, token_secret: &str) -> Result<Self> {
        Self::with_capabilities(config, db, token_secret, Capabilities::from_config(config))
    }

    pub fn with_capabilities(
        config: &Config,
        db: SqlitePool,
        token_secret: &str,
        capabilities: Capabilities,
    ) -> Result<Self> {
        let tokens = TokenHandler::new(
            token_secret,
            &config.auth.jwt_algorithm,
            config.auth.token_expiration_days,
        )?;

        let entries: Arc<dyn LibraryEntryRepository> =
            Arc::new(SqliteLibraryRepository::new(db.clone()));

        Ok(Self {
            lookup: AudioSourceLookup::new(capabilities.searcher),
            acquirer: AudioAcquirer::new(
                Arc::new(SqliteArtifactRepository::new(db.clone())),
                capabilities.downloader,
                config.audio_directory.clone(),
                config.audio_target,
            ),
            registrar: LibraryEntryRegistrar::new(entries.clone()),
            reader: LibraryReader::new(entries.clone()),
            remover: LibraryRemover::new(entries),
            identity: IdentityService::new(
                Arc::new(SqliteUserRepository::new(db)),
                tokens,
                capabilities.password_hasher,
            ),
        })
    }
}
