//! Bootstrap configuration
//!
//! Every setting is resolved once at startup in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is not an error; a malformed one is.

use clap::Parser;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{AudioCodec, AudioTarget};
use crate::{Error, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIT_RATE_KBPS: u32 = 320;
pub const DEFAULT_CODEC: AudioCodec = AudioCodec::Vorbis;
pub const DEFAULT_SEARCH_MAX_RESULTS: usize = 20;
pub const DEFAULT_JWT_ALGORITHM: &str = "HS256";
pub const DEFAULT_TOKEN_EXPIRATION_DAYS: u32 = 7;
pub const DEFAULT_LOG_LEVEL: &str = "info";

const DATABASE_FILE_NAME: &str = "audionest.db";
const AUDIO_DIRECTORY_NAME: &str = "audio";
const SUPPORTED_JWT_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

/// Command-line arguments, each also readable from the environment
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "audionest", version, about = "Personal audio library web service")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(long, env = "AUDIONEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[arg(long, env = "AUDIONEST_HOST")]
    pub host: Option<String>,

    /// Port the HTTP server listens on
    #[arg(long, env = "AUDIONEST_PORT")]
    pub port: Option<u16>,

    /// Folder holding the database and downloaded audio
    #[arg(long, env = "AUDIONEST_ROOT_FOLDER")]
    pub root_folder: Option<PathBuf>,

    /// SQLite database file (defaults to <root>/audionest.db)
    #[arg(long, env = "AUDIONEST_DATABASE_PATH")]
    pub database_path: Option<PathBuf>,

    /// Directory for transcoded audio (defaults to <root>/audio)
    #[arg(long, env = "AUDIONEST_AUDIO_DIRECTORY")]
    pub audio_directory: Option<PathBuf>,

    /// Target bit rate in kbps
    #[arg(long, env = "AUDIONEST_AUDIO_BIT_RATE_KBPS")]
    pub bit_rate_kbps: Option<u32>,

    /// Target codec: flac, opus or vorbis
    #[arg(long, env = "AUDIONEST_AUDIO_CODEC")]
    pub codec: Option<String>,

    /// yt-dlp executable
    #[arg(long, env = "AUDIONEST_YT_DLP_PATH")]
    pub yt_dlp_path: Option<PathBuf>,

    /// ffmpeg executable or the directory containing it
    #[arg(long, env = "AUDIONEST_FFMPEG_PATH")]
    pub ffmpeg_path: Option<PathBuf>,

    /// Maximum number of search results
    #[arg(long, env = "AUDIONEST_SEARCH_MAX_RESULTS")]
    pub search_max_results: Option<usize>,

    /// Token signing secret (generated and persisted when unset)
    #[arg(long, env = "AUDIONEST_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Token signing algorithm: HS256, HS384 or HS512
    #[arg(long, env = "AUDIONEST_JWT_ALGORITHM")]
    pub jwt_algorithm: Option<String>,

    /// Days before an issued token expires
    #[arg(long, env = "AUDIONEST_TOKEN_EXPIRATION_DAYS")]
    pub token_expiration_days: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "AUDIONEST_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// TOML file layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub root_folder: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub audio_directory: Option<PathBuf>,
    pub audio: AudioSection,
    pub tools: ToolsSection,
    pub search: SearchSection,
    pub auth: AuthSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioSection {
    pub bit_rate_kbps: Option<u32>,
    pub codec: Option<AudioCodec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsSection {
    pub yt_dlp_path: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSection {
    pub max_results: Option<usize>,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthSection {
    pub jwt_secret: Option<String>,
    pub jwt_algorithm: Option<String>,
    pub token_expiration_days: Option<u32>,
}

impl fmt::Debug for AuthSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSection")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("token_expiration_days", &self.token_expiration_days)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
}

/// Token settings after resolution
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// `None` means the persisted secret from the settings table is used
    pub jwt_secret: Option<String>,
    pub jwt_algorithm: String,
    pub token_expiration_days: u32,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("token_expiration_days", &self.token_expiration_days)
            .finish()
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub audio_directory: PathBuf,
    pub audio_target: AudioTarget,
    pub yt_dlp_path: PathBuf,
    pub ffmpeg_path: Option<PathBuf>,
    pub search_max_results: usize,
    pub auth: AuthConfig,
    pub log_level: String,
}

impl Config {
    /// Resolve configuration from CLI/env arguments and the TOML file
    pub fn load(cli: &CliArgs) -> Result<Self> {
        let toml_config = match &cli.config {
            Some(path) => load_toml_file(path)?,
            None => match find_config_file() {
                Some(path) => load_toml_file(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    TomlConfig::default()
                }
            },
        };

        Self::from_sources(cli, toml_config)
    }

    /// Merge already-loaded sources, CLI/env first
    pub fn from_sources(cli: &CliArgs, file: TomlConfig) -> Result<Self> {
        let root_folder = cli
            .root_folder
            .clone()
            .or(file.root_folder)
            .unwrap_or_else(default_root_folder);

        let database_path = cli
            .database_path
            .clone()
            .or(file.database_path)
            .unwrap_or_else(|| root_folder.join(DATABASE_FILE_NAME));

        let audio_directory = cli
            .audio_directory
            .clone()
            .or(file.audio_directory)
            .unwrap_or_else(|| root_folder.join(AUDIO_DIRECTORY_NAME));

        let codec = match &cli.codec {
            Some(codec) => codec
                .parse::<AudioCodec>()
                .map_err(|e| Error::Config(e.to_string()))?,
            None => file.audio.codec.unwrap_or(DEFAULT_CODEC),
        };

        let bit_rate_kbps = cli
            .bit_rate_kbps
            .or(file.audio.bit_rate_kbps)
            .unwrap_or(DEFAULT_BIT_RATE_KBPS);
        if bit_rate_kbps == 0 {
            return Err(Error::Config("Audio bit rate must be positive".to_string()));
        }

        let search_max_results = cli
            .search_max_results
            .or(file.search.max_results)
            .unwrap_or(DEFAULT_SEARCH_MAX_RESULTS);
        if search_max_results == 0 {
            return Err(Error::Config("Search max results must be positive".to_string()));
        }

        let jwt_algorithm = cli
            .jwt_algorithm
            .clone()
            .or(file.auth.jwt_algorithm)
            .unwrap_or_else(|| DEFAULT_JWT_ALGORITHM.to_string())
            .to_ascii_uppercase();
        if !SUPPORTED_JWT_ALGORITHMS.contains(&jwt_algorithm.as_str()) {
            return Err(Error::Config(format!(
                "Unsupported token algorithm '{}' (expected one of {})",
                jwt_algorithm,
                SUPPORTED_JWT_ALGORITHMS.join(", ")
            )));
        }

        let token_expiration_days = cli
            .token_expiration_days
            .or(file.auth.token_expiration_days)
            .unwrap_or(DEFAULT_TOKEN_EXPIRATION_DAYS);
        if token_expiration_days == 0 {
            return Err(Error::Config("Token expiration must be at least one day".to_string()));
        }

        let jwt_secret = cli
            .jwt_secret
            .clone()
            .or(file.auth.jwt_secret)
            .filter(|secret| !secret.trim().is_empty());

        Ok(Self {
            host: cli
                .host
                .clone()
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
            root_folder,
            database_path,
            audio_directory,
            audio_target: AudioTarget {
                bit_rate_kbps,
                codec,
            },
            yt_dlp_path: cli
                .yt_dlp_path
                .clone()
                .or(file.tools.yt_dlp_path)
                .unwrap_or_else(|| PathBuf::from("yt-dlp")),
            ffmpeg_path: cli.ffmpeg_path.clone().or(file.tools.ffmpeg_path),
            search_max_results,
            auth: AuthConfig {
                jwt_secret,
                jwt_algorithm,
                token_expiration_days,
            },
            log_level: cli
                .log_level
                .clone()
                .or(file.logging.level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// Address string for binding the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Create the root and audio directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        std::fs::create_dir_all(&self.audio_directory)?;
        if let Some(parent) = self.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

/// Parse a TOML configuration file
pub fn load_toml_file(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    let config = toml::from_str::<TomlConfig>(&content).map_err(|e| {
        Error::Config(format!("Invalid config file {}: {}", path.display(), e))
    })?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Locate the platform config file, if one exists
fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("audionest").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/audionest/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("audionest"))
        .unwrap_or_else(|| PathBuf::from("./audionest_data"))
}
