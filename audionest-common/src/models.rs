//! Domain models shared across audionest crates
//!
//! A `LibraryEntry` embeds the `AudioArtifact` it refers to by value: many
//! entries (one per user) may point at the same artifact row, and the
//! artifact itself never changes once created.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

use crate::{Error, Result};

/// Longest source identifier accepted from clients
pub const MAX_SOURCE_ID_LEN: usize = 64;

/// Audio codec an artifact is transcoded to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    Flac,
    Opus,
    Vorbis,
}

impl AudioCodec {
    /// Codec name as stored in the database and passed to the transcoder
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCodec::Flac => "flac",
            AudioCodec::Opus => "opus",
            AudioCodec::Vorbis => "vorbis",
        }
    }

    /// File extension of the container the codec is written to
    pub fn file_extension(&self) -> &'static str {
        match self {
            AudioCodec::Flac => "flac",
            AudioCodec::Opus => "opus",
            AudioCodec::Vorbis => "ogg",
        }
    }

    /// MIME type used when serving the file
    pub fn content_type(&self) -> &'static str {
        match self {
            AudioCodec::Flac => "audio/flac",
            AudioCodec::Opus => "audio/opus",
            AudioCodec::Vorbis => "audio/ogg",
        }
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioCodec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flac" => Ok(AudioCodec::Flac),
            "opus" => Ok(AudioCodec::Opus),
            "vorbis" => Ok(AudioCodec::Vorbis),
            other => Err(Error::InvalidInput(format!("Unknown audio codec '{}'", other))),
        }
    }
}

/// Transcode target configured for the whole service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioTarget {
    pub bit_rate_kbps: u32,
    pub codec: AudioCodec,
}

/// Candidate media item returned by an external search
///
/// Produced per search and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSource {
    pub id: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
}

/// Locally stored, transcoded audio for one external source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub source_id: String,
    pub file_path: PathBuf,
    pub bit_rate_kbps: u32,
    pub codec: AudioCodec,
}

impl AudioArtifact {
    /// File name offered to clients downloading the artifact
    pub fn download_name(&self) -> String {
        format!("{}.{}", self.source_id, self.codec.file_extension())
    }
}

/// A user's claim on an artifact, with display metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub artist: Option<String>,
    pub audio: AudioArtifact,
}

impl LibraryEntry {
    pub fn source_id(&self) -> &str {
        &self.audio.source_id
    }
}

/// Registered account
#[derive(Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

impl UserAccount {
    /// Create a new account with a fresh id
    pub fn new(email: impl Into<String>, hashed_password: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            hashed_password: hashed_password.into(),
        }
    }
}

// Keeps the password hash out of logs
impl fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Validate an external source identifier
///
/// Identifiers end up in file names, so only `[A-Za-z0-9_-]` is accepted.
pub fn validate_source_id(source_id: &str) -> Result<()> {
    if source_id.is_empty() || source_id.len() > MAX_SOURCE_ID_LEN {
        return Err(Error::InvalidInput(format!(
            "Source id must be 1-{} characters",
            MAX_SOURCE_ID_LEN
        )));
    }

    if !source_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::InvalidInput(format!(
            "Source id '{}' contains invalid characters",
            source_id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_parsing() {
        assert_eq!("flac".parse::<AudioCodec>().unwrap(), AudioCodec::Flac);
        assert_eq!("OPUS".parse::<AudioCodec>().unwrap(), AudioCodec::Opus);
        assert_eq!(" vorbis ".parse::<AudioCodec>().unwrap(), AudioCodec::Vorbis);
        assert!("mp3".parse::<AudioCodec>().is_err());
    }

    #[test]
    fn test_vorbis_written_as_ogg() {
        assert_eq!(AudioCodec::Vorbis.file_extension(), "ogg");
        assert_eq!(AudioCodec::Vorbis.content_type(), "audio/ogg");
        assert_eq!(AudioCodec::Vorbis.to_string(), "vorbis");
    }

    #[test]
    fn test_external_source_serializes_camel_case() {
        let source = ExternalSource {
            id: "abc".to_string(),
            name: "Song".to_string(),
            thumbnail_url: Some("http://img".to_string()),
        };

        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["thumbnailUrl"], "http://img");
        assert!(json.get("thumbnail_url").is_none());
    }

    #[test]
    fn test_source_id_validation() {
        assert!(validate_source_id("dQw4w9WgXcQ").is_ok());
        assert!(validate_source_id("a_b-c").is_ok());
        assert!(validate_source_id("").is_err());
        assert!(validate_source_id("../etc/passwd").is_err());
        assert!(validate_source_id("a b").is_err());
        assert!(validate_source_id(&"x".repeat(MAX_SOURCE_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_account_debug_hides_hash() {
        let account = UserAccount::new("a@x.com", "$argon2id$secret");
        let debug = format!("{:?}", account);
        assert!(debug.contains("a@x.com"));
        assert!(!debug.contains("argon2id"));
    }
}
