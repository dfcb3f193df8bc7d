//! Audio download and transcode through yt-dlp

use async_trait::async_trait;
use audionest_common::models::AudioTarget;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

use super::run_yt_dlp;
use crate::traits::AudioDownloader;
use crate::{Error, Result};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

pub struct YtDlpDownloader {
    binary: PathBuf,
    ffmpeg_path: Option<PathBuf>,
}

impl YtDlpDownloader {
    pub fn new(binary: PathBuf, ffmpeg_path: Option<PathBuf>) -> Self {
        Self { binary, ffmpeg_path }
    }

    fn args(&self, source_id: &str, destination: &Path, target: AudioTarget) -> Vec<OsString> {
        // yt-dlp picks the final extension itself after extraction
        let mut template = destination.with_extension("").into_os_string();
        template.push(".%(ext)s");

        let mut args: Vec<OsString> = vec![
            "--ignore-config".into(),
            "--no-playlist".into(),
            "--no-progress".into(),
            "--no-check-certificates".into(),
            "-f".into(),
            "bestaudio/best".into(),
            "-x".into(),
            "--audio-format".into(),
            target.codec.as_str().into(),
            "--audio-quality".into(),
            format!("{}K", target.bit_rate_kbps).into(),
        ];

        if let Some(ffmpeg) = &self.ffmpeg_path {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.clone().into_os_string());
        }

        args.push("-o".into());
        args.push(template);
        args.push("--".into());
        args.push(format!("{}{}", WATCH_URL, source_id).into());
        args
    }
}

#[async_trait]
impl AudioDownloader for YtDlpDownloader {
    async fn download(&self, source_id: &str, destination: &Path, target: AudioTarget) -> Result<()> {
        info!(
            "Downloading '{}' as {} at {} kbps",
            source_id, target.codec, target.bit_rate_kbps
        );

        run_yt_dlp(&self.binary, self.args(source_id, destination, target)).await?;

        if !tokio::fs::try_exists(destination).await? {
            return Err(Error::ExternalTool(format!(
                "yt-dlp finished but '{}' was not produced",
                destination.display()
            )));
        }

        info!("Downloaded '{}' to {}", source_id, destination.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audionest_common::models::AudioCodec;

    fn target() -> AudioTarget {
        AudioTarget {
            bit_rate_kbps: 192,
            codec: AudioCodec::Vorbis,
        }
    }

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_extraction_arguments() {
        let downloader = YtDlpDownloader::new(PathBuf::from("yt-dlp"), None);
        let args = strings(downloader.args("abc123", Path::new("/audio/abc123.ogg"), target()));

        let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
        assert_eq!(args[pos("--audio-format") + 1], "vorbis");
        assert_eq!(args[pos("--audio-quality") + 1], "192K");
        assert_eq!(args[pos("-f") + 1], "bestaudio/best");
        assert_eq!(args[pos("-o") + 1], "/audio/abc123.%(ext)s");
        assert_eq!(args.last().unwrap(), "https://www.youtube.com/watch?v=abc123");
        assert!(!args.contains(&"--ffmpeg-location".to_string()));
    }

    #[test]
    fn test_ffmpeg_location_passed_through() {
        let downloader = YtDlpDownloader::new(
            PathBuf::from("yt-dlp"),
            Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")),
        );
        let args = strings(downloader.args("abc123", Path::new("/audio/abc123.ogg"), target()));

        let pos = args.iter().position(|a| a == "--ffmpeg-location").unwrap();
        assert_eq!(args[pos + 1], "/opt/ffmpeg/bin/ffmpeg");
    }
}
