//! yt-dlp adapters for the external video platform
//!
//! yt-dlp is run as a child process off the async runtime. It drives ffmpeg
//! itself for transcoding, so ffmpeg only needs to be locatable by yt-dlp.

pub mod download;
pub mod search;

pub use download::YtDlpDownloader;
pub use search::YtDlpSearcher;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

use crate::{Error, Result};

/// Run yt-dlp to completion and return its captured output
///
/// Spawn failures and non-zero exits are both reported as `ExternalTool`,
/// the latter with yt-dlp's stderr.
pub(crate) async fn run_yt_dlp(binary: &Path, args: Vec<OsString>) -> Result<Output> {
    debug!(binary = %binary.display(), ?args, "Running yt-dlp");

    let output = tokio::task::spawn_blocking({
        let binary: PathBuf = binary.to_path_buf();
        move || Command::new(&binary).args(&args).output()
    })
    .await
    .map_err(|e| Error::ExternalTool(format!("Task join error: {}", e)))?
    .map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ExternalTool(format!("yt-dlp not found at '{}'", binary.display()))
        } else {
            Error::ExternalTool(format!("Failed to start yt-dlp: {}", e))
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::ExternalTool(format!(
            "yt-dlp exited with code {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_external_tool_error() {
        let result = run_yt_dlp(Path::new("/nonexistent/yt-dlp-binary"), vec![]).await;
        match result {
            Err(Error::ExternalTool(msg)) => assert!(msg.contains("not found")),
            other => panic!("Expected ExternalTool error, got {:?}", other),
        }
    }
}
