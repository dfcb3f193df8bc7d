//! Platform search through yt-dlp's `ytsearch` extractor

use async_trait::async_trait;
use audionest_common::models::ExternalSource;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

use super::run_yt_dlp;
use crate::traits::AudioSourceSearcher;
use crate::{Error, Result};

pub struct YtDlpSearcher {
    binary: PathBuf,
    max_results: usize,
}

impl YtDlpSearcher {
    pub fn new(binary: PathBuf, max_results: usize) -> Self {
        Self { binary, max_results }
    }

    fn args(&self, query: &str) -> Vec<OsString> {
        vec![
            "--ignore-config".into(),
            "--flat-playlist".into(),
            "--dump-json".into(),
            "--no-warnings".into(),
            format!("ytsearch{}:{}", self.max_results, query).into(),
        ]
    }
}

/// One line of `--flat-playlist --dump-json` output
#[derive(Debug, Deserialize)]
struct FlatEntry {
    id: String,
    title: Option<String>,
    #[serde(default)]
    thumbnails: Vec<Thumbnail>,
    thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// Parse yt-dlp's JSON-lines output into search results
pub(crate) fn parse_search_output(stdout: &str) -> Result<Vec<ExternalSource>> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let entry: FlatEntry = serde_json::from_str(line)
                .map_err(|e| Error::ExternalTool(format!("Invalid yt-dlp search output: {}", e)))?;

            let thumbnail_url = entry
                .thumbnails
                .into_iter()
                .next()
                .map(|t| t.url)
                .or(entry.thumbnail);

            Ok(ExternalSource {
                name: entry.title.unwrap_or_else(|| entry.id.clone()),
                id: entry.id,
                thumbnail_url,
            })
        })
        .collect()
}

#[async_trait]
impl AudioSourceSearcher for YtDlpSearcher {
    async fn search(&self, query: &str) -> Result<Vec<ExternalSource>> {
        let output = run_yt_dlp(&self.binary, self.args(query)).await?;
        let results = parse_search_output(&String::from_utf8_lossy(&output.stdout))?;
        debug!("yt-dlp returned {} results for '{}'", results.len(), query);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_playlist_lines() {
        let stdout = r#"
{"id": "abc123", "title": "First", "thumbnails": [{"url": "https://i.ytimg.com/a.jpg", "height": 90}]}

{"id": "def456", "title": "Second", "thumbnails": []}
{"id": "ghi789", "thumbnail": "https://i.ytimg.com/c.jpg"}
"#;

        let results = parse_search_output(stdout).unwrap();
        assert_eq!(results.len(), 3);

        assert_eq!(results[0].id, "abc123");
        assert_eq!(results[0].name, "First");
        assert_eq!(results[0].thumbnail_url.as_deref(), Some("https://i.ytimg.com/a.jpg"));

        assert_eq!(results[1].thumbnail_url, None);

        // No title: the id stands in for the name
        assert_eq!(results[2].name, "ghi789");
        assert_eq!(results[2].thumbnail_url.as_deref(), Some("https://i.ytimg.com/c.jpg"));
    }

    #[test]
    fn test_empty_output_is_no_results() {
        assert!(parse_search_output("").unwrap().is_empty());
        assert!(parse_search_output("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_garbage_output_is_error() {
        assert!(matches!(
            parse_search_output("not json"),
            Err(Error::ExternalTool(_))
        ));
    }

    #[test]
    fn test_query_is_single_search_argument() {
        let searcher = YtDlpSearcher::new(PathBuf::from("yt-dlp"), 20);
        let args = searcher.args("--exec rm");
        assert_eq!(args.last().unwrap(), "ytsearch20:--exec rm");
    }
}
