//! Shared fixtures for audionest-server integration tests

#![allow(dead_code)]

use argon2::Params;
use async_trait::async_trait;
use audionest_common::config::{CliArgs, Config, TomlConfig};
use audionest_common::db::init_memory_database;
use audionest_common::models::{AudioTarget, ExternalSource};
use audionest_server::services::container::Capabilities;
use audionest_server::services::PasswordHasher;
use audionest_server::traits::{AudioDownloader, AudioSourceSearcher};
use audionest_server::{build_router, AppState, Error, Result, ServiceContainer};
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Searcher returning a fixed result list for any query
pub struct FakeSearcher {
    pub results: Vec<ExternalSource>,
}

#[async_trait]
impl AudioSourceSearcher for FakeSearcher {
    async fn search(&self, _query: &str) -> Result<Vec<ExternalSource>> {
        Ok(self.results.clone())
    }
}

/// Downloader writing `audio-<source_id>` to the destination, counting calls
#[derive(Default)]
pub struct FakeDownloader {
    calls: AtomicUsize,
}

impl FakeDownloader {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioDownloader for FakeDownloader {
    async fn download(&self, source_id: &str, destination: &Path, _target: AudioTarget) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if source_id == "unavailable" {
            return Err(Error::ExternalTool("Video unavailable".to_string()));
        }
        tokio::fs::write(destination, format!("audio-{}", source_id)).await?;
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub downloader: Arc<FakeDownloader>,
    pub config: Config,
    _root: TempDir,
}

/// App over an in-memory database and a temporary audio directory
pub async fn setup_app() -> TestApp {
    let root = TempDir::new().unwrap();
    let cli = CliArgs {
        root_folder: Some(root.path().to_path_buf()),
        ..Default::default()
    };
    let config = Config::from_sources(&cli, TomlConfig::default()).unwrap();

    let downloader = Arc::new(FakeDownloader::default());
    let capabilities = Capabilities {
        searcher: Arc::new(FakeSearcher {
            results: vec![
                ExternalSource {
                    id: "v1".to_string(),
                    name: "First Song".to_string(),
                    thumbnail_url: Some("https://img.example/v1.jpg".to_string()),
                },
                ExternalSource {
                    id: "v2".to_string(),
                    name: "Second Song".to_string(),
                    thumbnail_url: None,
                },
            ],
        }),
        downloader: downloader.clone(),
        password_hasher: PasswordHasher::with_params(Params::new(1024, 1, 1, None).unwrap()),
    };

    let pool = init_memory_database().await.unwrap();
    let services =
        ServiceContainer::with_capabilities(&config, pool, "integration-test-secret", capabilities)
            .unwrap();

    TestApp {
        router: build_router(AppState::new(services)),
        downloader,
        config,
        _root: root,
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form_request(uri: &str, username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={}&password={}", username, password)))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

pub async fn extract_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).expect("Should parse JSON")
}
