//! Streaming audio artifacts to clients

use audionest_common::models::AudioArtifact;
use axum::{
    body::Body,
    http::header,
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

use crate::Result;

/// Stream an artifact's file as an attachment named `<source>.<ext>`
pub async fn audio_file_response(artifact: &AudioArtifact) -> Result<Response> {
    let file = tokio::fs::File::open(&artifact.file_path).await?;
    let length = file.metadata().await?.len();

    let headers = [
        (header::CONTENT_TYPE, artifact.codec.content_type().to_string()),
        (header::CONTENT_LENGTH, length.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.download_name()),
        ),
    ];

    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}
