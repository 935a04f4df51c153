//! Video client
//!
//! The [`VideoClient`] trait is the seam between the request handler and
//! whatever talks to YouTube. [`InnerTubeClient`] implements it over the
//! InnerTube JSON API.

pub mod innertube;

use async_trait::async_trait;
use thiserror::Error;

use crate::transcript::TranscriptInfo;

pub use innertube::InnerTubeClient;

/// Errors raised by a video client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Upstream returned HTTP {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    /// Failure reported by YouTube itself, carrying its reason text.
    #[error("{0}")]
    Upstream(String),
}

/// Metadata for one video, fetched fresh per request.
#[derive(Debug, Clone, Default)]
pub struct VideoInfo {
    pub video_id: String,
    pub title: Option<String>,
    /// Opaque token needed to request the transcript panel.
    pub transcript_params: Option<String>,
}

/// Fetches video metadata and raw transcripts.
#[async_trait]
pub trait VideoClient: Send + Sync {
    async fn get_info(&self, video_id: &str) -> Result<VideoInfo, ClientError>;

    async fn get_transcript(&self, info: &VideoInfo) -> Result<TranscriptInfo, ClientError>;
}
