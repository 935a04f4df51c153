//! HTTP request handlers
//!
//! `GET /?id=<videoIdOrUrl>` runs, in order: rate limit check, input
//! validation, id extraction, upstream fetch, normalization.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::entities;
use crate::error::FetchErrorKind;
use crate::state::AppState;
use crate::transcript::{collect_segments, TranscriptResponse};
use crate::video_id::extract_video_id;
use crate::youtube::ClientError;

/// Rate limit key used when the client IP header is missing.
pub const UNKNOWN_CLIENT: &str = "unknown";

pub const MSG_RATE_LIMITED: &str = "Rate limit exceeded. Please try again in a minute.";
pub const MSG_MISSING_ID: &str = "Video ID or URL is required (query param: 'id')";
pub const MSG_INVALID_ID: &str = "Invalid YouTube Video ID or URL format";
pub const MSG_NO_TRANSCRIPT: &str = "No transcript available for this video.";

/// HTTP error type
#[derive(Debug)]
pub enum ApiError {
    RateLimited,
    MissingId,
    InvalidId,
    NoTranscript { video_title: Option<String> },
    Fetch { kind: FetchErrorKind, video_id: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    video_title: Option<String>,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_id: Option<String>,
}

impl ErrorBody {
    fn new(error: &'static str) -> Self {
        Self {
            video_title: None,
            error,
            video_id: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, ErrorBody::new(MSG_RATE_LIMITED)),
            ApiError::MissingId => (StatusCode::BAD_REQUEST, ErrorBody::new(MSG_MISSING_ID)),
            ApiError::InvalidId => (StatusCode::BAD_REQUEST, ErrorBody::new(MSG_INVALID_ID)),
            ApiError::NoTranscript { video_title } => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    video_title,
                    ..ErrorBody::new(MSG_NO_TRANSCRIPT)
                },
            ),
            ApiError::Fetch { kind, video_id } => (
                kind.status(),
                ErrorBody {
                    video_id: Some(video_id),
                    ..ErrorBody::new(kind.message())
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl ApiError {
    /// Classify a failed upstream fetch.
    fn fetch(err: ClientError, video_id: &str) -> Self {
        let kind = FetchErrorKind::classify(&err);
        tracing::error!(
            "Error fetching transcript for {}: {} ({:?}) -> {:?}",
            video_id,
            err,
            err,
            kind
        );
        ApiError::Fetch {
            kind,
            video_id: video_id.to_string(),
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Version endpoint
pub async fn version_check() -> &'static str {
    concat!("yt-transcript-server v", env!("CARGO_PKG_VERSION"))
}

/// Transcript endpoint
/// GET /?id=<videoIdOrUrl>
pub async fn get_transcript(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let key = client_key(&headers, &state.config.client_ip_header);

    match state.limiter.limit(&key).await {
        Ok(outcome) if !outcome.success => {
            tracing::warn!("Rate limit exceeded for {}", key);
            return Err(ApiError::RateLimited);
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Rate limiter unavailable, admitting {}: {}", key, e),
    }

    let input = params
        .get("id")
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingId)?;

    let video_id = extract_video_id(input).ok_or_else(|| {
        tracing::info!("Rejected unrecognised id {:?}", input);
        ApiError::InvalidId
    })?;

    tracing::info!("Processing transcript request for video {}", video_id);

    let info = state
        .client
        .get_info(&video_id)
        .await
        .map_err(|e| ApiError::fetch(e, &video_id))?;

    let transcript = state
        .client
        .get_transcript(&info)
        .await
        .map_err(|e| ApiError::fetch(e, &video_id))?;

    let video_title = info.title.as_deref().map(|t| entities::decode(Some(t)));

    let Some(raw_segments) = transcript.initial_segments() else {
        tracing::info!("No transcript container for video {}", video_id);
        return Err(ApiError::NoTranscript { video_title });
    };

    let segments = collect_segments(raw_segments);
    tracing::debug!(
        "Video {}: {} of {} segments kept",
        video_id,
        segments.len(),
        raw_segments.len()
    );

    Ok(Json(TranscriptResponse {
        video_title: video_title.unwrap_or_default(),
        transcript: segments,
    }))
}

/// Rate limit key for a request: the first address in the client IP header.
pub fn client_key(headers: &HeaderMap, header_name: &str) -> String {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
