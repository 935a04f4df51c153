//! Test fixtures for integration tests
//!
//! Stub video client and rate limiter so the full request path can run
//! without network access.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::ServerConfig;
use crate::limits::{LimitOutcome, LimiterError, RateLimiter};
use crate::state::AppState;
use crate::transcript::TranscriptInfo;
use crate::youtube::{ClientError, VideoClient, VideoInfo};

/// What the stub client returns.
#[derive(Debug, Clone)]
pub enum StubOutcome {
    /// A well-formed container with these raw segments
    Segments(Vec<Value>),
    /// A container without `initial_segments`
    NoContainer,
    /// `get_info` fails with this message
    InfoError(String),
    /// `get_transcript` fails with this message
    TranscriptError(String),
    /// `get_info` fails with a JSON decode error
    MalformedJson,
}

/// Video client returning canned data.
pub struct StubClient {
    pub title: Option<String>,
    pub outcome: StubOutcome,
    pub info_calls: AtomicUsize,
    pub requested_ids: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn new(title: Option<&str>, outcome: StubOutcome) -> Arc<Self> {
        Arc::new(Self {
            title: title.map(str::to_string),
            outcome,
            info_calls: AtomicUsize::new(0),
            requested_ids: Mutex::new(Vec::new()),
        })
    }

    /// Two valid segments titled "Rick Astley - Never Gonna Give You Up".
    pub fn two_segments() -> Arc<Self> {
        Self::new(
            Some("Rick Astley - Never Gonna Give You Up"),
            StubOutcome::Segments(vec![
                segment("0", "1500", "We&#39;re no strangers"),
                segment("1500", "4000", "to love"),
            ]),
        )
    }

    pub fn empty() -> Arc<Self> {
        Self::new(None, StubOutcome::Segments(Vec::new()))
    }

    pub fn calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }
}

/// A raw transcript segment renderer with snippet runs.
pub fn segment(start_ms: &str, end_ms: &str, text: &str) -> Value {
    json!({
        "transcript_segment_renderer": {
            "start_ms": start_ms,
            "end_ms": end_ms,
            "snippet": { "runs": [{ "text": text }] }
        }
    })
}

#[async_trait]
impl VideoClient for StubClient {
    async fn get_info(&self, video_id: &str) -> Result<VideoInfo, ClientError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_ids
            .lock()
            .unwrap()
            .push(video_id.to_string());

        match &self.outcome {
            StubOutcome::InfoError(message) => Err(ClientError::Upstream(message.clone())),
            StubOutcome::MalformedJson => Err(ClientError::Json(
                serde_json::from_str::<Value>("<!DOCTYPE html>").unwrap_err(),
            )),
            _ => Ok(VideoInfo {
                video_id: video_id.to_string(),
                title: self.title.clone(),
                transcript_params: Some("stub".to_string()),
            }),
        }
    }

    async fn get_transcript(&self, _info: &VideoInfo) -> Result<TranscriptInfo, ClientError> {
        match &self.outcome {
            StubOutcome::Segments(segments) => Ok(TranscriptInfo::from_segments(segments.clone())),
            StubOutcome::NoContainer => Ok(TranscriptInfo::default()),
            StubOutcome::TranscriptError(message) => Err(ClientError::Upstream(message.clone())),
            StubOutcome::InfoError(_) | StubOutcome::MalformedJson => {
                unreachable!("get_info fails first")
            }
        }
    }
}

/// Rate limiter with a fixed answer that records the keys it saw.
pub struct StubLimiter {
    pub success: bool,
    pub fail: bool,
    pub keys: Mutex<Vec<String>>,
}

impl StubLimiter {
    fn new(success: bool, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            success,
            fail,
            keys: Mutex::new(Vec::new()),
        })
    }

    pub fn allow() -> Arc<Self> {
        Self::new(true, false)
    }

    pub fn deny() -> Arc<Self> {
        Self::new(false, false)
    }

    /// A limiter whose backend is down.
    pub fn broken() -> Arc<Self> {
        Self::new(false, true)
    }

    pub fn seen_keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateLimiter for StubLimiter {
    async fn limit(&self, key: &str) -> Result<LimitOutcome, LimiterError> {
        self.keys.lock().unwrap().push(key.to_string());
        if self.fail {
            return Err(LimiterError("backend unreachable".to_string()));
        }
        Ok(LimitOutcome {
            success: self.success,
        })
    }
}

/// Application state wired with stubs and the default configuration.
pub fn test_state(client: Arc<StubClient>, limiter: Arc<StubLimiter>) -> Arc<AppState> {
    Arc::new(AppState::new(ServerConfig::default(), client, limiter))
}
