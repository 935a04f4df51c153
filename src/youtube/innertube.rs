//! InnerTube client
//!
//! Three calls per transcript:
//! - `player` for the title and playability status
//! - `next` for the transcript engagement panel token
//! - `get_transcript` for the segment list
//!
//! Response keys are converted to snake_case before they reach the
//! transcript model.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::{ClientError, VideoClient, VideoInfo};
use crate::config::YoutubeConfig;
use crate::transcript::TranscriptInfo;

/// Engagement panel holding the transcript.
const TRANSCRIPT_PANEL_ID: &str = "engagement-panel-searchable-transcript";

/// Location of the transcript search panel in a snake_cased
/// `get_transcript` response.
const SEARCH_PANEL_PTR: &str =
    "/actions/0/update_engagement_panel_action/content/transcript_renderer/content/transcript_search_panel_renderer";

/// InnerTube HTTP client.
#[derive(Clone)]
pub struct InnerTubeClient {
    http: reqwest::Client,
    config: YoutubeConfig,
}

impl InnerTubeClient {
    /// Create a new client from configuration.
    pub fn new(config: &YoutubeConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    fn context(&self) -> Value {
        json!({
            "client": {
                "clientName": self.config.client_name,
                "clientVersion": self.config.client_version,
                "hl": self.config.language,
            }
        })
    }

    /// POST a body to an InnerTube endpoint and decode the JSON response.
    async fn post(&self, endpoint: &str, body: Value) -> Result<Value, ClientError> {
        let url = format!(
            "{}/youtubei/v1/{}?prettyPrint=false",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        );
        tracing::debug!("POST {}", url);

        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl VideoClient for InnerTubeClient {
    async fn get_info(&self, video_id: &str) -> Result<VideoInfo, ClientError> {
        let player = self
            .post(
                "player",
                json!({ "context": self.context(), "videoId": video_id }),
            )
            .await?;

        if let Some(err) = playability_error(&player) {
            return Err(err);
        }

        let next = self
            .post(
                "next",
                json!({ "context": self.context(), "videoId": video_id }),
            )
            .await?;

        Ok(VideoInfo {
            video_id: video_id.to_string(),
            title: video_title(&player),
            transcript_params: transcript_params(&next),
        })
    }

    async fn get_transcript(&self, info: &VideoInfo) -> Result<TranscriptInfo, ClientError> {
        tracing::debug!("Fetching transcript panel for {}", info.video_id);
        let params = info.transcript_params.as_deref().ok_or_else(|| {
            ClientError::Upstream("Transcripts are not available for this video".to_string())
        })?;

        let response = self
            .post(
                "get_transcript",
                json!({ "context": self.context(), "params": params }),
            )
            .await?;

        Ok(to_transcript_info(response))
    }
}

/// Map a non-playable `player` response to an error with YouTube's reason.
///
/// Live and upcoming broadcasts can report `OK` playability while having no
/// transcript; `videoDetails` flags decide those.
fn playability_error(player: &Value) -> Option<ClientError> {
    let status = player
        .pointer("/playabilityStatus/status")
        .and_then(Value::as_str)?;

    if status == "OK" {
        return broadcast_state(player).map(ClientError::Upstream);
    }

    let reason = player
        .pointer("/playabilityStatus/reason")
        .and_then(Value::as_str)
        .or_else(|| {
            player
                .pointer("/playabilityStatus/messages/0")
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .or_else(|| broadcast_state(player))
        .unwrap_or_else(|| match status {
            "LIVE_STREAM_OFFLINE" => "This live event has not started yet".to_string(),
            _ => format!("Video unavailable ({})", status),
        });

    Some(ClientError::Upstream(reason))
}

/// Describe a live or upcoming broadcast from `videoDetails`.
fn broadcast_state(player: &Value) -> Option<String> {
    let flag = |name: &str| {
        player
            .pointer(&format!("/videoDetails/{}", name))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    };

    if flag("isLive") {
        Some("This video is a live stream".to_string())
    } else if flag("isUpcoming") && flag("isLiveContent") {
        Some("This live stream has not started yet".to_string())
    } else if flag("isUpcoming") {
        Some("This video is a premiere that has not aired yet".to_string())
    } else {
        None
    }
}

fn video_title(player: &Value) -> Option<String> {
    player
        .pointer("/videoDetails/title")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Find the `getTranscriptEndpoint` params in a `next` response.
fn transcript_params(next: &Value) -> Option<String> {
    next.get("engagementPanels")?
        .as_array()?
        .iter()
        .filter_map(|panel| panel.get("engagementPanelSectionListRenderer"))
        .find(|renderer| {
            renderer.get("panelIdentifier").and_then(Value::as_str) == Some(TRANSCRIPT_PANEL_ID)
        })?
        .pointer("/content/continuationItemRenderer/continuationEndpoint/getTranscriptEndpoint/params")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Convert a raw `get_transcript` response into the transcript container.
fn to_transcript_info(response: Value) -> TranscriptInfo {
    let response = snake_case_keys(response);

    response
        .pointer(SEARCH_PANEL_PTR)
        .and_then(|panel| panel.pointer("/body/transcript_segment_list_renderer/initial_segments"))
        .and_then(Value::as_array)
        .map(|segments| TranscriptInfo::from_segments(segments.clone()))
        .unwrap_or_default()
}

/// Recursively rename object keys from camelCase to snake_case.
fn snake_case_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (to_snake_case(&key), snake_case_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(snake_case_keys).collect()),
        other => other,
    }
}

fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
