//! Transcript data model
//!
//! - Raw transcript container as returned by the video client
//! - Raw segment classification ([`segment`])
//! - Normalization into timed text segments ([`normalize`])

pub mod normalize;
pub mod segment;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use normalize::normalize;
pub use segment::RawSegment;

/// One timed caption, offsets in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub offset: f64,
    pub duration: f64,
}

/// Successful response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResponse {
    pub video_title: String,
    pub transcript: Vec<TranscriptSegment>,
}

/// Transcript container: `transcript.content.body.initial_segments`.
///
/// Every level is optional; a container with any level missing has no
/// usable transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptInfo {
    pub transcript: Option<Transcript>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    pub content: Option<TranscriptContent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptContent {
    pub body: Option<TranscriptBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptBody {
    pub initial_segments: Option<Vec<Value>>,
}

impl TranscriptInfo {
    /// Wrap a list of raw segments in a well-formed container.
    pub fn from_segments(segments: Vec<Value>) -> Self {
        Self {
            transcript: Some(Transcript {
                content: Some(TranscriptContent {
                    body: Some(TranscriptBody {
                        initial_segments: Some(segments),
                    }),
                }),
            }),
        }
    }

    /// The raw segment list, if the container is well formed.
    pub fn initial_segments(&self) -> Option<&[Value]> {
        self.transcript
            .as_ref()?
            .content
            .as_ref()?
            .body
            .as_ref()?
            .initial_segments
            .as_deref()
    }
}

/// Normalize raw segments in order, dropping those with empty text.
pub fn collect_segments(raw: &[Value]) -> Vec<TranscriptSegment> {
    raw.iter()
        .map(|value| normalize(&RawSegment::from_value(value)))
        .filter(|segment| !segment.text.is_empty())
        .collect()
}
