//! Raw caption segment shapes
//!
//! The transcript panel mixes several renderer shapes in one list. Each raw
//! JSON object is classified once, by key presence, into a [`RawSegment`]
//! variant; the normalizer then works on typed data only.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Key marking a transcript segment renderer.
pub const TRANSCRIPT_SEGMENT_KEY: &str = "transcript_segment_renderer";

/// Key marking a cue group renderer.
pub const CUE_GROUP_KEY: &str = "transcript_cue_group_renderer";

/// One formatted run of text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Run {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

/// A text object: either a flat string or a list of runs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snippet {
    #[serde(default, alias = "simple_text", deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_runs")]
    pub runs: Option<Vec<Run>>,
}

/// The `text` field of a generic segment is loosely typed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Plain(String),
    Snippet(Snippet),
    Other(Value),
}

/// `transcript_segment_renderer` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptSegmentForm {
    #[serde(default, deserialize_with = "lenient")]
    pub snippet: Option<Snippet>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_runs")]
    pub runs: Option<Vec<Run>>,
    #[serde(default, deserialize_with = "millis")]
    pub start_ms: Option<f64>,
    #[serde(default, deserialize_with = "millis")]
    pub end_ms: Option<f64>,
}

/// First cue of a `transcript_cue_group_renderer`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CueForm {
    #[serde(default, deserialize_with = "lenient")]
    pub cue: Option<Snippet>,
    #[serde(default, deserialize_with = "millis")]
    pub start_offset_ms: Option<f64>,
    #[serde(default, deserialize_with = "millis")]
    pub duration_ms: Option<f64>,
}

/// Fallback shape with loosely typed fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenericForm {
    #[serde(default)]
    pub text: Option<TextField>,
    #[serde(default, deserialize_with = "lenient_runs")]
    pub runs: Option<Vec<Run>>,
    #[serde(default, deserialize_with = "lenient")]
    pub snippet: Option<Snippet>,
    #[serde(default, deserialize_with = "millis")]
    pub start_ms: Option<f64>,
    #[serde(default, deserialize_with = "millis")]
    pub end_ms: Option<f64>,
    #[serde(default, deserialize_with = "millis")]
    pub duration_ms: Option<f64>,
}

/// A raw caption segment, discriminated by which renderer key is present.
#[derive(Debug, Clone)]
pub enum RawSegment {
    TranscriptSegment(TranscriptSegmentForm),
    CueGroup(CueForm),
    Generic(GenericForm),
}

impl RawSegment {
    /// Classify a raw JSON segment.
    ///
    /// A transcript segment renderer takes precedence over a cue group; a cue
    /// group without any cue falls through to the generic shape. Fields of an
    /// unexpected type are read as absent, and a payload that is not an
    /// object at all becomes an empty segment of its shape.
    pub fn from_value(value: &Value) -> Self {
        if let Some(inner) = value.get(TRANSCRIPT_SEGMENT_KEY) {
            return Self::TranscriptSegment(decode_or_default(inner));
        }

        let first_cue = value
            .get(CUE_GROUP_KEY)
            .and_then(|group| group.pointer("/cues/0/transcript_cue_renderer"))
            .filter(|cue| cue.is_object());
        if let Some(cue) = first_cue {
            return Self::CueGroup(decode_or_default(cue));
        }

        Self::Generic(decode_or_default(value))
    }
}

fn decode_or_default<T>(value: &Value) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    match T::deserialize(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!("Unrecognised segment payload: {}", e);
            T::default()
        }
    }
}

/// Optional field that reads as `None` when it has an unexpected type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| T::deserialize(value).ok()))
}

/// Run list that skips entries which are not run objects.
fn lenient_runs<'de, D>(deserializer: D) -> Result<Option<Vec<Run>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| Run::deserialize(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// Millisecond fields arrive as decimal strings, sometimes as numbers.
/// Anything that does not parse becomes NaN.
fn millis<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(parse_millis(&s)),
        Some(Value::Number(n)) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Some(_) => Some(f64::NAN),
    })
}

fn parse_millis(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Concatenate the text of every run.
pub fn join_runs(runs: &[Run]) -> String {
    runs.iter().filter_map(|run| run.text.as_deref()).collect()
}
