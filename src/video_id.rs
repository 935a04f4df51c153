//! Video identifier extraction
//!
//! Accepts either a bare 11-character video id or one of the URL shapes
//! YouTube hands out (`youtu.be/ID`, `/watch?v=ID`, `/embed/ID`, `/shorts/ID`).

use url::Url;

/// Length of a canonical YouTube video id.
const VIDEO_ID_LEN: usize = 11;

/// Extract a video id from a bare id or a YouTube URL.
///
/// Returns `None` when the input is neither a bare id nor a recognised URL.
pub fn extract_video_id(input: &str) -> Option<String> {
    if input.chars().count() == VIDEO_ID_LEN && !input.contains('/') && !input.contains('?') {
        return Some(input.to_string());
    }

    let url = Url::parse(input).ok()?;

    let id = match url.host_str()? {
        "youtu.be" => url.path().trim_start_matches('/').to_string(),
        "youtube.com" | "www.youtube.com" => {
            let path = url.path();
            if path == "/watch" {
                url.query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())?
            } else if let Some(rest) = path.strip_prefix("/embed/") {
                rest.to_string()
            } else if let Some(rest) = path.strip_prefix("/shorts/") {
                rest.to_string()
            } else {
                return None;
            }
        }
        _ => return None,
    };

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
