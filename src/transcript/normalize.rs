//! Segment normalization
//!
//! Maps every [`RawSegment`] variant onto a [`TranscriptSegment`] with
//! decoded text and second-based timing.

use super::segment::{
    join_runs, CueForm, GenericForm, RawSegment, Snippet, TextField, TranscriptSegmentForm,
};
use super::TranscriptSegment;
use crate::entities;

/// Normalize one raw segment. Empty text is kept; filtering is up to the caller.
pub fn normalize(segment: &RawSegment) -> TranscriptSegment {
    let (text, offset, duration) = match segment {
        RawSegment::TranscriptSegment(form) => transcript_segment(form),
        RawSegment::CueGroup(cue) => cue_group(cue),
        RawSegment::Generic(form) => generic(form),
    };

    TranscriptSegment {
        text: entities::decode(Some(text.as_str())),
        offset,
        duration,
    }
}

fn transcript_segment(form: &TranscriptSegmentForm) -> (String, f64, f64) {
    let snippet = form.snippet.as_ref();
    let text = first_non_empty([
        snippet.and_then(|s| s.text.clone()),
        form.text.clone(),
        snippet.and_then(|s| s.runs.as_deref()).map(join_runs),
        form.runs.as_deref().map(join_runs),
    ]);

    let start = form.start_ms.unwrap_or(0.0);
    let end = form.end_ms.unwrap_or(0.0);

    (text, start / 1000.0, (end - start) / 1000.0)
}

fn cue_group(cue: &CueForm) -> (String, f64, f64) {
    let text = cue.cue.as_ref().map(snippet_text).unwrap_or_default();
    let offset = cue.start_offset_ms.unwrap_or(0.0) / 1000.0;
    let duration = cue.duration_ms.unwrap_or(0.0) / 1000.0;

    (text, offset, duration)
}

fn generic(form: &GenericForm) -> (String, f64, f64) {
    let text = match (&form.text, &form.runs, &form.snippet) {
        (Some(TextField::Plain(text)), _, _) => text.clone(),
        (Some(TextField::Snippet(snippet)), _, _) => snippet_text(snippet),
        (_, Some(runs), _) => join_runs(runs),
        (_, _, Some(snippet)) => snippet_text(snippet),
        _ => String::new(),
    };

    let offset = form.start_ms.map_or(0.0, |start| start / 1000.0);

    let duration = match (form.duration_ms, form.start_ms, form.end_ms) {
        (Some(duration), _, _) => duration / 1000.0,
        (None, Some(start), Some(end)) => (end - start) / 1000.0,
        _ => 0.0,
    };

    (text, offset, duration)
}

/// A text object's flat text, else its joined runs.
fn snippet_text(snippet: &Snippet) -> String {
    first_non_empty([
        snippet.text.clone(),
        snippet.runs.as_deref().map(join_runs),
    ])
}

fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}
