//! HTML entity decoding for caption text and titles
//!
//! YouTube escapes a handful of characters in caption snippets. Only this
//! fixed set is decoded; anything else is passed through untouched.

/// Entities replaced by [`decode`], applied in this order.
const ENTITIES: [(&str, &str); 6] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
];

/// Decode the known HTML entities in `text`.
///
/// `None` and the empty string both decode to an empty string.
pub fn decode(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, literal)| {
            if acc.contains(entity) {
                acc.replace(entity, literal)
            } else {
                acc
            }
        })
}
