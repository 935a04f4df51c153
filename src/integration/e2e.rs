//! End-to-end tests of `GET /?id=` through the router

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

use crate::http::create_router;
use crate::http::handlers::{
    MSG_INVALID_ID, MSG_MISSING_ID, MSG_NO_TRANSCRIPT, MSG_RATE_LIMITED, UNKNOWN_CLIENT,
};
use crate::integration::fixtures::{segment, test_state, StubClient, StubLimiter, StubOutcome};

async fn send(
    client: Arc<StubClient>,
    limiter: Arc<StubLimiter>,
    uri: &str,
) -> (StatusCode, Value) {
    let app = create_router(test_state(client, limiter));
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("cf-connecting-ip", "198.51.100.23")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_transcript_success() {
    let client = StubClient::two_segments();
    let (status, body) = send(client.clone(), StubLimiter::allow(), "/?id=dQw4w9WgXcQ").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "videoTitle": "Rick Astley - Never Gonna Give You Up",
            "transcript": [
                { "text": "We're no strangers", "offset": 0.0, "duration": 1.5 },
                { "text": "to love", "offset": 1.5, "duration": 2.5 }
            ]
        })
    );
    assert_eq!(*client.requested_ids.lock().unwrap(), vec!["dQw4w9WgXcQ"]);
}

#[tokio::test]
async fn test_url_input_is_extracted() {
    let client = StubClient::two_segments();
    let (status, _) = send(
        client.clone(),
        StubLimiter::allow(),
        "/?id=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DdQw4w9WgXcQ%26t%3D10",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(*client.requested_ids.lock().unwrap(), vec!["dQw4w9WgXcQ"]);
}

#[tokio::test]
async fn test_missing_id() {
    for uri in ["/", "/?id=", "/?other=1"] {
        let client = StubClient::two_segments();
        let (status, body) = send(client.clone(), StubLimiter::allow(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body, json!({ "error": MSG_MISSING_ID }));
        assert_eq!(client.calls(), 0);
    }
}

#[tokio::test]
async fn test_invalid_id() {
    let client = StubClient::two_segments();
    let (status, body) = send(
        client.clone(),
        StubLimiter::allow(),
        "/?id=https%3A%2F%2Fvimeo.com%2F12345",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": MSG_INVALID_ID }));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_rate_limited_skips_client() {
    let limiter = StubLimiter::deny();
    for uri in ["/?id=dQw4w9WgXcQ", "/", "/?id=garbage"] {
        let client = StubClient::two_segments();
        let (status, body) = send(client.clone(), limiter.clone(), uri).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body, json!({ "error": MSG_RATE_LIMITED }));
        assert_eq!(client.calls(), 0);
    }
    assert_eq!(limiter.seen_keys(), vec!["198.51.100.23"; 3]);
}

#[tokio::test]
async fn test_missing_ip_header_uses_placeholder_key() {
    let limiter = StubLimiter::allow();
    let app = create_router(test_state(StubClient::two_segments(), limiter.clone()));
    let response = app
        .oneshot(Request::builder().uri("/?id=dQw4w9WgXcQ").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(limiter.seen_keys(), vec![UNKNOWN_CLIENT]);
}

#[tokio::test]
async fn test_limiter_failure_admits_request() {
    let (status, _) = send(
        StubClient::two_segments(),
        StubLimiter::broken(),
        "/?id=dQw4w9WgXcQ",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_no_transcript_container() {
    let client = StubClient::new(Some("Silent &amp; Still"), StubOutcome::NoContainer);
    let (status, body) = send(client, StubLimiter::allow(), "/?id=dQw4w9WgXcQ").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "videoTitle": "Silent & Still", "error": MSG_NO_TRANSCRIPT })
    );
}

#[tokio::test]
async fn test_empty_segments_are_dropped() {
    let client = StubClient::new(
        Some("Title"),
        StubOutcome::Segments(vec![
            segment("0", "1000", "first"),
            segment("1000", "2000", ""),
            json!({ "transcript_section_header_renderer": { "start_ms": "2000" } }),
            segment("2000", "3000", "last"),
        ]),
    );
    let (status, body) = send(client, StubLimiter::allow(), "/?id=dQw4w9WgXcQ").await;

    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = body["transcript"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["first", "last"]);
}

#[tokio::test]
async fn test_fetch_error_classification() {
    let cases = [
        (StubOutcome::InfoError("This video is private".into()), 403),
        (StubOutcome::InfoError("Video unavailable".into()), 403),
        (StubOutcome::InfoError("This live event will begin in 2 hours.".into()), 403),
        (StubOutcome::InfoError("Premieres in 3 days".into()), 403),
        (
            StubOutcome::InfoError(
                "The uploader has not made this video available in your country".into(),
            ),
            451,
        ),
        (
            StubOutcome::TranscriptError("Transcripts are not available for this video".into()),
            404,
        ),
        (StubOutcome::MalformedJson, 500),
        (StubOutcome::TranscriptError("socket hang up".into()), 500),
    ];

    for (outcome, expected) in cases {
        let label = format!("{:?}", outcome);
        let client = StubClient::new(Some("Title"), outcome);
        let (status, body) = send(client, StubLimiter::allow(), "/?id=dQw4w9WgXcQ").await;

        assert_eq!(status.as_u16(), expected, "{}", label);
        assert_eq!(body["videoId"], "dQw4w9WgXcQ", "{}", label);
        assert!(body["error"].is_string(), "{}", label);
    }
}

#[tokio::test]
async fn test_fetch_error_messages() {
    let client = StubClient::new(None, StubOutcome::MalformedJson);
    let (_, body) = send(client, StubLimiter::allow(), "/?id=dQw4w9WgXcQ").await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to process data from YouTube"));

    let client = StubClient::new(None, StubOutcome::TranscriptError("boom".into()));
    let (_, body) = send(client, StubLimiter::allow(), "/?id=dQw4w9WgXcQ").await;
    assert_eq!(
        body,
        json!({ "error": "Failed to fetch transcript.", "videoId": "dQw4w9WgXcQ" })
    );
}
