use axum::http::StatusCode;
use thiserror::Error;

use crate::youtube::ClientError;

/// Main error type for server startup and configuration
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Video client error: {0}")]
    Client(#[from] ClientError),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ServerError>;

/// Category of a failed upstream fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Private,
    Unavailable,
    Live,
    Premiere,
    RegionLocked,
    TranscriptsDisabled,
    MalformedResponse,
    Unknown,
}

/// Message phrases for each category, checked in this order.
///
/// Region phrases must stay ahead of "unavailable": geo-blocked videos can
/// report "Video unavailable" alongside the country reason.
const CLASSIFICATION: &[(FetchErrorKind, &[&str])] = &[
    (
        FetchErrorKind::RegionLocked,
        &["available in your country", "region"],
    ),
    (FetchErrorKind::Private, &["private"]),
    (FetchErrorKind::Live, &["live stream", "live event", "is live"]),
    (FetchErrorKind::Premiere, &["premiere"]),
    (
        FetchErrorKind::TranscriptsDisabled,
        &[
            "transcripts are not available",
            "transcript panel not found",
            "transcripts disabled",
        ],
    ),
    (FetchErrorKind::Unavailable, &["unavailable"]),
    (FetchErrorKind::MalformedResponse, &["json", "unexpected token"]),
];

impl FetchErrorKind {
    /// Classify a client failure.
    ///
    /// Body decode errors are recognised by type; everything else falls back
    /// to matching the error message.
    pub fn classify(err: &ClientError) -> Self {
        match err {
            ClientError::Json(_) => Self::MalformedResponse,
            other => Self::from_message(&other.to_string()),
        }
    }

    /// Classify by case-insensitive substring match on an error message.
    pub fn from_message(message: &str) -> Self {
        let message = message.to_lowercase();
        CLASSIFICATION
            .iter()
            .find(|(_, phrases)| phrases.iter().any(|p| message.contains(p)))
            .map(|(kind, _)| *kind)
            .unwrap_or(Self::Unknown)
    }

    pub fn status(self) -> StatusCode {
        match self {
            Self::Private | Self::Unavailable | Self::Live | Self::Premiere => StatusCode::FORBIDDEN,
            Self::RegionLocked => StatusCode::UNAVAILABLE_FOR_LEGAL_REASONS,
            Self::TranscriptsDisabled => StatusCode::NOT_FOUND,
            Self::MalformedResponse | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the caller.
    pub fn message(self) -> &'static str {
        match self {
            Self::Private => "This video is private and its transcript cannot be accessed.",
            Self::Unavailable => "This video is unavailable.",
            Self::Live => "Transcripts are not available for live streams.",
            Self::Premiere => "Transcripts are not available for premieres that have not aired yet.",
            Self::RegionLocked => "This video is not available in the server's region.",
            Self::TranscriptsDisabled => "Transcripts are not available for this video.",
            Self::MalformedResponse => {
                "Failed to process data from YouTube. The response format may have changed."
            }
            Self::Unknown => "Failed to fetch transcript.",
        }
    }
}
