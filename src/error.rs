use thiserror::Error;

use crate::types::CandidateSource;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid brand pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;

/// Problems noticed while extracting a single listing.
///
/// None of these abort extraction; each extractor degrades instead and the
/// issue is reported alongside the record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionIssue {
    #[error("no candidate located for {field}")]
    AbsentField { field: &'static str },

    #[error("{origin:?} candidate yielded year {value}, outside the accepted range")]
    OutOfRangeValue { origin: CandidateSource, value: i32 },

    #[error("no known brand pattern matches {phrase:?}")]
    UnrecognizedPattern { phrase: String },

    #[error("listing has no page text or snippet")]
    EmptyListing,
}
