//! Error types for the Atlas client core.
//!
//! # Design
//! Each variant names the stage that failed: name resolution, config loading,
//! request construction, transport, or the API itself. `Decode` is only
//! surfaced by callers that decode bodies on their own; the response
//! classifier logs decode failures and keeps going.

use std::path::PathBuf;

/// Errors returned by the Atlas client core.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    /// The config name is neither a `.toml` path nor a usable tag.
    #[error("invalid config name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// `build_request` was called with an empty resource segment.
    #[error("missing API resource name")]
    MissingResource,

    /// The resource segment carries a query or fragment of its own.
    #[error("invalid API resource name {0:?}: must not contain '?' or '#'")]
    InvalidResource(String),

    /// The request URL could not be constructed.
    #[error("cannot build request for {url}: {source}")]
    RequestBuild {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A structured error body could not be decoded.
    #[error("cannot decode API error body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API answered with a status of 400 or above.
    #[error("status: {status} code: {code} - {detail}")]
    Api { status: u16, code: i64, detail: String },

    /// No response was handed to the classifier.
    #[error("no response received")]
    NoResponse,

    /// The config file is not valid TOML for `Config`.
    #[error("malformed config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The config file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The shared HTTP agent failed before a status line was received.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Convenience Result type for Atlas operations.
pub type Result<T> = std::result::Result<T, AtlasError>;
