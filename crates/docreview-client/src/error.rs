//! Error types for fetching review resources and submitting decisions

use thiserror::Error;

/// Why a poll attempt did not produce a snapshot. Every variant is retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("file not found: {resource} (HTTP {status})")]
    Status { resource: String, status: u16 },

    #[error("file not found: {resource}")]
    Missing { resource: String },

    #[error("empty content: {resource}")]
    Empty { resource: String },

    #[error("request for {resource} failed: {source}")]
    Transport {
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read {resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("change set already reviewed, waiting for the next one")]
    Stale,

    #[error("invalid source location '{0}'")]
    InvalidLocation(String),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("approval request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("approval endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("approval endpoint returned a non-JSON response: {body}")]
    InvalidResponse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid approval URL '{0}'")]
    InvalidUrl(String),
}
