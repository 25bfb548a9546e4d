use std::{fmt, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid endpoint URL `{url}`: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("endpoint must use http or https, got `{0}`")]
    UnsupportedScheme(String),

    #[error("invalid header `{0}`, expected NAME:VALUE")]
    MalformedHeader(String),

    #[error("invalid header name `{0}`")]
    InvalidHeaderName(String),

    #[error("invalid value for header `{0}`")]
    InvalidHeaderValue(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read image {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification of a failed submission, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    Status,
    Decode,
    Request,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Network => "network",
            FailureKind::Timeout => "timeout",
            FailureKind::Status => "server-status",
            FailureKind::Decode => "decode",
            FailureKind::Request => "request",
            FailureKind::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response was not JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not build request: {0}")]
    Request(#[source] reqwest::Error),
}

impl SubmitError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SubmitError::Network(_) => FailureKind::Network,
            SubmitError::Timeout(_) => FailureKind::Timeout,
            SubmitError::Status { .. } => FailureKind::Status,
            SubmitError::Decode(_) => FailureKind::Decode,
            SubmitError::Request(_) => FailureKind::Request,
        }
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SubmitError::Timeout(err)
        } else if err.is_builder() {
            SubmitError::Request(err)
        } else {
            SubmitError::Network(err)
        }
    }
}
