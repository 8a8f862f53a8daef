use reqwest::StatusCode;
use thiserror::Error;

/// Any failure of a data request. Callers treat every variant the same way;
/// the split only exists for the logs.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
}

pub type DynErr = Box<dyn std::error::Error + Send + Sync>;
