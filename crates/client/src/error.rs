use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status} from {path}: {body}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
        body: String,
    },

    #[error("session expired")]
    Unauthorized,

    #[error("not logged in")]
    MissingToken,

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}
