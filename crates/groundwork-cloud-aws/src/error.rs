//! AWS back end error types

use groundwork_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("aws command failed: {0}")]
    CommandFailed(String),

    #[error("unexpected aws response: {0}")]
    UnexpectedResponse(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AwsError>;

impl From<AwsError> for CloudError {
    fn from(err: AwsError) -> Self {
        match err {
            AwsError::CommandFailed(message) => CloudError::CommandFailed(message),
            AwsError::Json(e) => CloudError::Json(e),
            AwsError::Io(e) => CloudError::Io(e),
            other => CloudError::Api(other.to_string()),
        }
    }
}
