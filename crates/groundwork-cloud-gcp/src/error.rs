//! GCP back end error types

use groundwork_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GcpError {
    #[error("gcloud command failed: {0}")]
    CommandFailed(String),

    #[error("unexpected gcloud response: {0}")]
    UnexpectedResponse(String),

    #[error("terraform state error: {0}")]
    TerraformState(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GcpError>;

impl From<GcpError> for CloudError {
    fn from(err: GcpError) -> Self {
        match err {
            GcpError::CommandFailed(message) => CloudError::CommandFailed(message),
            GcpError::Json(e) => CloudError::Json(e),
            GcpError::Io(e) => CloudError::Io(e),
            other => CloudError::Api(other.to_string()),
        }
    }
}
