//! Cloud collaborator error types

use groundwork_core::error::StateError;
use thiserror::Error;

/// Minimum Terraform release the destroy flow is known to work against.
pub const MINIMUM_TERRAFORM_VERSION: &str = "0.8.5";

fn join_messages(errors: &[CloudError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Errors surfaced by cloud collaborators and the destroy orchestrator
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("flag provided but not defined: -{0}")]
    UnknownFlag(String),

    #[error("Terraform version must be at least v{}", MINIMUM_TERRAFORM_VERSION)]
    TerraformVersionBelowMinimum,

    #[error("cannot parse Terraform version: {0}")]
    MalformedTerraformVersion(String),

    #[error("{0} must be provided")]
    MissingCredential(&'static str),

    #[error("stack not found: {0}")]
    StackNotFound(String),

    #[error("{0} is not safe to delete")]
    NotSafeToDelete(String),

    /// A failure reported by an external tool, surfaced verbatim.
    #[error("{0}")]
    External(String),

    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("API error: {0}")]
    Api(String),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Two failures from the same step, primary action error first.
    #[error("the following errors occurred:\n{}", join_messages(.0))]
    Aggregate(Vec<CloudError>),
}

pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_lists_every_message_primary_first() {
        let err = CloudError::Aggregate(vec![
            CloudError::External("deletion failed".to_string()),
            CloudError::External("saving state failed".to_string()),
        ]);
        assert_eq!(
            err.to_string(),
            "the following errors occurred:\ndeletion failed,\nsaving state failed"
        );
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            CloudError::TerraformVersionBelowMinimum.to_string(),
            "Terraform version must be at least v0.8.5"
        );
        assert_eq!(
            CloudError::UnknownFlag("invalid-flag".to_string()).to_string(),
            "flag provided but not defined: -invalid-flag"
        );
    }
}
