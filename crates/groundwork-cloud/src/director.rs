//! Deployment director lifecycle collaborator

use crate::error::CloudError;
use async_trait::async_trait;
use groundwork_core::state::EnvState;
use thiserror::Error;

/// A failed director deletion.
///
/// The engine tears the director down through its own multi-step process
/// and may know how far it got; when it does, the failure carries a
/// best-effort snapshot of the environment state so the orchestrator can
/// checkpoint the confirmed partial progress before reporting the error.
#[derive(Error, Debug)]
pub enum DirectorError {
    #[error("{source}")]
    FailedWithState {
        state: Box<EnvState>,
        #[source]
        source: CloudError,
    },

    #[error(transparent)]
    Failed(#[from] CloudError),
}

/// Drives the deployment engine that manages the director.
#[async_trait]
pub trait DirectorManager: Send + Sync {
    /// Delete the director recorded in `state`.
    async fn delete(&self, state: &EnvState) -> Result<(), DirectorError>;
}
