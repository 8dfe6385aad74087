//! State storage and validation
//!
//! Manages the `.groundwork/state.json` file. The destroy orchestrator
//! checkpoints through the [`StateStore`] trait after every irreversible
//! step, so a second run can resume from exactly the point the previous one
//! reached. There is deliberately no lock file: a run owns the state
//! exclusively, and re-entrancy across runs is coordinated purely through
//! the persisted checkpoints.

use crate::error::{Result, StateError};
use crate::state::{EnvState, Iaas};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Current state file schema version
pub const STATE_VERSION: u32 = 2;

const STATE_DIR: &str = ".groundwork";
const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";

/// Durable persistence for environment state.
///
/// Called after every confirmed deletion; a failure here aborts the run so
/// the snapshot never drifts more than one unsaved step from reality.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn persist(&self, state: &EnvState) -> Result<()>;
}

/// Pre-flight schema/integrity check on a loaded state.
pub trait StateValidator: Send + Sync {
    fn validate(&self, state: &EnvState) -> Result<()>;
}

/// File-backed store rooted at a project directory.
pub struct FileStateStore {
    project_root: PathBuf,
}

impl FileStateStore {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    fn state_dir(&self) -> PathBuf {
        self.project_root.join(STATE_DIR)
    }

    fn state_path(&self) -> PathBuf {
        self.state_dir().join(STATE_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.state_dir().join(STATE_BACKUP)
    }

    async fn ensure_state_dir(&self) -> Result<()> {
        let dir = self.state_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!("Created state directory: {}", dir.display());
        }
        Ok(())
    }

    /// Load the current state; a missing file is an empty environment.
    pub async fn load(&self) -> Result<EnvState> {
        let path = self.state_path();
        if !path.exists() {
            tracing::debug!("State file not found, returning empty state");
            return Ok(EnvState::new());
        }

        let content = fs::read_to_string(&path).await?;
        let state: EnvState = serde_json::from_str(&content)?;

        if state.version > STATE_VERSION {
            return Err(StateError::VersionTooNew {
                found: state.version,
                supported: STATE_VERSION,
            });
        }

        tracing::debug!("Loaded state for environment {:?}", state.env_id);
        Ok(state)
    }

    /// Save the state, rotating the previous file to a backup first.
    pub async fn save(&self, state: &EnvState) -> Result<()> {
        self.ensure_state_dir().await?;

        let path = self.state_path();
        let backup = self.backup_path();

        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
            tracing::debug!("Created state backup");
        }

        let content = serde_json::to_string_pretty(state)?;
        fs::write(&path, content).await?;

        tracing::debug!("Saved state for environment {:?}", state.env_id);
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn persist(&self, state: &EnvState) -> Result<()> {
        self.save(state).await
    }
}

/// Default schema validator.
///
/// Credential completeness is checked later, by the provider-specific
/// credential validation step; this only rejects files the rest of the run
/// cannot safely interpret.
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StateValidator for SchemaValidator {
    fn validate(&self, state: &EnvState) -> Result<()> {
        if state.version > STATE_VERSION {
            return Err(StateError::VersionTooNew {
                found: state.version,
                supported: STATE_VERSION,
            });
        }

        if state.iaas == Iaas::Gcp && !state.gcp.service_account_key.is_empty() {
            serde_json::from_str::<serde_json::Value>(&state.gcp.service_account_key).map_err(
                |e| StateError::Invalid(format!("service account key is not valid JSON: {e}")),
            )?;
        }

        Ok(())
    }
}
