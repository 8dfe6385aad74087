//! Deployment engine CLI wrapper
//!
//! Drives the engine binary that owns the director's lifecycle (`deployctl`
//! by default, overridable with `GROUNDWORK_ENGINE_BIN`). The engine works
//! against its own state file in a scratch directory; after a failed delete
//! that file is read back so the confirmed partial progress can be folded
//! into the environment state and checkpointed.

use async_trait::async_trait;
use groundwork_cloud::{CloudError, DirectorError, DirectorManager};
use groundwork_core::state::EnvState;
use std::process::Stdio;
use tokio::process::Command;

const DEFAULT_ENGINE_BIN: &str = "deployctl";
const ENGINE_STATE_FILE: &str = "director-state.json";

pub struct EngineCli {
    binary: String,
}

impl EngineCli {
    pub fn new() -> Self {
        Self {
            binary: std::env::var("GROUNDWORK_ENGINE_BIN")
                .unwrap_or_else(|_| DEFAULT_ENGINE_BIN.to_string()),
        }
    }
}

impl Default for EngineCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectorManager for EngineCli {
    async fn delete(&self, state: &EnvState) -> Result<(), DirectorError> {
        let workdir =
            tempfile::tempdir().map_err(|e| DirectorError::Failed(CloudError::Io(e)))?;
        let state_path = workdir.path().join(ENGINE_STATE_FILE);

        let engine_state = serde_json::to_string_pretty(&state.director.state)
            .map_err(|e| DirectorError::Failed(CloudError::Json(e)))?;
        tokio::fs::write(&state_path, engine_state)
            .await
            .map_err(|e| DirectorError::Failed(CloudError::Io(e)))?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg("delete-env");
        cmd.arg("--state").arg(&state_path);
        cmd.arg("--director").arg(&state.director.name);
        cmd.env("DIRECTOR_USERNAME", &state.director.username);
        cmd.env("DIRECTOR_PASSWORD", &state.director.password);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: {} delete-env", self.binary);

        let output = cmd
            .output()
            .await
            .map_err(|e| DirectorError::Failed(CloudError::Io(e)))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let source = CloudError::External(stderr);

        // The engine rewrites its state file as it tears pieces down; when
        // the updated blob is readable, hand back a partial snapshot so the
        // caller can checkpoint the confirmed progress.
        let partial_engine_state = tokio::fs::read_to_string(&state_path)
            .await
            .ok()
            .and_then(|content| {
                serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&content).ok()
            });

        match partial_engine_state {
            Some(engine_state) => {
                let mut partial = state.clone();
                partial.director.state = engine_state;
                Err(DirectorError::FailedWithState {
                    state: Box::new(partial),
                    source,
                })
            }
            None => Err(DirectorError::Failed(source)),
        }
    }
}
