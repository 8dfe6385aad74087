//! gcloud CLI wrapper

use crate::error::{GcpError, Result};
use groundwork_core::state::GcpCredentials;
use std::process::Stdio;
use tokio::process::Command;

/// gcloud CLI wrapper bound to one project.
pub struct Gcloud {
    project_id: String,
}

impl Gcloud {
    pub fn new(credentials: &GcpCredentials) -> Self {
        Self {
            project_id: credentials.project_id.clone(),
        }
    }

    /// Run a gcloud command and return stdout.
    pub(crate) async fn run(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("gcloud");
        cmd.arg("--project").arg(&self.project_id);
        cmd.arg("--format").arg("json");
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(
            "Running: gcloud --project {} {}",
            self.project_id,
            args.join(" ")
        );

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GcpError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
