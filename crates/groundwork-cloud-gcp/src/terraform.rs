//! terraform CLI wrapper
//!
//! Destroy runs in a scratch directory: the template and the recorded state
//! are written out, `terraform destroy` runs against them, and the state
//! file is read back afterwards whether the run succeeded or not, so the
//! caller always learns how far Terraform got.

use crate::error::{GcpError, Result};
use async_trait::async_trait;
use groundwork_cloud::gcp::{TerraformDestroyError, TerraformDestroyInput, TerraformExecutor};
use groundwork_cloud::{CloudError, Result as CloudResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

const TEMPLATE_FILE: &str = "template.tf";
const STATE_FILE: &str = "terraform.tfstate";

/// terraform CLI wrapper.
pub struct TerraformCli;

impl TerraformCli {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, workdir: &Path, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("terraform");
        cmd.args(args);
        cmd.current_dir(workdir);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: terraform {}", args.join(" "));

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GcpError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for TerraformCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TerraformExecutor for TerraformCli {
    async fn version(&self) -> CloudResult<String> {
        let workdir = std::env::temp_dir();
        let output = self
            .run(&workdir, &["version"])
            .await
            .map_err(CloudError::from)?;
        Ok(parse_version(&output).map_err(CloudError::from)?)
    }

    async fn destroy(
        &self,
        input: TerraformDestroyInput<'_>,
    ) -> std::result::Result<String, TerraformDestroyError> {
        let fail = |source: GcpError| TerraformDestroyError {
            tf_state: input.tf_state.to_string(),
            source: source.into(),
        };

        let workdir = tempfile::tempdir().map_err(|e| fail(e.into()))?;
        tokio::fs::write(workdir.path().join(TEMPLATE_FILE), input.template)
            .await
            .map_err(|e| fail(e.into()))?;
        tokio::fs::write(workdir.path().join(STATE_FILE), input.tf_state)
            .await
            .map_err(|e| fail(e.into()))?;

        let project_var = format!("project_id={}", input.project_id);
        let env_var = format!("env_id={}", input.env_id);
        let region_var = format!("region={}", input.region);
        let zone_var = format!("zone={}", input.zone);
        let credentials_var = format!("credentials={}", input.service_account_key);

        let result = self
            .run(
                workdir.path(),
                &[
                    "destroy",
                    "-force",
                    "-state",
                    STATE_FILE,
                    "-var",
                    &project_var,
                    "-var",
                    &env_var,
                    "-var",
                    &region_var,
                    "-var",
                    &zone_var,
                    "-var",
                    &credentials_var,
                ],
            )
            .await;

        // Terraform updates the state file as it works, so read it back even
        // when the run failed.
        let tf_state = tokio::fs::read_to_string(workdir.path().join(STATE_FILE))
            .await
            .unwrap_or_else(|_| input.tf_state.to_string());

        match result {
            Ok(_) => {
                if resources_remain(&tf_state) {
                    Ok(tf_state)
                } else {
                    Ok(String::new())
                }
            }
            Err(GcpError::CommandFailed(stderr)) => Err(TerraformDestroyError {
                tf_state,
                source: CloudError::External(stderr),
            }),
            Err(e) => Err(TerraformDestroyError {
                tf_state,
                source: e.into(),
            }),
        }
    }
}

/// Extract the bare version from `terraform version` output, e.g.
/// `Terraform v0.8.7` -> `0.8.7`.
fn parse_version(output: &str) -> Result<String> {
    let first_line = output.lines().next().unwrap_or_default();
    first_line
        .split_whitespace()
        .find_map(|word| word.strip_prefix('v'))
        .map(str::to_string)
        .ok_or_else(|| {
            GcpError::UnexpectedResponse(format!("cannot find a version in {first_line:?}"))
        })
}

/// True when the state blob still records managed resources.
fn resources_remain(tf_state: &str) -> bool {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(tf_state) else {
        return true;
    };

    if let Some(resources) = value.get("resources").and_then(|r| r.as_array()) {
        return !resources.is_empty();
    }

    if let Some(modules) = value.get("modules").and_then(|m| m.as_array()) {
        return modules.iter().any(|module| {
            module
                .get("resources")
                .and_then(|r| r.as_object())
                .is_some_and(|r| !r.is_empty())
        });
    }

    false
}
