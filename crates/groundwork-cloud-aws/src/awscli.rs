//! aws CLI wrapper
//!
//! Wraps `aws` invocations for the stack teardown path. Credentials are
//! injected through the process environment so they never appear in a
//! process listing.

use crate::error::{AwsError, Result};
use groundwork_core::state::AwsCredentials;
use std::process::Stdio;
use tokio::process::Command;

/// aws CLI wrapper bound to one account and region.
pub struct AwsCli {
    access_key_id: String,
    secret_access_key: String,
    region: String,
}

impl AwsCli {
    pub fn new(credentials: &AwsCredentials) -> Self {
        Self {
            access_key_id: credentials.access_key_id.clone(),
            secret_access_key: credentials.secret_access_key.clone(),
            region: credentials.region.clone(),
        }
    }

    /// Run an aws command and return stdout.
    pub(crate) async fn run(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("aws");
        cmd.arg("--region").arg(&self.region);
        cmd.arg("--output").arg("json");
        cmd.args(args);
        cmd.env("AWS_ACCESS_KEY_ID", &self.access_key_id);
        cmd.env("AWS_SECRET_ACCESS_KEY", &self.secret_access_key);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: aws --region {} {}", self.region, args.join(" "));

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AwsError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
