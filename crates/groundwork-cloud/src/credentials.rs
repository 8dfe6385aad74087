//! Provider credential validation

use crate::error::{CloudError, Result};
use groundwork_core::state::{AwsCredentials, GcpCredentials};

/// Validates that the credentials recorded for a provider are usable.
pub trait CredentialValidator: Send + Sync {
    fn validate_aws(&self, credentials: &AwsCredentials) -> Result<()>;
    fn validate_gcp(&self, credentials: &GcpCredentials) -> Result<()>;
}

/// Checks the persisted credentials for completeness.
///
/// Whether the credentials actually authenticate is left to the provider
/// calls themselves; this gate only stops a run that could never finish.
pub struct StoredCredentialValidator;

impl StoredCredentialValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StoredCredentialValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialValidator for StoredCredentialValidator {
    fn validate_aws(&self, credentials: &AwsCredentials) -> Result<()> {
        if credentials.access_key_id.is_empty() {
            return Err(CloudError::MissingCredential("AWS access key ID"));
        }
        if credentials.secret_access_key.is_empty() {
            return Err(CloudError::MissingCredential("AWS secret access key"));
        }
        if credentials.region.is_empty() {
            return Err(CloudError::MissingCredential("AWS region"));
        }
        Ok(())
    }

    fn validate_gcp(&self, credentials: &GcpCredentials) -> Result<()> {
        if credentials.service_account_key.is_empty() {
            return Err(CloudError::MissingCredential("GCP service account key"));
        }
        if credentials.project_id.is_empty() {
            return Err(CloudError::MissingCredential("GCP project ID"));
        }
        if credentials.zone.is_empty() {
            return Err(CloudError::MissingCredential("GCP zone"));
        }
        if credentials.region.is_empty() {
            return Err(CloudError::MissingCredential("GCP region"));
        }
        Ok(())
    }
}
