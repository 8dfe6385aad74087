//! Persisted environment state
//!
//! The aggregate recorded in `.groundwork/state.json`. It describes every
//! resource the bootstrapper created for an environment: provider
//! credentials, the key pair, the deployment director, the resource stack
//! (AWS) and the Terraform state blob (GCP). The destroy orchestrator
//! mutates it in place, clearing sub-fields as the matching resources are
//! confirmed gone, and checkpoints it after every irreversible step.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::store::STATE_VERSION;

/// Which infrastructure back end provisioned the environment.
///
/// `Unset` covers state files written before the provider field existed;
/// those environments are always stack-based and are torn down along the
/// stack path. Unknown provider strings are rejected when the file is
/// loaded, so an in-memory state always carries one of these three values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Iaas {
    #[default]
    #[serde(rename = "none")]
    Unset,
    Aws,
    Gcp,
}

impl std::fmt::Display for Iaas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Iaas::Unset => write!(f, "none"),
            Iaas::Aws => write!(f, "aws"),
            Iaas::Gcp => write!(f, "gcp"),
        }
    }
}

/// AWS account credentials. Input to the run, never cleared by destroy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

/// GCP account credentials. Input to the run, never cleared by destroy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpCredentials {
    pub service_account_key: String,
    pub project_id: String,
    pub zone: String,
    pub region: String,
}

/// The environment's SSH key pair.
///
/// AWS environments record the EC2 key-pair `name`; GCP environments are
/// identified by the `public_key` material instead. Cleared as a unit once
/// the provider's key-pair deleter succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyPair {
    pub name: String,
    pub private_key: String,
    pub public_key: String,
}

impl KeyPair {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.private_key.is_empty() && self.public_key.is_empty()
    }
}

/// Everything recorded about the deployment director.
///
/// `state` is the engine's own deployment state, opaque to Groundwork. On a
/// failed delete the engine may hand back a newer snapshot of this whole
/// struct; the orchestrator adopts it wholesale before reporting the error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorState {
    pub name: String,
    pub username: String,
    pub password: String,
    pub state: serde_json::Map<String, serde_json::Value>,
    pub credentials: HashMap<String, String>,
    pub ssl_certificate: String,
    pub ssl_private_key: String,
}

impl DirectorState {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The managed resource stack, recorded for AWS environments.
///
/// `name` and `lb_type` are cleared together when the stack delete
/// succeeds; `certificate_name` is cleared independently because the
/// certificate is deleted by a separate call at a later point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackState {
    pub name: String,
    pub lb_type: String,
    pub certificate_name: String,
}

/// The persisted aggregate for one environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvState {
    /// State file schema version
    pub version: u32,

    /// Provider discriminator; never changes during a run.
    pub iaas: Iaas,

    /// Environment name, used for confirmation prompts and provider calls.
    pub env_id: String,

    pub aws: AwsCredentials,
    pub gcp: GcpCredentials,
    pub key_pair: KeyPair,
    pub director: DirectorState,
    pub stack: StackState,

    /// Opaque Terraform state blob (GCP). Updated with whatever the destroy
    /// run returns, including partial progress on failure.
    pub tf_state: String,
}

impl Default for EnvState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            iaas: Iaas::default(),
            env_id: String::new(),
            aws: AwsCredentials::default(),
            gcp: GcpCredentials::default(),
            key_pair: KeyPair::default(),
            director: DirectorState::default(),
            stack: StackState::default(),
            tf_state: String::new(),
        }
    }
}

impl EnvState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing was ever recorded for this environment.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
