//! Capability contracts for stack-based (AWS) environments

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stack output key holding the environment's VPC identifier.
pub const VPC_ID_OUTPUT: &str = "VPCID";

/// A described resource stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    pub name: String,
    pub status: String,
    pub outputs: HashMap<String, String>,
}

/// Looks up the current shape of a named stack.
#[async_trait]
pub trait StackDescriber: Send + Sync {
    /// Describe the stack, or return [`CloudError::StackNotFound`] when the
    /// provider no longer knows it (a prior run already deleted it).
    ///
    /// [`CloudError::StackNotFound`]: crate::error::CloudError::StackNotFound
    async fn describe(&self, name: &str) -> Result<Stack>;
}

/// Deletes a resource stack.
#[async_trait]
pub trait StackDeleter: Send + Sync {
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Checks that a VPC carries no live workloads before it is torn down.
#[async_trait]
pub trait VpcStatusChecker: Send + Sync {
    async fn validate_safe_to_delete(&self, vpc_id: &str) -> Result<()>;
}

/// Deletes the environment's server certificate.
#[async_trait]
pub trait CertificateDeleter: Send + Sync {
    async fn delete(&self, certificate_name: &str) -> Result<()>;
}

/// Deletes the environment's EC2 key pair by name.
#[async_trait]
pub trait AwsKeyPairDeleter: Send + Sync {
    async fn delete(&self, name: &str) -> Result<()>;
}
