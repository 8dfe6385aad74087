//! AWS implementations of the stack-path collaborator contracts

use crate::awscli::AwsCli;
use crate::error::{AwsError, Result};
use async_trait::async_trait;
use groundwork_cloud::aws::{
    AwsKeyPairDeleter, CertificateDeleter, Stack, StackDeleter, StackDescriber, VpcStatusChecker,
};
use groundwork_cloud::{CloudError, Result as CloudResult};
use groundwork_core::state::AwsCredentials;
use serde::Deserialize;

/// CloudFormation-backed stack describe/delete.
pub struct CloudFormation {
    cli: AwsCli,
}

impl CloudFormation {
    pub fn new(credentials: &AwsCredentials) -> Self {
        Self {
            cli: AwsCli::new(credentials),
        }
    }
}

#[async_trait]
impl StackDescriber for CloudFormation {
    async fn describe(&self, name: &str) -> CloudResult<Stack> {
        let result = self
            .cli
            .run(&["cloudformation", "describe-stacks", "--stack-name", name])
            .await;

        match result {
            Ok(output) => Ok(parse_stack(&output)?),
            // `describe-stacks` reports a missing stack through stderr, e.g.
            // "Stack with id some-stack does not exist"
            Err(AwsError::CommandFailed(stderr)) if stderr.contains("does not exist") => {
                Err(CloudError::StackNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl StackDeleter for CloudFormation {
    async fn delete(&self, name: &str) -> CloudResult<()> {
        self.cli
            .run(&["cloudformation", "delete-stack", "--stack-name", name])
            .await
            .map_err(CloudError::from)?;

        // delete-stack only queues the deletion; block until it finishes so
        // the caller can safely record the stack as gone.
        self.cli
            .run(&[
                "cloudformation",
                "wait",
                "stack-delete-complete",
                "--stack-name",
                name,
            ])
            .await
            .map_err(CloudError::from)?;

        Ok(())
    }
}

/// EC2-backed VPC occupancy check and key-pair deletion.
pub struct Ec2 {
    cli: AwsCli,
}

impl Ec2 {
    pub fn new(credentials: &AwsCredentials) -> Self {
        Self {
            cli: AwsCli::new(credentials),
        }
    }
}

#[async_trait]
impl VpcStatusChecker for Ec2 {
    async fn validate_safe_to_delete(&self, vpc_id: &str) -> CloudResult<()> {
        let vpc_filter = format!("Name=vpc-id,Values={vpc_id}");
        let output = self
            .cli
            .run(&[
                "ec2",
                "describe-instances",
                "--filters",
                &vpc_filter,
                "Name=instance-state-name,Values=pending,running,stopping,stopped",
            ])
            .await
            .map_err(CloudError::from)?;

        let instances = count_instances(&output).map_err(CloudError::from)?;
        if instances > 0 {
            return Err(CloudError::NotSafeToDelete(format!("vpc {vpc_id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl AwsKeyPairDeleter for Ec2 {
    async fn delete(&self, name: &str) -> CloudResult<()> {
        if name.is_empty() {
            return Ok(());
        }
        self.cli
            .run(&["ec2", "delete-key-pair", "--key-name", name])
            .await
            .map_err(CloudError::from)?;
        Ok(())
    }
}

/// IAM-backed server certificate deletion.
pub struct Iam {
    cli: AwsCli,
}

impl Iam {
    pub fn new(credentials: &AwsCredentials) -> Self {
        Self {
            cli: AwsCli::new(credentials),
        }
    }
}

#[async_trait]
impl CertificateDeleter for Iam {
    async fn delete(&self, certificate_name: &str) -> CloudResult<()> {
        self.cli
            .run(&[
                "iam",
                "delete-server-certificate",
                "--server-certificate-name",
                certificate_name,
            ])
            .await
            .map_err(CloudError::from)?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct DescribeStacksResponse {
    #[serde(rename = "Stacks")]
    stacks: Vec<StackDetails>,
}

#[derive(Deserialize)]
struct StackDetails {
    #[serde(rename = "StackName")]
    name: String,
    #[serde(rename = "StackStatus")]
    status: String,
    #[serde(rename = "Outputs", default)]
    outputs: Vec<StackOutput>,
}

#[derive(Deserialize)]
struct StackOutput {
    #[serde(rename = "OutputKey")]
    key: String,
    #[serde(rename = "OutputValue")]
    value: String,
}

fn parse_stack(output: &str) -> Result<Stack> {
    let response: DescribeStacksResponse = serde_json::from_str(output)?;
    let details = response.stacks.into_iter().next().ok_or_else(|| {
        AwsError::UnexpectedResponse("describe-stacks returned no stacks".to_string())
    })?;

    Ok(Stack {
        name: details.name,
        status: details.status,
        outputs: details
            .outputs
            .into_iter()
            .map(|o| (o.key, o.value))
            .collect(),
    })
}

#[derive(Deserialize)]
struct DescribeInstancesResponse {
    #[serde(rename = "Reservations", default)]
    reservations: Vec<Reservation>,
}

#[derive(Deserialize)]
struct Reservation {
    #[serde(rename = "Instances", default)]
    instances: Vec<serde_json::Value>,
}

fn count_instances(output: &str) -> Result<usize> {
    let response: DescribeInstancesResponse = serde_json::from_str(output)?;
    Ok(response.reservations.iter().map(|r| r.instances.len()).sum())
}
