//! Capability contracts for Terraform-managed (GCP) environments

use crate::error::{CloudError, Result};
use async_trait::async_trait;
use thiserror::Error;

use groundwork_core::state::EnvState;

/// Terraform template describing the network scaffolding Groundwork
/// provisions on GCP. Destroy runs against the same template so Terraform
/// can resolve every resource recorded in the state blob.
pub const TEMPLATE: &str = r#"variable "project_id" {
  type = "string"
}

variable "region" {
  type = "string"
}

variable "zone" {
  type = "string"
}

variable "env_id" {
  type = "string"
}

variable "credentials" {
  type = "string"
}

provider "google" {
  credentials = "${var.credentials}"
  project     = "${var.project_id}"
  region      = "${var.region}"
}

resource "google_compute_network" "groundwork-network" {
  name = "${var.env_id}-network"
}

resource "google_compute_subnetwork" "groundwork-subnet" {
  name          = "${var.env_id}-subnet"
  ip_cidr_range = "10.0.0.0/16"
  network       = "${google_compute_network.groundwork-network.self_link}"
}

resource "google_compute_address" "groundwork-ip" {
  name = "${var.env_id}-ip"
}

resource "google_compute_firewall" "director-external" {
  name    = "${var.env_id}-director-external"
  network = "${google_compute_network.groundwork-network.name}"

  allow {
    ports    = ["22", "6868", "25555"]
    protocol = "tcp"
  }

  target_tags = ["${var.env_id}-director"]
}

resource "google_compute_firewall" "internal" {
  name    = "${var.env_id}-internal"
  network = "${google_compute_network.groundwork-network.name}"

  allow {
    protocol = "tcp"
  }

  allow {
    protocol = "udp"
  }

  source_tags = ["${var.env_id}-internal"]
  target_tags = ["${var.env_id}-internal"]
}

output "external_ip" {
  value = "${google_compute_address.groundwork-ip.address}"
}

output "network_name" {
  value = "${google_compute_network.groundwork-network.name}"
}

output "subnetwork_name" {
  value = "${google_compute_subnetwork.groundwork-subnet.name}"
}

output "director_tag_name" {
  value = "${var.env_id}-director"
}

output "internal_tag_name" {
  value = "${var.env_id}-internal"
}
"#;

/// Live identifiers resolved from the recorded Terraform state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerraformOutputs {
    pub external_ip: String,
    pub network_name: String,
    pub subnetwork_name: String,
    pub director_tag: String,
    pub internal_tag: String,
    pub director_address: String,
}

/// Resolves the live outputs of an environment's Terraform state.
#[async_trait]
pub trait TerraformOutputResolver: Send + Sync {
    async fn resolve(&self, state: &EnvState) -> Result<TerraformOutputs>;
}

/// Everything a destroy run hands to Terraform.
#[derive(Debug, Clone, Copy)]
pub struct TerraformDestroyInput<'a> {
    pub service_account_key: &'a str,
    pub env_id: &'a str,
    pub project_id: &'a str,
    pub zone: &'a str,
    pub region: &'a str,
    pub tf_state: &'a str,
    pub template: &'a str,
}

/// A failed destroy run.
///
/// Terraform records progress in its state file as it works, so even a
/// failed run hands back an updated blob; the orchestrator checkpoints it
/// before surfacing `source`.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct TerraformDestroyError {
    pub tf_state: String,
    #[source]
    pub source: CloudError,
}

/// Runs the Terraform executable.
#[async_trait]
pub trait TerraformExecutor: Send + Sync {
    /// Report the installed Terraform version string, e.g. `0.8.7`.
    async fn version(&self) -> Result<String>;

    /// Destroy the environment's resources. Returns the updated state blob
    /// (empty on full success); on failure the error carries whatever state
    /// survived the partial run.
    async fn destroy(
        &self,
        input: TerraformDestroyInput<'_>,
    ) -> std::result::Result<String, TerraformDestroyError>;
}

/// Checks that a GCP network carries no live instances before destroy.
#[async_trait]
pub trait NetworkInstancesChecker: Send + Sync {
    async fn validate_safe_to_delete(&self, network_name: &str) -> Result<()>;
}

/// Deletes the environment's SSH key material from the project.
#[async_trait]
pub trait GcpKeyPairDeleter: Send + Sync {
    async fn delete(&self, public_key: &str) -> Result<()>;
}
