//! Groundwork GCP back end
//!
//! Implements the Terraform-path collaborator contracts: `terraform` runs
//! the destroy itself, `gcloud` answers the network occupancy check and
//! removes the project SSH key, and the output resolver reads the live
//! identifiers straight out of the recorded Terraform state.

pub mod error;
pub mod gcloud;
pub mod provider;
pub mod terraform;

// Re-exports
pub use error::{GcpError, Result};
pub use gcloud::Gcloud;
pub use provider::{ComputeEngine, StateOutputResolver};
pub use terraform::TerraformCli;
