//! Groundwork Cloud
//!
//! Collaborator contracts for the cloud back ends Groundwork manages, and
//! the destroy orchestrator that drives them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                groundwork CLI                    │
//! │             (groundwork destroy)                 │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │              groundwork-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        Destroy orchestrator               │   │
//! │  │  guard → director → provider dispatch     │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │  capability  │  │  checkpoint  │            │
//! │  │    traits    │  │   writing    │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │      aws      │ │      gcp      │
//! │  (stack path) │ │ (terraform)   │
//! └───────────────┘ └───────────────┘
//! ```
//!
//! The orchestrator never talks to a cloud API directly; every external
//! effect goes through a narrow trait so the sequencing, checkpointing and
//! error-aggregation rules can be exercised against recording fakes.

pub mod aws;
pub mod credentials;
pub mod destroy;
pub mod director;
pub mod error;
pub mod gcp;
pub mod ui;

// Re-exports
pub use aws::{AwsKeyPairDeleter, CertificateDeleter, Stack, StackDeleter, StackDescriber,
    VpcStatusChecker};
pub use credentials::{CredentialValidator, StoredCredentialValidator};
pub use destroy::{Destroy, DestroyDeps, DestroyFlags};
pub use director::{DirectorError, DirectorManager};
pub use error::{CloudError, Result, MINIMUM_TERRAFORM_VERSION};
pub use gcp::{
    GcpKeyPairDeleter, NetworkInstancesChecker, TerraformDestroyError, TerraformDestroyInput,
    TerraformExecutor, TerraformOutputResolver, TerraformOutputs,
};
pub use ui::{TerminalUi, Ui};
