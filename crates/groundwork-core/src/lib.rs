//! Groundwork Core
//!
//! Persisted environment state for the Groundwork bootstrapper: the
//! `.groundwork/state.json` aggregate that records everything provisioned
//! for an environment, plus the file-backed store and schema validation
//! used to load, checkpoint and sanity-check it.

pub mod error;
pub mod state;
pub mod store;

// Re-exports
pub use error::{Result, StateError};
pub use state::{
    AwsCredentials, DirectorState, EnvState, GcpCredentials, Iaas, KeyPair, StackState,
};
pub use store::{FileStateStore, SchemaValidator, StateStore, StateValidator, STATE_VERSION};
