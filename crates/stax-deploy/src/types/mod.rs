//! Domain types for the deployer
//!
//! Network profiles, compiled artifacts, the deployment transaction
//! lifecycle and the error taxonomy.

pub mod artifact;
pub mod error;
pub mod network;
pub mod transaction;

pub use artifact::ContractArtifact;
pub use error::{Error, ErrorKind, Result};
pub use network::{Credential, NetworkProfile};
pub use transaction::{DeployedContract, DeploymentReceipt, DeploymentTransaction, TxState};
