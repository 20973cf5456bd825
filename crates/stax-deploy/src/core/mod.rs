//! Core deployer components
//!
//! Configuration, the three injected seams (network client, signer provider,
//! artifact store) with their production implementations, the deployer
//! itself and logging setup.

pub mod artifacts;
pub mod blockchain;
pub mod config;
pub mod deployer;
pub mod logging;
pub mod signing;

pub use artifacts::{ArtifactStore, FileArtifactStore};
pub use blockchain::{NetworkClient, RpcNetworkClient};
pub use config::Config;
pub use deployer::{report_failure, Deployer, EXIT_FAILURE, EXIT_SUCCESS};
pub use logging::init_logging;
pub use signing::{LocalSignerProvider, SignerIdentity, SignerProvider};
