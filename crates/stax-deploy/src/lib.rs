//! Deployment tool for the StaxToken contract
//!
//! Resolves a network profile from the environment and an optional config
//! file, selects the first configured signer, and deploys a compiled
//! contract artifact with no constructor arguments.

pub mod cli;
pub mod constants;
pub mod core;
pub mod types;

pub use core::{
	ArtifactStore, Config, Deployer, FileArtifactStore, LocalSignerProvider, NetworkClient,
	RpcNetworkClient, SignerIdentity, SignerProvider,
};
pub use types::{
	ContractArtifact, DeployedContract, DeploymentReceipt, DeploymentTransaction, Error,
	ErrorKind, NetworkProfile, Result,
};
