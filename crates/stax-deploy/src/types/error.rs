//! Error types and result handling for the deployer
//!
//! Every failure the deploy flow can hit is a variant of [`Error`]. Variants
//! are grouped into a small taxonomy ([`ErrorKind`]) so callers and tests can
//! reason about the class of failure without matching on messages.

use alloy_primitives::B256;
use std::path::PathBuf;

/// Convenience Result type alias using the local Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure classes of a deployment run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Missing or invalid endpoint, credential or configuration value
	Configuration,
	/// The named contract artifact does not exist
	ArtifactNotFound,
	/// The artifact exists but cannot be deployed as-is
	InvalidArtifact,
	/// The network refused the deployment transaction
	Transaction,
	/// The transaction was not confirmed, or was confirmed but reverted
	Confirmation,
}

/// Error type for all deployer operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
	// Configuration errors
	#[error("Unknown network: {0}")]
	UnknownNetwork(String),

	#[error("Missing environment variable: {0}")]
	MissingEnv(String),

	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("Configuration file not found: {0}")]
	ConfigNotFound(PathBuf),

	#[error("Invalid private key: {0}")]
	InvalidPrivateKey(String),

	#[error("No signer available for network {0}")]
	NoSigner(String),

	#[error("RPC connection failed: {0}")]
	RpcError(String),

	#[error("Chain ID mismatch on {network}: expected {expected}, endpoint reports {actual}")]
	ChainMismatch {
		network: String,
		expected: u64,
		actual: u64,
	},

	// Artifact errors
	#[error("Contract artifact {name} not found in {}", .dir.display())]
	ArtifactNotFound { name: String, dir: PathBuf },

	#[error("Invalid artifact {0}: {1}")]
	InvalidArtifact(String, String),

	// Transaction errors
	#[error("Transaction rejected: {0}")]
	TransactionRejected(String),

	#[error("Invalid transaction state: {0}")]
	InvalidTransition(String),

	// Confirmation errors
	#[error("Deployment transaction {0} reverted")]
	Reverted(B256),

	#[error("No contract address in receipt for {0}")]
	MissingContractAddress(B256),

	#[error("Confirmation failed: {0}")]
	ConfirmationFailed(String),

	// IO errors
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	// JSON errors
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	// TOML errors
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
}

impl Error {
	/// Classify the error into its failure class
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::UnknownNetwork(_)
			| Error::MissingEnv(_)
			| Error::InvalidConfig(_)
			| Error::ConfigNotFound(_)
			| Error::InvalidPrivateKey(_)
			| Error::NoSigner(_)
			| Error::RpcError(_)
			| Error::ChainMismatch { .. }
			| Error::Io(_)
			| Error::Toml(_) => ErrorKind::Configuration,
			Error::ArtifactNotFound { .. } => ErrorKind::ArtifactNotFound,
			Error::InvalidArtifact(..) | Error::Json(_) => ErrorKind::InvalidArtifact,
			Error::TransactionRejected(_) | Error::InvalidTransition(_) => ErrorKind::Transaction,
			Error::Reverted(_) | Error::MissingContractAddress(_) | Error::ConfirmationFailed(_) => {
				ErrorKind::Confirmation
			},
		}
	}
}
