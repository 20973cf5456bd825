//! Contract deployment
//!
//! The [`Deployer`] runs the whole flow once: pick the first signer, announce
//! it, load the artifact, submit a contract-creation transaction, wait for
//! the receipt and announce the new address. Its collaborators are injected
//! so the flow can run against a real node or against fakes.

use crate::core::{
	artifacts::ArtifactStore,
	blockchain::NetworkClient,
	logging::{operation_complete, operation_error, operation_start, operation_step, operation_warning},
	signing::SignerProvider,
};
use crate::constants;
use crate::types::{
	error::{Error, Result},
	transaction::{DeployedContract, DeploymentTransaction},
};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Process exit status for a successful deployment
pub const EXIT_SUCCESS: u8 = 0;

/// Process exit status for any failure
pub const EXIT_FAILURE: u8 = 1;

const OPERATION: &str = "deploy";

/// Deploys one named contract to one network
pub struct Deployer {
	network: String,
	contract: String,
	solc_version: Option<String>,
	client: Arc<dyn NetworkClient>,
	signers: Arc<dyn SignerProvider>,
	artifacts: Arc<dyn ArtifactStore>,
}

impl std::fmt::Debug for Deployer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Deployer")
			.field("network", &self.network)
			.field("contract", &self.contract)
			.field("solc_version", &self.solc_version)
			.finish_non_exhaustive()
	}
}

impl Deployer {
	/// Create a deployer for `network` that deploys the default contract
	pub fn new(
		network: impl Into<String>,
		client: Arc<dyn NetworkClient>,
		signers: Arc<dyn SignerProvider>,
		artifacts: Arc<dyn ArtifactStore>,
	) -> Self {
		Self {
			network: network.into(),
			contract: constants::DEFAULT_CONTRACT.to_string(),
			solc_version: None,
			client,
			signers,
			artifacts,
		}
	}

	/// Deploy a different artifact
	pub fn with_contract(mut self, contract: impl Into<String>) -> Self {
		self.contract = contract.into();
		self
	}

	/// Warn when the artifact was built by another compiler version
	pub fn with_solc_version(mut self, version: impl Into<String>) -> Self {
		self.solc_version = Some(version.into());
		self
	}

	pub fn contract(&self) -> &str {
		&self.contract
	}

	/// Label of the contract address line
	///
	/// The default token is announced as `Token address: ...`; any other
	/// contract by its own name.
	fn address_label(&self) -> &str {
		if self.contract == constants::DEFAULT_CONTRACT {
			constants::DEFAULT_CONTRACT_LABEL
		} else {
			&self.contract
		}
	}

	/// Deploy the contract, writing the deployer and contract addresses to `out`
	///
	/// # Errors
	/// Any failure of the flow is returned unchanged; nothing is retried
	pub async fn deploy<W: Write + ?Sized>(&self, out: &mut W) -> Result<DeployedContract> {
		let started = Instant::now();
		operation_start(
			OPERATION,
			&format!("{} on {}", self.contract, self.network),
		);

		let signers = self.signers.signers().await?;
		let deployer = signers
			.first()
			.copied()
			.ok_or_else(|| Error::NoSigner(self.network.clone()))?;
		debug!(available = signers.len(), selected = %deployer, "Selected deploying account");

		writeln!(out, "Deploying contracts with the account: {}", deployer)?;

		let artifact = self.artifacts.load(&self.contract)?;
		if let Some(expected) = &self.solc_version {
			if !artifact.compiled_with(expected) {
				operation_warning(
					OPERATION,
					"artifact compiler version differs from configuration",
					&format!(
						"expected {}, artifact built with {}",
						expected,
						artifact.compiler_version.as_deref().unwrap_or("unknown")
					),
				);
			}
		}

		let mut tx = DeploymentTransaction::new(&artifact, deployer.address)?;
		operation_step(OPERATION, "submitting");

		let tx_hash = match self.client.submit(&tx).await {
			Ok(hash) => hash,
			Err(e) => {
				tx.mark_failed(e.to_string());
				return Err(e);
			},
		};
		tx.mark_submitted(tx_hash)?;
		operation_step(OPERATION, "awaiting confirmation");

		let receipt = match self.client.wait_for_receipt(tx_hash).await {
			Ok(receipt) => receipt,
			Err(e) => {
				tx.mark_failed(e.to_string());
				return Err(e);
			},
		};
		let deployed = tx.confirm(&receipt)?;

		// Logged ahead of stdout: the contract is on-chain even if the write fails
		info!(
			contract = %deployed.contract,
			address = %deployed.address,
			tx_hash = %deployed.tx_hash,
			block = ?deployed.block_number,
			gas_used = receipt.gas_used,
			"Contract deployed"
		);

		writeln!(out, "{} address: {}", self.address_label(), deployed.address)?;
		operation_complete(OPERATION, started.elapsed().as_millis() as u64);

		Ok(deployed)
	}

	/// Deploy and map the outcome to a process exit status
	///
	/// Addresses go to `out`; on failure the error goes to `err`.
	pub async fn run<W, E>(&self, out: &mut W, err: &mut E) -> u8
	where
		W: Write + ?Sized,
		E: Write + ?Sized,
	{
		match self.deploy(out).await {
			Ok(_) => EXIT_SUCCESS,
			Err(e) => report_failure(err, &e),
		}
	}
}

/// Log the error, write it to `err` and return the failure status
pub fn report_failure<E: Write + ?Sized>(err: &mut E, error: &Error) -> u8 {
	operation_error(OPERATION, error);
	let _ = writeln!(err, "Error: {}", error);
	EXIT_FAILURE
}
