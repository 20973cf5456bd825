//! Blockchain connectivity for deployments
//!
//! [`NetworkClient`] is the seam between the deployer and the chain: submit a
//! contract-creation transaction, then wait for its receipt.
//! [`RpcNetworkClient`] implements it over JSON-RPC with alloy, signing
//! through the wallet built from the profile's keys.

use crate::types::{
	error::{Error, Result},
	network::NetworkProfile,
	transaction::{DeploymentReceipt, DeploymentTransaction},
};
use alloy_network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::B256;
use alloy_provider::{PendingTransactionBuilder, Provider as AlloyProvider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Submission and confirmation of deployment transactions.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait NetworkClient: Send + Sync {
	/// Sign and submit the transaction, returning its hash.
	///
	/// Rejections by the node (funds, nonce, gas) surface as
	/// `Error::TransactionRejected`.
	async fn submit(&self, tx: &DeploymentTransaction) -> Result<B256>;

	/// Wait until the transaction is included and return its receipt.
	///
	/// Blocks for as long as the underlying transport allows.
	async fn wait_for_receipt(&self, tx_hash: B256) -> Result<DeploymentReceipt>;
}

/// JSON-RPC client bound to a single network profile
#[derive(Clone)]
pub struct RpcNetworkClient {
	inner: Arc<dyn AlloyProvider + Send + Sync>,
	network: String,
	chain_id: u64,
	confirmations: u64,
}

impl std::fmt::Debug for RpcNetworkClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RpcNetworkClient")
			.field("network", &self.network)
			.field("chain_id", &self.chain_id)
			.field("confirmations", &self.confirmations)
			.field("inner", &"<dyn AlloyProvider>")
			.finish()
	}
}

impl RpcNetworkClient {
	/// Connect to the profile's endpoint and verify the chain it serves
	///
	/// The wallet, when present, signs every transaction sent through this
	/// client. Without one the client can still connect, but submissions
	/// will be rejected by the node.
	///
	/// # Errors
	/// Returns `Error::RpcError` if the URL is invalid or the endpoint does not
	/// answer, and `Error::ChainMismatch` if it serves a different chain than
	/// the profile expects
	pub async fn connect(
		profile: &NetworkProfile,
		wallet: Option<EthereumWallet>,
		confirmations: u64,
	) -> Result<Self> {
		let url = profile
			.rpc_url
			.parse()
			.map_err(|e| Error::RpcError(format!("Invalid RPC URL for {}: {}", profile.name, e)))?;

		let inner: Arc<dyn AlloyProvider + Send + Sync> = match wallet {
			Some(wallet) => Arc::new(ProviderBuilder::new().wallet(wallet).connect_http(url)),
			None => Arc::new(ProviderBuilder::new().connect_http(url)),
		};

		Self::with_provider(profile, inner, confirmations).await
	}

	/// Bind an already built provider to the profile, verifying its chain
	async fn with_provider(
		profile: &NetworkProfile,
		inner: Arc<dyn AlloyProvider + Send + Sync>,
		confirmations: u64,
	) -> Result<Self> {
		let chain_id = inner.get_chain_id().await.map_err(|e| {
			Error::RpcError(format!("Failed to connect to {}: {}", profile.name, e))
		})?;
		verify_chain_id(profile, chain_id)?;

		debug!(network = %profile.name, chain_id, "Connected to network");

		Ok(Self {
			inner,
			network: profile.name.clone(),
			chain_id,
			confirmations: confirmations.max(1),
		})
	}

	/// Chain id reported by the endpoint
	pub fn chain_id(&self) -> u64 {
		self.chain_id
	}
}

#[async_trait]
impl NetworkClient for RpcNetworkClient {
	async fn submit(&self, tx: &DeploymentTransaction) -> Result<B256> {
		let request = TransactionRequest::default()
			.with_from(tx.from)
			.with_chain_id(self.chain_id)
			.with_deploy_code(tx.init_code.clone());

		let pending = self
			.inner
			.send_transaction(request)
			.await
			.map_err(|e| Error::TransactionRejected(e.to_string()))?;

		let tx_hash = *pending.tx_hash();
		info!(network = %self.network, tx_hash = %tx_hash, "Deployment transaction submitted");
		Ok(tx_hash)
	}

	async fn wait_for_receipt(&self, tx_hash: B256) -> Result<DeploymentReceipt> {
		let receipt = PendingTransactionBuilder::new(self.inner.root().clone(), tx_hash)
			.with_required_confirmations(self.confirmations)
			.get_receipt()
			.await
			.map_err(|e| Error::ConfirmationFailed(format!("{}: {}", tx_hash, e)))?;

		Ok(deployment_receipt(&receipt))
	}
}

/// Compare the endpoint's chain id with the one the profile expects
///
/// Profiles without an expected chain id accept any endpoint.
fn verify_chain_id(profile: &NetworkProfile, actual: u64) -> Result<()> {
	match profile.chain_id {
		Some(expected) if expected != actual => Err(Error::ChainMismatch {
			network: profile.name.clone(),
			expected,
			actual,
		}),
		_ => Ok(()),
	}
}

fn deployment_receipt<R: ReceiptResponse>(receipt: &R) -> DeploymentReceipt {
	DeploymentReceipt {
		tx_hash: receipt.transaction_hash(),
		contract_address: receipt.contract_address(),
		success: receipt.status(),
		block_number: receipt.block_number(),
		gas_used: receipt.gas_used(),
	}
}
