//! Signing identities for deployment transactions
//!
//! [`SignerProvider`] enumerates the accounts that may authorize a
//! deployment. [`LocalSignerProvider`] backs it with private keys taken from
//! a network profile and exposes them to the RPC client as an alloy wallet.

use crate::types::{
	error::{Error, Result},
	network::NetworkProfile,
};
use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use std::fmt;

/// An account capable of authorizing transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignerIdentity {
	pub address: Address,
}

impl SignerIdentity {
	pub fn new(address: Address) -> Self {
		Self { address }
	}
}

impl fmt::Display for SignerIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.address)
	}
}

/// Source of signer identities for the active network.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait SignerProvider: Send + Sync {
	/// Accounts available for signing, in selection order.
	///
	/// An empty list is not an error here; the caller decides.
	async fn signers(&self) -> Result<Vec<SignerIdentity>>;
}

/// Private-key signers configured for one network profile
pub struct LocalSignerProvider {
	network: String,
	signers: Vec<PrivateKeySigner>,
}

impl fmt::Debug for LocalSignerProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LocalSignerProvider")
			.field("network", &self.network)
			.field(
				"addresses",
				&self.signers.iter().map(|s| s.address()).collect::<Vec<_>>(),
			)
			.finish()
	}
}

impl LocalSignerProvider {
	/// Parse every credential of the profile into a signer
	///
	/// Keys are accepted with or without the 0x prefix. A profile with no
	/// credentials yields an empty provider.
	///
	/// # Errors
	/// Returns `Error::InvalidPrivateKey` naming the position of the first bad key
	pub fn from_profile(profile: &NetworkProfile) -> Result<Self> {
		let mut signers = Vec::with_capacity(profile.accounts.len());

		for (index, credential) in profile.accounts.iter().enumerate() {
			let key = credential.expose().trim();
			let signer = key.parse::<PrivateKeySigner>().map_err(|e| {
				Error::InvalidPrivateKey(format!(
					"account #{} of network {}: {}",
					index, profile.name, e
				))
			})?;
			signers.push(signer);
		}

		Ok(Self {
			network: profile.name.clone(),
			signers,
		})
	}

	pub fn is_empty(&self) -> bool {
		self.signers.is_empty()
	}

	/// Wallet holding every signer, for the RPC client's signing filler
	///
	/// Returns `None` when no key is configured.
	pub fn wallet(&self) -> Option<EthereumWallet> {
		let mut signers = self.signers.iter().cloned();
		let mut wallet = EthereumWallet::new(signers.next()?);
		for signer in signers {
			wallet.register_signer(signer);
		}
		Some(wallet)
	}
}

#[async_trait]
impl SignerProvider for LocalSignerProvider {
	async fn signers(&self) -> Result<Vec<SignerIdentity>> {
		Ok(self
			.signers
			.iter()
			.map(|signer| SignerIdentity::new(signer.address()))
			.collect())
	}
}
