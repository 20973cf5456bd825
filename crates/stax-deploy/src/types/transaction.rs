//! Deployment transaction lifecycle
//!
//! A [`DeploymentTransaction`] moves through
//! `Constructed -> Submitted -> Confirmed | Failed` exactly once. A confirmed
//! transaction yields a single [`DeployedContract`]; terminal states accept no
//! further transitions.

use crate::types::{
	artifact::ContractArtifact,
	error::{Error, Result},
};
use alloy_primitives::{Address, Bytes, B256};
use std::fmt;

/// Lifecycle state of a deployment transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxState {
	Constructed,
	Submitted { tx_hash: B256 },
	Confirmed { tx_hash: B256 },
	Failed { reason: String },
}

impl fmt::Display for TxState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Constructed => write!(f, "constructed"),
			Self::Submitted { .. } => write!(f, "submitted"),
			Self::Confirmed { .. } => write!(f, "confirmed"),
			Self::Failed { .. } => write!(f, "failed"),
		}
	}
}

/// Outcome the network reports once a submitted transaction is included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReceipt {
	pub tx_hash: B256,
	pub contract_address: Option<Address>,
	/// False when execution reverted
	pub success: bool,
	pub block_number: Option<u64>,
	pub gas_used: u64,
}

/// Handle to a contract instance created by a confirmed deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
	pub contract: String,
	pub address: Address,
	pub tx_hash: B256,
	pub block_number: Option<u64>,
}

/// Contract-creation request with no constructor arguments
#[derive(Debug, Clone)]
pub struct DeploymentTransaction {
	/// Name of the artifact being deployed
	pub contract: String,
	/// Deploying account
	pub from: Address,
	/// Creation bytecode sent as transaction input
	pub init_code: Bytes,
	state: TxState,
}

impl DeploymentTransaction {
	/// Build a contract-creation transaction from an artifact
	///
	/// # Errors
	/// Returns `Error::InvalidArtifact` if the artifact cannot be deployed without arguments
	pub fn new(artifact: &ContractArtifact, from: Address) -> Result<Self> {
		artifact.ensure_deployable()?;

		Ok(Self {
			contract: artifact.name.clone(),
			from,
			init_code: artifact.bytecode.clone(),
			state: TxState::Constructed,
		})
	}

	pub fn state(&self) -> &TxState {
		&self.state
	}

	pub fn tx_hash(&self) -> Option<B256> {
		match &self.state {
			TxState::Submitted { tx_hash } | TxState::Confirmed { tx_hash } => Some(*tx_hash),
			_ => None,
		}
	}

	/// Record that the network accepted the transaction
	pub fn mark_submitted(&mut self, tx_hash: B256) -> Result<()> {
		match self.state {
			TxState::Constructed => {
				self.state = TxState::Submitted { tx_hash };
				Ok(())
			},
			ref other => Err(Error::InvalidTransition(format!(
				"cannot submit a {} transaction",
				other
			))),
		}
	}

	/// Apply the inclusion receipt and produce the deployed contract handle
	///
	/// A receipt for another transaction, a reverted receipt, or one without a
	/// contract address moves the transaction to `Failed` and returns the
	/// matching confirmation error.
	pub fn confirm(&mut self, receipt: &DeploymentReceipt) -> Result<DeployedContract> {
		let tx_hash = match self.state {
			TxState::Submitted { tx_hash } => tx_hash,
			ref other => {
				return Err(Error::InvalidTransition(format!(
					"cannot confirm a {} transaction",
					other
				)))
			},
		};

		if receipt.tx_hash != tx_hash {
			self.state = TxState::Failed {
				reason: "receipt hash mismatch".to_string(),
			};
			return Err(Error::ConfirmationFailed(format!(
				"receipt for {} does not match submitted {}",
				receipt.tx_hash, tx_hash
			)));
		}

		if !receipt.success {
			self.state = TxState::Failed {
				reason: "reverted".to_string(),
			};
			return Err(Error::Reverted(tx_hash));
		}

		let address = match receipt.contract_address {
			Some(address) => address,
			None => {
				self.state = TxState::Failed {
					reason: "no contract address".to_string(),
				};
				return Err(Error::MissingContractAddress(tx_hash));
			},
		};

		self.state = TxState::Confirmed { tx_hash };
		Ok(DeployedContract {
			contract: self.contract.clone(),
			address,
			tx_hash,
			block_number: receipt.block_number,
		})
	}

	/// Move the transaction to `Failed`; terminal states are left untouched
	pub fn mark_failed(&mut self, reason: impl Into<String>) {
		if matches!(
			self.state,
			TxState::Constructed | TxState::Submitted { .. }
		) {
			self.state = TxState::Failed {
				reason: reason.into(),
			};
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_json_abi::JsonAbi;
	use std::path::PathBuf;

	fn artifact() -> ContractArtifact {
		ContractArtifact {
			name: "StaxToken".to_string(),
			abi: JsonAbi::default(),
			bytecode: Bytes::from(vec![0x60, 0x80]),
			compiler_version: None,
			source: PathBuf::from("StaxToken.json"),
		}
	}

	fn receipt(tx_hash: B256, success: bool) -> DeploymentReceipt {
		DeploymentReceipt {
			tx_hash,
			contract_address: Some(Address::repeat_byte(0xBB)),
			success,
			block_number: Some(7),
			gas_used: 21_000,
		}
	}

	#[test]
	fn test_lifecycle_to_confirmed() {
		let hash = B256::repeat_byte(0x01);
		let mut tx = DeploymentTransaction::new(&artifact(), Address::repeat_byte(0xAA)).unwrap();
		assert_eq!(tx.state(), &TxState::Constructed);
		assert_eq!(tx.tx_hash(), None);

		tx.mark_submitted(hash).unwrap();
		assert_eq!(tx.tx_hash(), Some(hash));

		let deployed = tx.confirm(&receipt(hash, true)).unwrap();
		assert_eq!(deployed.address, Address::repeat_byte(0xBB));
		assert_eq!(deployed.block_number, Some(7));
		assert_eq!(tx.state(), &TxState::Confirmed { tx_hash: hash });
	}

	#[test]
	fn test_confirmation_is_one_way() {
		let hash = B256::repeat_byte(0x01);
		let mut tx = DeploymentTransaction::new(&artifact(), Address::ZERO).unwrap();
		tx.mark_submitted(hash).unwrap();
		tx.confirm(&receipt(hash, true)).unwrap();

		assert!(matches!(
			tx.confirm(&receipt(hash, true)),
			Err(Error::InvalidTransition(_))
		));
		assert!(tx.mark_submitted(hash).is_err());

		tx.mark_failed("late failure");
		assert_eq!(tx.state(), &TxState::Confirmed { tx_hash: hash });
	}

	#[test]
	fn test_confirm_requires_submission() {
		let mut tx = DeploymentTransaction::new(&artifact(), Address::ZERO).unwrap();
		let err = tx.confirm(&receipt(B256::ZERO, true)).unwrap_err();
		assert!(err.to_string().contains("cannot confirm a constructed transaction"));
	}

	#[test]
	fn test_reverted_receipt_fails_transaction() {
		let hash = B256::repeat_byte(0x02);
		let mut tx = DeploymentTransaction::new(&artifact(), Address::ZERO).unwrap();
		tx.mark_submitted(hash).unwrap();

		assert!(matches!(
			tx.confirm(&receipt(hash, false)),
			Err(Error::Reverted(h)) if h == hash
		));
		assert!(matches!(tx.state(), TxState::Failed { .. }));
	}

	#[test]
	fn test_receipt_without_address() {
		let hash = B256::repeat_byte(0x03);
		let mut tx = DeploymentTransaction::new(&artifact(), Address::ZERO).unwrap();
		tx.mark_submitted(hash).unwrap();

		let mut bad = receipt(hash, true);
		bad.contract_address = None;
		assert!(matches!(
			tx.confirm(&bad),
			Err(Error::MissingContractAddress(_))
		));
	}

	#[test]
	fn test_mismatched_receipt_hash() {
		let mut tx = DeploymentTransaction::new(&artifact(), Address::ZERO).unwrap();
		tx.mark_submitted(B256::repeat_byte(0x04)).unwrap();
		assert!(matches!(
			tx.confirm(&receipt(B256::repeat_byte(0x05), true)),
			Err(Error::ConfirmationFailed(_))
		));
		assert_eq!(
			tx.state(),
			&TxState::Failed {
				reason: "receipt hash mismatch".to_string()
			}
		);
		assert!(tx.confirm(&receipt(B256::repeat_byte(0x04), true)).is_err());
	}
}
