//! Network profile types
//!
//! A [`NetworkProfile`] is the resolved, immutable view of one named network:
//! where to send RPC requests, which chain to expect there, and which keys
//! may sign for it.

use std::fmt;

/// Private key material kept out of logs and debug output
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw key material, for handing to the signer
	pub fn expose(&self) -> &str {
		&self.0
	}

	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}

impl fmt::Debug for Credential {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Credential(<redacted>)")
	}
}

impl From<&str> for Credential {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

/// Connection settings for one named network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
	/// Name the profile is selected by ("sepolia", "mainnet", ...)
	pub name: String,
	/// JSON-RPC endpoint
	pub rpc_url: String,
	/// Chain the endpoint is expected to serve, when known
	pub chain_id: Option<u64>,
	/// Signing keys, in selection order
	pub accounts: Vec<Credential>,
}

impl NetworkProfile {
	pub fn new(name: impl Into<String>, rpc_url: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			rpc_url: rpc_url.into(),
			chain_id: None,
			accounts: Vec::new(),
		}
	}

	pub fn with_chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = Some(chain_id);
		self
	}

	pub fn with_account(mut self, credential: Credential) -> Self {
		self.accounts.push(credential);
		self
	}
}

impl fmt::Display for NetworkProfile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.chain_id {
			Some(id) => write!(f, "{} (chain {})", self.name, id),
			None => write!(f, "{}", self.name),
		}
	}
}
