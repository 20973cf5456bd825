//! Constants shared across the deployer

/// Contract deployed when none is named explicitly
pub const DEFAULT_CONTRACT: &str = "StaxToken";

/// How the default contract is named on the address line
pub const DEFAULT_CONTRACT_LABEL: &str = "Token";

/// Compiler version the contracts are built with
pub const DEFAULT_SOLC_VERSION: &str = "0.8.20";

/// Directory holding compiled artifacts (Hardhat layout)
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "stax-deploy.toml";

/// Confirmations awaited before a deployment counts as confirmed
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// Environment variable names
pub mod env_vars {
	pub const INFURA_PROJECT_ID: &str = "INFURA_PROJECT_ID";
	pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
	pub const NETWORK: &str = "STAX_NETWORK";
	pub const CONFIG: &str = "STAX_CONFIG";
}

/// A network reachable through Infura without any config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinNetwork {
	pub name: &'static str,
	pub infura_subdomain: &'static str,
	pub chain_id: u64,
}

/// Networks available out of the box
pub const BUILTIN_NETWORKS: &[BuiltinNetwork] = &[
	BuiltinNetwork {
		name: "sepolia",
		infura_subdomain: "sepolia",
		chain_id: 11155111,
	},
	BuiltinNetwork {
		name: "holesky",
		infura_subdomain: "holesky",
		chain_id: 17000,
	},
	BuiltinNetwork {
		name: "mainnet",
		infura_subdomain: "mainnet",
		chain_id: 1,
	},
	BuiltinNetwork {
		name: "polygon",
		infura_subdomain: "polygon-mainnet",
		chain_id: 137,
	},
];

/// Look up a built-in network by name
pub fn builtin_network(name: &str) -> Option<&'static BuiltinNetwork> {
	BUILTIN_NETWORKS.iter().find(|network| network.name == name)
}

impl BuiltinNetwork {
	/// Infura endpoint for this network under the given project id
	pub fn infura_url(&self, project_id: &str) -> String {
		format!(
			"https://{}.infura.io/v3/{}",
			self.infura_subdomain, project_id
		)
	}
}
