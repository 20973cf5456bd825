//! Command handlers
//!
//! Each handler returns the process exit status. Configuration is resolved
//! by the caller and passed in.

use crate::cli::{output::Display, DeployArgs};
use crate::core::{
	report_failure, Config, Deployer, FileArtifactStore, LocalSignerProvider, RpcNetworkClient,
	EXIT_FAILURE, EXIT_SUCCESS,
};
use crate::types::error::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Wire the production collaborators for one deployment
///
/// # Errors
/// Fails if the network is unknown or incomplete, has no usable key, or the
/// endpoint cannot be reached or serves the wrong chain. Credentials are
/// checked before any connection is attempted.
pub async fn build_deployer(config: &Config, args: &DeployArgs) -> Result<Deployer> {
	let profile = config.network(&args.network)?;
	info!(network = %profile, "Resolved network profile");

	let signers = LocalSignerProvider::from_profile(&profile)?;
	if signers.is_empty() {
		return Err(Error::NoSigner(profile.name.clone()));
	}

	let confirmations = args.confirmations.unwrap_or(config.deploy.confirmations);
	let client = RpcNetworkClient::connect(&profile, signers.wallet(), confirmations).await?;

	let artifacts_dir = args
		.artifacts
		.clone()
		.unwrap_or_else(|| config.deploy.artifacts_dir.clone());
	let contract = args
		.contract
		.clone()
		.unwrap_or_else(|| config.deploy.contract.clone());

	Ok(Deployer::new(
		profile.name.clone(),
		Arc::new(client),
		Arc::new(signers),
		Arc::new(FileArtifactStore::new(artifacts_dir)),
	)
	.with_contract(contract)
	.with_solc_version(config.compiler.solc_version.clone()))
}

/// Run a deployment against stdout and stderr
pub async fn deploy(config: &Config, args: &DeployArgs) -> u8 {
	let mut stdout = std::io::stdout();
	let mut stderr = std::io::stderr();

	match build_deployer(config, args).await {
		Ok(deployer) => deployer.run(&mut stdout, &mut stderr).await,
		Err(e) => report_failure(&mut stderr, &e),
	}
}

/// Print every selectable network and whether it is ready to use
pub fn networks(config: &Config) -> u8 {
	Display::header("Networks");

	for name in config.network_names() {
		match config.network(&name) {
			Ok(profile) => {
				let chain = profile
					.chain_id
					.map(|id| id.to_string())
					.unwrap_or_else(|| "?".to_string());
				Display::kv(
					&name,
					&format!("chain {}, {} account(s)", chain, profile.accounts.len()),
				);
			},
			Err(e) => Display::kv(&name, &format!("unavailable ({})", e)),
		}
	}

	EXIT_SUCCESS
}

/// Print the contract artifacts available for deployment
pub fn contracts(config: &Config, artifacts: Option<PathBuf>) -> u8 {
	let dir = artifacts.unwrap_or_else(|| config.deploy.artifacts_dir.clone());
	let store = FileArtifactStore::new(dir);

	match store.available() {
		Ok(names) if names.is_empty() => {
			Display::warning(&format!(
				"No artifacts in {}; run the compiler first",
				store.root().display()
			));
			EXIT_SUCCESS
		},
		Ok(names) => {
			Display::header(&format!("Artifacts in {}", store.root().display()));
			for name in names {
				println!("  {}", name);
			}
			EXIT_SUCCESS
		},
		Err(e) => {
			Display::error(&e.to_string());
			EXIT_FAILURE
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn args(network: &str) -> DeployArgs {
		DeployArgs {
			network: network.to_string(),
			contract: None,
			artifacts: None,
			confirmations: None,
		}
	}

	#[tokio::test]
	async fn test_unknown_network_fails_before_connecting() {
		let config = Config::from_lookup(|_| None);
		let err = build_deployer(&config, &args("goerli")).await.unwrap_err();
		assert!(matches!(err, Error::UnknownNetwork(_)));
	}

	#[tokio::test]
	async fn test_missing_project_id() {
		let config = Config::from_lookup(|_| None);
		let err = build_deployer(&config, &args("sepolia")).await.unwrap_err();
		assert!(matches!(err, Error::MissingEnv(_)));
	}

	#[tokio::test]
	async fn test_malformed_key() {
		let config = Config::from_lookup(|name| match name {
			"INFURA_PROJECT_ID" => Some("abc".to_string()),
			"PRIVATE_KEY" => Some("not-a-key".to_string()),
			_ => None,
		});
		let err = build_deployer(&config, &args("mainnet")).await.unwrap_err();
		assert!(matches!(err, Error::InvalidPrivateKey(_)));
	}

	#[tokio::test]
	async fn test_missing_key_reported_before_connecting() {
		// Nothing listens on the discard port; reaching it would fail with an RPC error
		let config = Config::from_toml_str(
			"[networks.local]\nurl = \"http://127.0.0.1:9\"\nchain_id = 31337\n",
			|_: &str| None,
		)
		.unwrap();

		let err = build_deployer(&config, &args("local")).await.unwrap_err();
		assert!(matches!(err, Error::NoSigner(ref network) if network == "local"));
		assert_eq!(
			err.to_string(),
			"No signer available for network local"
		);
	}

	#[tokio::test]
	async fn test_missing_key_status() {
		let config = Config::from_toml_str(
			"[networks.local]\nurl = \"http://127.0.0.1:9\"\n",
			|_: &str| None,
		)
		.unwrap();
		assert_eq!(deploy(&config, &args("local")).await, EXIT_FAILURE);
	}

	#[test]
	fn test_contracts_listing_on_missing_dir() {
		let config = Config::from_lookup(|_| None);
		let status = contracts(&config, Some(PathBuf::from("/nonexistent/artifacts")));
		assert_eq!(status, EXIT_SUCCESS);
	}
}
