//! Command-line interface definitions and handlers
//!
//! Defines the clap command surface and the handlers that wire configuration
//! into a [`Deployer`](crate::core::Deployer).

pub mod commands;
pub mod output;

use crate::constants::env_vars;
use crate::core::{EXIT_FAILURE, EXIT_SUCCESS};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Deploys the StaxToken contract to a configured network
#[derive(Parser, Debug)]
#[command(name = "stax-deploy")]
#[command(about = "Deploy compiled contracts to a configured EVM network")]
#[command(version)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,

	/// Config file path (defaults to ./stax-deploy.toml when present)
	#[arg(global = true, long, env = env_vars::CONFIG)]
	pub config: Option<PathBuf>,

	/// Enable debug logging
	#[arg(global = true, long)]
	pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Deploy a contract and print the deployer and contract addresses
	Deploy(DeployArgs),

	/// List the networks that can be selected
	Networks,

	/// List the contract artifacts found in the artifacts directory
	Contracts {
		/// Compiled artifacts directory (overrides the config file)
		#[arg(long)]
		artifacts: Option<PathBuf>,
	},
}

#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
	/// Network to deploy to (sepolia, holesky, mainnet, polygon or a configured name)
	#[arg(short, long, env = env_vars::NETWORK)]
	pub network: String,

	/// Contract artifact to deploy (overrides the config file)
	#[arg(long)]
	pub contract: Option<String>,

	/// Compiled artifacts directory (overrides the config file)
	#[arg(long)]
	pub artifacts: Option<PathBuf>,

	/// Confirmations to wait for (overrides the config file)
	#[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
	pub confirmations: Option<u64>,
}

/// Exit status for a command line clap did not accept
///
/// `--help` and `--version` end parsing early and still succeed; every
/// other parse error, a missing `--network` included, is a failure.
pub fn parse_failure_status(err: &clap::Error) -> u8 {
	if err.use_stderr() {
		EXIT_FAILURE
	} else {
		EXIT_SUCCESS
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn test_cli_is_well_formed() {
		Cli::command().debug_assert();
	}

	#[test]
	fn test_parse_deploy() {
		let cli = Cli::try_parse_from([
			"stax-deploy",
			"deploy",
			"--network",
			"holesky",
			"--confirmations",
			"2",
		])
		.unwrap();

		match cli.command {
			Commands::Deploy(args) => {
				assert_eq!(args.network, "holesky");
				assert_eq!(args.confirmations, Some(2));
				assert!(args.contract.is_none());
			},
			other => panic!("unexpected command {:?}", other),
		}
	}

	#[test]
	fn test_zero_confirmations_rejected() {
		let result = Cli::try_parse_from([
			"stax-deploy",
			"deploy",
			"--network",
			"sepolia",
			"--confirmations",
			"0",
		]);
		assert!(result.is_err());
	}

	#[test]
	fn test_missing_network_is_a_failure() {
		let err = Cli::try_parse_from(["stax-deploy", "deploy"]).unwrap_err();
		assert_eq!(
			err.kind(),
			clap::error::ErrorKind::MissingRequiredArgument
		);
		assert_eq!(parse_failure_status(&err), EXIT_FAILURE);
	}

	#[test]
	fn test_unknown_flag_is_a_failure() {
		let err = Cli::try_parse_from(["stax-deploy", "deploy", "--network", "sepolia", "--bogus"])
			.unwrap_err();
		assert_eq!(parse_failure_status(&err), EXIT_FAILURE);
	}

	#[test]
	fn test_help_and_version_succeed() {
		let help = Cli::try_parse_from(["stax-deploy", "--help"]).unwrap_err();
		assert_eq!(parse_failure_status(&help), EXIT_SUCCESS);

		let version = Cli::try_parse_from(["stax-deploy", "--version"]).unwrap_err();
		assert_eq!(parse_failure_status(&version), EXIT_SUCCESS);
	}
}
