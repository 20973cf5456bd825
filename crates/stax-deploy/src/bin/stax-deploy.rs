//! Binary entry point for the stax-deploy CLI
//!
//! Loads `.env`, parses arguments, sets up logging, resolves configuration
//! once and dispatches to the command handlers. The process exit code is the
//! handler's status: 0 on success, 1 on any failure, argument errors included.

use clap::Parser;
use stax_deploy::{
	cli::{commands, parse_failure_status, Cli, Commands},
	core::{init_logging, report_failure, Config},
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
	// Load environment variables from .env file if it exists
	let _ = dotenvy::dotenv();

	let cli = match Cli::try_parse() {
		Ok(cli) => cli,
		Err(e) => {
			let _ = e.print();
			return ExitCode::from(parse_failure_status(&e));
		},
	};
	init_logging(cli.debug);

	let config = match Config::discover(cli.config.as_deref()) {
		Ok(config) => config,
		Err(e) => return ExitCode::from(report_failure(&mut std::io::stderr(), &e)),
	};

	let status = match cli.command {
		Commands::Deploy(args) => commands::deploy(&config, &args).await,
		Commands::Networks => commands::networks(&config),
		Commands::Contracts { artifacts } => commands::contracts(&config, artifacts),
	};

	ExitCode::from(status)
}
