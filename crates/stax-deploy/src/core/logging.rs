//! Logging setup and structured operation logs
//!
//! User-facing output (the two address lines, error messages) is written by
//! the deployer to explicit writers. Everything here goes through `tracing`
//! to stderr so stdout stays machine-readable.

use crate::types::error::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize structured logging
///
/// Logs are controlled via RUST_LOG; without it the deployer logs at info
/// (debug with `debug = true`) and other crates at warn.
pub fn init_logging(debug: bool) {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

	let default_filter = if debug {
		"stax_deploy=debug,warn"
	} else {
		"stax_deploy=info,warn"
	};
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	let _ = tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(debug)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.with(env_filter)
		.try_init();
}

/// Log operation start with structured context
pub fn operation_start(operation: &str, context: &str) {
	info!(
		operation = operation,
		context = context,
		"Operation started"
	);
}

/// Record one step of a multi-step operation
pub fn operation_step(operation: &str, step: &str) {
	info!(operation = operation, step = step, "Operation step");
}

/// Log a recoverable oddity that does not stop the operation
pub fn operation_warning(operation: &str, message: &str, context: &str) {
	warn!(
		operation = operation,
		message = message,
		context = context,
		"Operation warning"
	);
}

/// Log operation completion with timing information
pub fn operation_complete(operation: &str, duration_ms: u64) {
	info!(
		operation = operation,
		duration_ms = duration_ms,
		"Operation completed"
	);
}

/// Log operation failure with its error class
pub fn operation_error(operation: &str, err: &Error) {
	error!(
		operation = operation,
		kind = ?err.kind(),
		error = %err,
		"Operation failed"
	);
}
