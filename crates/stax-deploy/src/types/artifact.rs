//! Compiled contract artifacts
//!
//! Parses the JSON artifacts emitted by Hardhat (`bytecode` as a hex string)
//! and Foundry (`bytecode.object`, compiler version under `metadata`).

use crate::types::error::{Error, Result};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{hex, Bytes};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Compiled contract: interface, creation bytecode and provenance
#[derive(Debug, Clone)]
pub struct ContractArtifact {
	pub name: String,
	pub abi: JsonAbi,
	pub bytecode: Bytes,
	/// Full compiler version when the artifact records it, e.g. `0.8.20+commit.a1b79de6`
	pub compiler_version: Option<String>,
	/// File the artifact was read from
	pub source: PathBuf,
}

impl ContractArtifact {
	/// Build an artifact from its parsed JSON document
	///
	/// # Errors
	/// Returns `Error::InvalidArtifact` if the ABI or bytecode is missing or malformed
	pub fn from_json(name: &str, json: &Value, source: &Path) -> Result<Self> {
		let abi = json
			.get("abi")
			.ok_or_else(|| Error::InvalidArtifact(name.to_string(), "no abi field".to_string()))?;
		let abi: JsonAbi = serde_json::from_value(abi.clone())
			.map_err(|e| Error::InvalidArtifact(name.to_string(), format!("bad abi: {}", e)))?;

		let bytecode = extract_bytecode(name, json)?;

		let compiler_version = json
			.pointer("/metadata/compiler/version")
			.and_then(Value::as_str)
			.map(str::to_string);

		Ok(Self {
			name: name.to_string(),
			abi,
			bytecode,
			compiler_version,
			source: source.to_path_buf(),
		})
	}

	/// Number of arguments the constructor expects
	pub fn constructor_arity(&self) -> usize {
		self.abi
			.constructor()
			.map(|constructor| constructor.inputs.len())
			.unwrap_or(0)
	}

	/// Check that the artifact can be deployed without constructor arguments
	///
	/// # Errors
	/// Returns `Error::InvalidArtifact` for empty bytecode or a constructor with inputs
	pub fn ensure_deployable(&self) -> Result<()> {
		if self.bytecode.is_empty() {
			return Err(Error::InvalidArtifact(
				self.name.clone(),
				"empty bytecode (abstract contract or interface?)".to_string(),
			));
		}

		let arity = self.constructor_arity();
		if arity > 0 {
			return Err(Error::InvalidArtifact(
				self.name.clone(),
				format!("constructor expects {} argument(s), none are supplied", arity),
			));
		}

		Ok(())
	}

	/// Whether the recorded compiler version matches `expected` (e.g. `0.8.20`)
	///
	/// Artifacts without a recorded version are assumed to match.
	pub fn compiled_with(&self, expected: &str) -> bool {
		match &self.compiler_version {
			Some(version) => {
				let version = version.strip_prefix('v').unwrap_or(version);
				version == expected || version.starts_with(&format!("{}+", expected))
			},
			None => true,
		}
	}
}

fn extract_bytecode(name: &str, json: &Value) -> Result<Bytes> {
	let bytecode = match json.get("bytecode") {
		Some(Value::String(code)) => code.as_str(),
		Some(Value::Object(obj)) => obj.get("object").and_then(Value::as_str).ok_or_else(|| {
			Error::InvalidArtifact(name.to_string(), "no bytecode.object field".to_string())
		})?,
		_ => {
			return Err(Error::InvalidArtifact(
				name.to_string(),
				"no bytecode field".to_string(),
			))
		},
	};

	let hex_str = bytecode.strip_prefix("0x").unwrap_or(bytecode);

	hex::decode(hex_str)
		.map(Bytes::from)
		.map_err(|e| Error::InvalidArtifact(name.to_string(), format!("bad bytecode hex: {}", e)))
}
