//! Contract artifact lookup
//!
//! Artifacts are produced by an external compiler step. The filesystem store
//! understands both the Foundry layout (`out/<Name>.sol/<Name>.json`) and the
//! Hardhat layout (`artifacts/contracts/**/<Name>.sol/<Name>.json`).

use crate::types::{
	artifact::ContractArtifact,
	error::{Error, Result},
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read-only source of compiled contract artifacts.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactStore: Send + Sync {
	/// Load the artifact with the given contract name.
	///
	/// Fails with `Error::ArtifactNotFound` when no such artifact exists.
	fn load(&self, name: &str) -> Result<ContractArtifact>;
}

/// Artifact store over a compiler output directory
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
	root: PathBuf,
}

impl FileArtifactStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Find the artifact file for a contract name
	fn locate(&self, name: &str) -> Result<Option<PathBuf>> {
		let file_name = format!("{}.json", name);
		let dir_name = format!("{}.sol", name);

		// Foundry keeps every contract directly under the output root
		let direct = self.root.join(&dir_name).join(&file_name);
		if direct.is_file() {
			return Ok(Some(direct));
		}

		if !self.root.is_dir() {
			return Ok(None);
		}

		let mut pending = vec![self.root.clone()];
		while let Some(dir) = pending.pop() {
			for entry in std::fs::read_dir(&dir)? {
				let path = entry?.path();
				if !path.is_dir() {
					continue;
				}

				let candidate = path.join(&file_name);
				if path.file_name().and_then(|n| n.to_str()) == Some(dir_name.as_str())
					&& candidate.is_file()
				{
					return Ok(Some(candidate));
				}

				// build-info holds compiler input/output, never artifacts
				if path.file_name().and_then(|n| n.to_str()) != Some("build-info") {
					pending.push(path);
				}
			}
		}

		Ok(None)
	}

	/// Names of every contract artifact under the root, sorted
	pub fn available(&self) -> Result<Vec<String>> {
		let mut contracts = Vec::new();

		if !self.root.is_dir() {
			return Ok(contracts);
		}

		let mut pending = vec![self.root.clone()];
		while let Some(dir) = pending.pop() {
			for entry in std::fs::read_dir(&dir)? {
				let path = entry?.path();
				if path.is_dir() {
					pending.push(path);
					continue;
				}

				let in_sol_dir = path
					.parent()
					.and_then(|p| p.extension())
					.is_some_and(|ext| ext == "sol");
				let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
					continue;
				};

				if in_sol_dir && file_name.ends_with(".json") && !file_name.ends_with(".dbg.json") {
					let contract = file_name.trim_end_matches(".json").to_string();
					if !contracts.contains(&contract) {
						contracts.push(contract);
					}
				}
			}
		}

		contracts.sort();
		Ok(contracts)
	}
}

impl ArtifactStore for FileArtifactStore {
	fn load(&self, name: &str) -> Result<ContractArtifact> {
		let path = self.locate(name)?.ok_or_else(|| Error::ArtifactNotFound {
			name: name.to_string(),
			dir: self.root.clone(),
		})?;

		debug!(contract = name, path = %path.display(), "Loading contract artifact");

		let content = std::fs::read_to_string(&path)?;
		let json: Value = serde_json::from_str(&content).map_err(|e| {
			Error::InvalidArtifact(
				name.to_string(),
				format!("invalid JSON in {}: {}", path.display(), e),
			)
		})?;

		ContractArtifact::from_json(name, &json, &path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::error::ErrorKind;
	use serde_json::json;
	use std::fs;

	fn write_artifact(path: &Path, json: Value) {
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(path, serde_json::to_string_pretty(&json).unwrap()).unwrap();
	}

	#[test]
	fn test_load_hardhat_layout() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir
			.path()
			.join("contracts/token/StaxToken.sol/StaxToken.json");
		write_artifact(&path, json!({ "abi": [], "bytecode": "0x6080" }));
		write_artifact(
			&dir.path().join("contracts/token/StaxToken.sol/StaxToken.dbg.json"),
			json!({ "_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/x.json" }),
		);

		let store = FileArtifactStore::new(dir.path());
		let artifact = store.load("StaxToken").unwrap();
		assert_eq!(artifact.name, "StaxToken");
		assert_eq!(artifact.source, path);
		assert_eq!(store.available().unwrap(), vec!["StaxToken".to_string()]);
	}

	#[test]
	fn test_load_foundry_layout() {
		let dir = tempfile::tempdir().unwrap();
		write_artifact(
			&dir.path().join("StaxToken.sol/StaxToken.json"),
			json!({
				"abi": [],
				"bytecode": { "object": "0x60806040" },
				"metadata": { "compiler": { "version": "0.8.20+commit.a1b79de6" } }
			}),
		);
		write_artifact(
			&dir.path().join("Ownable.sol/Ownable.json"),
			json!({ "abi": [], "bytecode": { "object": "0x" } }),
		);

		let store = FileArtifactStore::new(dir.path());
		let artifact = store.load("StaxToken").unwrap();
		assert_eq!(artifact.bytecode.len(), 4);
		assert_eq!(
			artifact.compiler_version.as_deref(),
			Some("0.8.20+commit.a1b79de6")
		);
		assert_eq!(
			store.available().unwrap(),
			vec!["Ownable".to_string(), "StaxToken".to_string()]
		);
	}

	#[test]
	fn test_missing_artifact() {
		let dir = tempfile::tempdir().unwrap();
		let store = FileArtifactStore::new(dir.path());

		let err = store.load("NoSuchToken").unwrap_err();
		assert_eq!(err.kind(), ErrorKind::ArtifactNotFound);
		assert!(err.to_string().contains("NoSuchToken"));
	}

	#[test]
	fn test_missing_root_directory() {
		let store = FileArtifactStore::new("/nonexistent/artifacts");
		assert_eq!(
			store.load("StaxToken").unwrap_err().kind(),
			ErrorKind::ArtifactNotFound
		);
		assert!(store.available().unwrap().is_empty());
	}

	#[test]
	fn test_malformed_json() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("StaxToken.sol/StaxToken.json");
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(&path, "{ not json").unwrap();

		let err = FileArtifactStore::new(dir.path())
			.load("StaxToken")
			.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidArtifact);
	}
}
