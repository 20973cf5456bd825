//! Configuration management and environment setup
//!
//! Configuration comes from three places, in increasing precedence:
//! built-in Infura profiles parameterised by `INFURA_PROJECT_ID` and
//! `PRIVATE_KEY`, an optional TOML file, and command-line overrides applied
//! by the caller. Everything is resolved once into a [`Config`] value that is
//! passed explicitly to whoever needs it.

use crate::{
	constants::{self, env_vars},
	types::{
		error::{Error, Result},
		network::{Credential, NetworkProfile},
	},
};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Compiler settings the artifacts are expected to be built with
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
	pub solc_version: String,
}

impl Default for CompilerConfig {
	fn default() -> Self {
		Self {
			solc_version: constants::DEFAULT_SOLC_VERSION.to_string(),
		}
	}
}

/// What to deploy and how long to wait for it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeploySettings {
	pub contract: String,
	pub artifacts_dir: PathBuf,
	pub confirmations: u64,
}

impl Default for DeploySettings {
	fn default() -> Self {
		Self {
			contract: constants::DEFAULT_CONTRACT.to_string(),
			artifacts_dir: PathBuf::from(constants::DEFAULT_ARTIFACTS_DIR),
			confirmations: constants::DEFAULT_CONFIRMATIONS,
		}
	}
}

/// A network declared in the config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkEntry {
	pub url: String,
	#[serde(default)]
	pub chain_id: Option<u64>,
	/// Falls back to `PRIVATE_KEY` when absent
	#[serde(default)]
	pub accounts: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
	compiler: CompilerConfig,
	deploy: DeploySettings,
	networks: BTreeMap<String, NetworkEntry>,
}

/// Fully resolved deployer configuration
#[derive(Debug, Clone)]
pub struct Config {
	pub compiler: CompilerConfig,
	pub deploy: DeploySettings,
	infura_project_id: Option<String>,
	private_key: Option<Credential>,
	networks: BTreeMap<String, NetworkEntry>,
	path: Option<PathBuf>,
}

impl Config {
	/// Build configuration from the process environment alone
	pub fn from_env() -> Self {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Build configuration from an arbitrary variable lookup
	///
	/// Blank values are treated as unset.
	pub fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

		Self {
			compiler: CompilerConfig::default(),
			deploy: DeploySettings::default(),
			infura_project_id: non_blank(env_vars::INFURA_PROJECT_ID),
			private_key: non_blank(env_vars::PRIVATE_KEY).map(Credential::new),
			networks: BTreeMap::new(),
			path: None,
		}
	}

	/// Load a TOML config file on top of the environment
	///
	/// `${VAR}` and `${VAR:-default}` placeholders are resolved before parsing.
	///
	/// # Errors
	/// Returns Error if the file is missing, a placeholder cannot be resolved,
	/// or the TOML is invalid
	pub fn load(path: &Path) -> Result<Self> {
		Self::load_with(path, |name| std::env::var(name).ok())
	}

	/// Same as [`Config::load`] with an explicit variable lookup
	pub fn load_with<F>(path: &Path, lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		if !path.exists() {
			return Err(Error::ConfigNotFound(path.to_path_buf()));
		}

		let raw = std::fs::read_to_string(path)?;
		let mut config = Self::from_toml_str(&raw, &lookup)?;
		config.path = Some(path.to_path_buf());
		Ok(config)
	}

	/// Parse config file contents, resolving placeholders through `lookup`
	pub fn from_toml_str<F>(raw: &str, lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let resolved = resolve_env_vars(raw, &lookup)?;
		let file: FileConfig = toml::from_str(&resolved)?;

		if file.deploy.confirmations == 0 {
			return Err(Error::InvalidConfig(
				"deploy.confirmations must be at least 1".to_string(),
			));
		}

		let mut config = Self::from_lookup(lookup);
		config.compiler = file.compiler;
		config.deploy = file.deploy;
		config.networks = file.networks;
		Ok(config)
	}

	/// Load the given file, or the default file if present, or the environment alone
	pub fn discover(path: Option<&Path>) -> Result<Self> {
		match path {
			Some(path) => Self::load(path),
			None => {
				let default = Path::new(constants::DEFAULT_CONFIG_FILE);
				if default.exists() {
					Self::load(default)
				} else {
					Ok(Self::from_env())
				}
			},
		}
	}

	/// File the configuration was loaded from, if any
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Resolve the named network into a profile
	///
	/// Networks from the config file shadow built-ins of the same name.
	///
	/// # Errors
	/// Returns `Error::UnknownNetwork` for names that are neither built in nor
	/// configured, and `Error::MissingEnv` when a built-in profile is selected
	/// without `INFURA_PROJECT_ID`
	pub fn network(&self, name: &str) -> Result<NetworkProfile> {
		if let Some(entry) = self.networks.get(name) {
			let accounts = match &entry.accounts {
				Some(keys) => keys
					.iter()
					.map(|key| Credential::new(key.as_str()))
					.filter(|key| !key.is_blank())
					.collect(),
				None => self.private_key.iter().cloned().collect(),
			};

			return Ok(NetworkProfile {
				name: name.to_string(),
				rpc_url: entry.url.clone(),
				chain_id: entry.chain_id,
				accounts,
			});
		}

		let builtin = constants::builtin_network(name)
			.ok_or_else(|| Error::UnknownNetwork(name.to_string()))?;

		let project_id = self
			.infura_project_id
			.as_deref()
			.ok_or_else(|| Error::MissingEnv(env_vars::INFURA_PROJECT_ID.to_string()))?;

		Ok(NetworkProfile {
			name: name.to_string(),
			rpc_url: builtin.infura_url(project_id),
			chain_id: Some(builtin.chain_id),
			accounts: self.private_key.iter().cloned().collect(),
		})
	}

	/// Names of every selectable network, built-ins first
	pub fn network_names(&self) -> Vec<String> {
		let mut names: Vec<String> = constants::BUILTIN_NETWORKS
			.iter()
			.map(|network| network.name.to_string())
			.collect();

		for name in self.networks.keys() {
			if !names.contains(name) {
				names.push(name.clone());
			}
		}

		names
	}
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of VAR_NAME from `lookup`.
/// Supports default values with ${VAR_NAME:-default_value}.
pub(crate) fn resolve_env_vars<F>(input: &str, lookup: F) -> Result<String>
where
	F: Fn(&str) -> Option<String>,
{
	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| Error::InvalidConfig(format!("Regex error: {e}")))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};

		let value = match (lookup(var_name.as_str()), cap.get(2)) {
			(Some(value), _) => value,
			(None, Some(default)) => default.as_str().to_string(),
			(None, None) => return Err(Error::MissingEnv(var_name.as_str().to_string())),
		};

		result.push_str(&input[last..full_match.start()]);
		result.push_str(&value);
		last = full_match.end();
	}

	result.push_str(&input[last..]);
	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name: &str| map.get(name).cloned()
	}

	#[test]
	fn test_builtin_endpoints_embed_project_id() {
		let config = Config::from_lookup(env(&[
			("INFURA_PROJECT_ID", "abc123"),
			("PRIVATE_KEY", KEY),
		]));

		let expected = [
			("sepolia", "https://sepolia.infura.io/v3/abc123", 11155111),
			("holesky", "https://holesky.infura.io/v3/abc123", 17000),
			("mainnet", "https://mainnet.infura.io/v3/abc123", 1),
			("polygon", "https://polygon-mainnet.infura.io/v3/abc123", 137),
		];

		for (name, url, chain_id) in expected {
			let profile = config.network(name).unwrap();
			assert_eq!(profile.name, name);
			assert_eq!(profile.rpc_url, url);
			assert_eq!(profile.chain_id, Some(chain_id));
			assert_eq!(profile.accounts, vec![Credential::new(KEY)]);
		}
	}

	#[test]
	fn test_missing_project_id() {
		let config = Config::from_lookup(env(&[("PRIVATE_KEY", KEY)]));
		assert!(matches!(
			config.network("sepolia"),
			Err(Error::MissingEnv(var)) if var == "INFURA_PROJECT_ID"
		));
	}

	#[test]
	fn test_missing_private_key_leaves_no_accounts() {
		let config = Config::from_lookup(env(&[
			("INFURA_PROJECT_ID", "abc123"),
			("PRIVATE_KEY", "  "),
		]));
		assert!(config.network("mainnet").unwrap().accounts.is_empty());
	}

	#[test]
	fn test_unknown_network() {
		let config = Config::from_lookup(env(&[("INFURA_PROJECT_ID", "abc123")]));
		assert!(matches!(
			config.network("goerli"),
			Err(Error::UnknownNetwork(name)) if name == "goerli"
		));
	}

	#[test]
	fn test_file_networks_and_settings() {
		let raw = r#"
[compiler]
solc_version = "0.8.24"

[deploy]
contract = "OtherToken"
artifacts_dir = "out"
confirmations = 3

[networks.local]
url = "http://127.0.0.1:8545"
chain_id = 31337
accounts = ["${LOCAL_KEY:-0x01}"]

[networks.sepolia]
url = "https://rpc.example/${RPC_TOKEN}"
"#;
		let config = Config::from_toml_str(
			raw,
			env(&[("RPC_TOKEN", "tok"), ("PRIVATE_KEY", KEY)]),
		)
		.unwrap();

		assert_eq!(config.compiler.solc_version, "0.8.24");
		assert_eq!(config.deploy.contract, "OtherToken");
		assert_eq!(config.deploy.artifacts_dir, PathBuf::from("out"));
		assert_eq!(config.deploy.confirmations, 3);

		let local = config.network("local").unwrap();
		assert_eq!(local.chain_id, Some(31337));
		assert_eq!(local.accounts, vec![Credential::new("0x01")]);

		// file entry shadows the built-in and reuses PRIVATE_KEY
		let sepolia = config.network("sepolia").unwrap();
		assert_eq!(sepolia.rpc_url, "https://rpc.example/tok");
		assert_eq!(sepolia.chain_id, None);
		assert_eq!(sepolia.accounts, vec![Credential::new(KEY)]);

		let names = config.network_names();
		assert_eq!(names.first().map(String::as_str), Some("sepolia"));
		assert!(names.contains(&"local".to_string()));
		assert_eq!(names.iter().filter(|n| *n == "sepolia").count(), 1);
	}

	#[test]
	fn test_defaults_without_sections() {
		let config = Config::from_toml_str("", env(&[])).unwrap();
		assert_eq!(config.compiler.solc_version, "0.8.20");
		assert_eq!(config.deploy.contract, "StaxToken");
		assert_eq!(config.deploy.confirmations, 1);
	}

	#[test]
	fn test_zero_confirmations_rejected() {
		let result = Config::from_toml_str("[deploy]\nconfirmations = 0\n", env(&[]));
		assert!(matches!(result, Err(Error::InvalidConfig(_))));
	}

	#[test]
	fn test_unknown_section_rejected() {
		let result = Config::from_toml_str("[service]\nid = \"x\"\n", env(&[]));
		assert!(matches!(result, Err(Error::Toml(_))));
	}

	#[test]
	fn test_env_var_resolution() {
		let lookup = env(&[("TEST_HOST", "localhost"), ("TEST_PORT", "8545")]);
		let result = resolve_env_vars("url = \"http://${TEST_HOST}:${TEST_PORT}\"", lookup).unwrap();
		assert_eq!(result, "url = \"http://localhost:8545\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let result = resolve_env_vars("value = \"${MISSING_VAR}\"", env(&[]));
		assert!(result.unwrap_err().to_string().contains("MISSING_VAR"));
	}

	#[test]
	fn test_load_missing_file() {
		let result = Config::load_with(Path::new("/nonexistent/stax-deploy.toml"), env(&[]));
		assert!(matches!(result, Err(Error::ConfigNotFound(_))));
	}

	#[test]
	fn test_load_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("stax-deploy.toml");
		std::fs::write(&path, "[networks.anvil]\nurl = \"http://127.0.0.1:8545\"\n").unwrap();

		let config = Config::load_with(&path, env(&[])).unwrap();
		assert_eq!(config.path(), Some(path.as_path()));
		assert!(config.network("anvil").unwrap().accounts.is_empty());
	}
}
