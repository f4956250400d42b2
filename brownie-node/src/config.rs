//! Project configuration.
//!
//! A project directory holds `brownie-config.yaml`, which names the networks
//! and the dotenv file carrying `PRIVATE_KEY`. The Move package directory,
//! usually the same one, holds `Move.toml`.

use crate::error::NodeError;
use brownie::{AccountAddress, PrivateKey};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "brownie-config.yaml";
pub const MANIFEST_FILE: &str = "Move.toml";
pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
/// Manifest value of an address that is only known at deploy time
pub const UNASSIGNED_ADDRESS: &str = "_";

fn default_dotenv() -> String {
    ".env".to_string()
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub node_url: String,
    #[serde(default)]
    pub faucet_url: Option<String>,
    /// Named address values that win over the signer's address
    #[serde(default)]
    pub replace_address: BTreeMap<String, String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BrownieConfig {
    #[serde(default = "default_dotenv")]
    pub dotenv: String,
    #[serde(default)]
    pub networks: HashMap<String, NetworkConfig>,
}

impl BrownieConfig {
    pub fn from_file(path: &Path) -> Result<Self, NodeError> {
        let raw = read_file(path)?;
        serde_yaml::from_str(&raw)
            .map_err(|e| NodeError::Config(format!("Failed to parse {}: {e}", path.display())))
    }

    pub fn network(&self, name: &str) -> Result<&NetworkConfig, NodeError> {
        self.networks
            .get(name)
            .ok_or_else(|| NodeError::Config(format!("Network {name} is not configured")))
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// The parts of `Move.toml` this crate reads.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MoveManifest {
    pub package: PackageInfo,
    #[serde(default)]
    pub addresses: Option<BTreeMap<String, String>>,
}

impl MoveManifest {
    pub fn from_file(path: &Path) -> Result<Self, NodeError> {
        let raw = read_file(path)?;
        toml::from_str(&raw)
            .map_err(|e| NodeError::Config(format!("Failed to parse {}: {e}", path.display())))
    }
}

fn read_file(path: &Path) -> Result<String, NodeError> {
    fs::read_to_string(path).map_err(|source| NodeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Named address assignments handed to the compiler, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedAddresses(Vec<(String, String)>);

impl NamedAddresses {
    /// Overrides from the network config come first, then every manifest
    /// address left as `_` gets the signer's address. A name is only
    /// assigned once. Nothing is assigned when the manifest has no
    /// `[addresses]` table.
    pub fn resolve(
        manifest: &MoveManifest,
        network: &NetworkConfig,
        signer: AccountAddress,
    ) -> Self {
        let mut assigned: Vec<(String, String)> = Vec::new();
        let Some(addresses) = &manifest.addresses else {
            return NamedAddresses(assigned);
        };
        for (name, value) in &network.replace_address {
            if !assigned.iter().any(|(n, _)| n == name) {
                assigned.push((name.clone(), value.clone()));
            }
        }
        for (name, value) in addresses {
            if value == UNASSIGNED_ADDRESS && !assigned.iter().any(|(n, _)| n == name) {
                assigned.push((name.clone(), signer.to_string()));
            }
        }
        NamedAddresses(assigned)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Command line arguments, empty when nothing is assigned.
    pub fn to_args(&self) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }
        let pairs: Vec<String> = self.0.iter().map(|(n, v)| format!("{n}={v}")).collect();
        vec!["--named-addresses".to_string(), pairs.join(",")]
    }
}

impl fmt::Display for NamedAddresses {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_args().join(" "))
    }
}

/// Loads the dotenv file named by the config, then reads the signing key
/// from the environment. Variables already set are not overwritten.
pub fn load_private_key(project_dir: &Path, config: &BrownieConfig) -> Result<PrivateKey, NodeError> {
    let env_file = project_dir.join(&config.dotenv);
    if let Err(e) = dotenv::from_path(&env_file) {
        debug!("Not loading {}: {}", env_file.display(), e);
    }
    let key = std::env::var(PRIVATE_KEY_VAR)
        .map_err(|_| NodeError::Config(format!("{PRIVATE_KEY_VAR} is not set")))?;
    Ok(key.parse()?)
}

/// Everything read from disk before anything is compiled.
#[derive(Debug, Clone)]
pub struct Project {
    pub project_dir: PathBuf,
    pub package_dir: PathBuf,
    pub network_name: String,
    pub network: NetworkConfig,
    pub manifest: MoveManifest,
    pub key: PrivateKey,
    pub named_addresses: NamedAddresses,
}

impl Project {
    /// `package_dir` defaults to `project_dir`.
    pub fn load(
        project_dir: &Path,
        network: &str,
        package_dir: Option<&Path>,
    ) -> Result<Self, NodeError> {
        let config = BrownieConfig::from_file(&project_dir.join(CONFIG_FILE))?;
        let network_config = config.network(network)?.clone();
        let key = load_private_key(project_dir, &config)?;

        let package_dir = package_dir.unwrap_or(project_dir).to_path_buf();
        let manifest = MoveManifest::from_file(&package_dir.join(MANIFEST_FILE))?;
        let named_addresses = NamedAddresses::resolve(&manifest, &network_config, key.to_address());
        info!(
            "Loaded package {} for {} as {}",
            manifest.package.name,
            network,
            key.to_address()
        );
        Ok(Project {
            project_dir: project_dir.to_path_buf(),
            package_dir,
            network_name: network.to_string(),
            network: network_config,
            manifest,
            key,
            named_addresses,
        })
    }

    pub fn package_name(&self) -> &str {
        &self.manifest.package.name
    }

    /// `build/<package name>` under the package directory.
    pub fn build_dir(&self) -> PathBuf {
        self.package_dir.join("build").join(self.package_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
dotenv: .env
networks:
  aptos-testnet:
    node_url: https://fullnode.testnet.aptoslabs.com/v1
    faucet_url: https://faucet.testnet.aptoslabs.com
    replace_address:
      oracle: "0x42"
  aptos-mainnet:
    node_url: https://fullnode.mainnet.aptoslabs.com/v1
"#;

    const MANIFEST: &str = r#"
[package]
name = "Swap"
version = "0.1.0"

[addresses]
swap = "_"
oracle = "_"
std = "0x1"
"#;

    fn signer() -> AccountAddress {
        "0xabc".parse().unwrap()
    }

    #[test]
    fn parse_config() {
        let config: BrownieConfig = serde_yaml::from_str(CONFIG).unwrap();
        assert_eq!(config.dotenv, ".env");
        let testnet = config.network("aptos-testnet").unwrap();
        assert_eq!(
            testnet.faucet_url.as_deref(),
            Some("https://faucet.testnet.aptoslabs.com")
        );
        assert_eq!(testnet.replace_address["oracle"], "0x42");
        let mainnet = config.network("aptos-mainnet").unwrap();
        assert!(mainnet.faucet_url.is_none());
        assert!(mainnet.replace_address.is_empty());
        assert!(matches!(config.network("local"), Err(NodeError::Config(_))));
    }

    #[test]
    fn overrides_come_first_and_names_appear_once() {
        let config: BrownieConfig = serde_yaml::from_str(CONFIG).unwrap();
        let manifest: MoveManifest = toml::from_str(MANIFEST).unwrap();
        let named =
            NamedAddresses::resolve(&manifest, config.network("aptos-testnet").unwrap(), signer());
        assert_eq!(
            named.to_string(),
            format!("--named-addresses oracle=0x42,swap={}", signer())
        );
        assert_eq!(named.get("std"), None);
    }

    #[test]
    fn nothing_without_addresses_table() {
        let config: BrownieConfig = serde_yaml::from_str(CONFIG).unwrap();
        let manifest: MoveManifest = toml::from_str("[package]\nname = \"Bare\"\n").unwrap();
        let named =
            NamedAddresses::resolve(&manifest, config.network("aptos-testnet").unwrap(), signer());
        assert!(named.is_empty());
        assert!(named.to_args().is_empty());
        assert_eq!(named.to_string(), "");
    }

    #[test]
    fn project_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), CONFIG).unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        fs::write(dir.path().join(".env"), format!("{PRIVATE_KEY_VAR}=0x{}\n", "01".repeat(32))).unwrap();

        let project = Project::load(dir.path(), "aptos-mainnet", None).unwrap();
        assert_eq!(project.package_name(), "Swap");
        assert_eq!(project.build_dir(), dir.path().join("build").join("Swap"));
        assert_eq!(
            project.named_addresses.get("oracle"),
            Some(project.key.to_address().to_string().as_str())
        );
        assert!(matches!(
            Project::load(dir.path(), "aptos-devnet", None),
            Err(NodeError::Config(_))
        ));
    }
}
