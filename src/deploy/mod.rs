//! Deployment configuration: a compiler pin plus named network targets.
//!
//! These are operational parameters for the surrounding tooling. Nothing in
//! here reaches the ledger core.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::identity::Keypair;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config encode/decode failure: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no compiler version pinned")]
    MissingCompiler,
    #[error("network {0}: endpoint url must be http(s)")]
    InvalidUrl(String),
    #[error("network {0}: public target needs at least one authorizing credential")]
    MissingCredential(String),
    #[error("network {0}: credential is not a 32-byte hex secret")]
    MalformedCredential(String),
}

/// One named network target. A missing `url` marks a local ephemeral network
/// with no persisted state; public targets carry an endpoint plus the
/// credentials authorised to deploy there.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub accounts: Vec<String>,
}

impl NetworkTarget {
    pub fn is_ephemeral(&self) -> bool {
        self.url.is_none()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployConfig {
    pub compiler: String,
    pub networks: BTreeMap<String, NetworkTarget>,
}

impl DeployConfig {
    /// Starter configuration: a local ephemeral network plus a public testnet
    /// with placeholders the operator must fill in.
    pub fn template() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            "local".to_string(),
            NetworkTarget {
                url: None,
                accounts: Vec::new(),
            },
        );
        networks.insert(
            "testnet".to_string(),
            NetworkTarget {
                url: Some("https://rpc.testnet.aedcoin.example/v3/YOUR_API_KEY".to_string()),
                accounts: vec!["YOUR_PRIVATE_KEY".to_string()],
            },
        );
        Self {
            compiler: "0.8.19".to_string(),
            networks,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    /// Check the configuration is usable: a compiler pin, http(s) endpoints,
    /// and a well-formed secret for every public target. Ephemeral targets
    /// provision their own throwaway accounts and need none.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compiler.trim().is_empty() {
            return Err(ConfigError::MissingCompiler);
        }
        for (name, target) in &self.networks {
            let Some(url) = &target.url else { continue };
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidUrl(name.clone()));
            }
            if target.accounts.is_empty() {
                return Err(ConfigError::MissingCredential(name.clone()));
            }
            for account in &target.accounts {
                if Keypair::from_secret_hex(account).is_err() {
                    return Err(ConfigError::MalformedCredential(name.clone()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_template() -> DeployConfig {
        let mut config = DeployConfig::template();
        let target = config.networks.get_mut("testnet").unwrap();
        target.accounts = vec![Keypair::generate().secret_hex().to_string()];
        config
    }

    #[test]
    fn template_has_an_ephemeral_local_and_a_public_testnet() {
        let config = DeployConfig::template();
        assert!(config.networks["local"].is_ephemeral());
        let testnet = &config.networks["testnet"];
        assert!(!testnet.is_ephemeral());
        assert_eq!(testnet.accounts.len(), 1);
        assert!(!config.compiler.is_empty());
    }

    #[test]
    fn template_placeholders_do_not_validate() {
        let err = DeployConfig::template().validate().unwrap_err();
        assert!(matches!(err, ConfigError::MalformedCredential(n) if n == "testnet"));
    }

    #[test]
    fn filled_in_config_validates_and_survives_a_save_load() {
        let config = filled_template();
        config.validate().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.json");
        config.save(&path).unwrap();
        let loaded = DeployConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn public_target_without_credentials_is_rejected() {
        let mut config = filled_template();
        config.networks.get_mut("testnet").unwrap().accounts.clear();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(n) if n == "testnet"));
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let mut config = filled_template();
        config.networks.get_mut("testnet").unwrap().url = Some("udp://10.0.0.1:9000".into());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(n) if n == "testnet"));
    }
}
