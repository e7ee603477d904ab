//! # Suite Configuration
//!
//! Deployment parameters for the in-process suite, loaded from YAML.
//! Every field has a default; the defaults reproduce the standard test
//! chain (owner `ST1PQ…GZGM`, genesis height 100 at 1648000000).
//!
//! Resolution order: `--config <path>`, then `VPC_CONFIG`, then defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vpc_core::{Principal, Timestamp};
use vpc_registry::{ChainClock, CredentialSuite};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "VPC_CONFIG";

/// Default contract owner and deployer.
pub const DEFAULT_OWNER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

/// Genesis block of the chain clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Genesis {
    pub block_height: u64,
    /// Unix seconds.
    pub block_time: i64,
}

impl Default for Genesis {
    fn default() -> Self {
        Self {
            block_height: 100,
            block_time: 1_648_000_000,
        }
    }
}

/// Effective suite configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Initial contract owner. Defaults to [`DEFAULT_OWNER`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Principal>,
    /// Deploying principal; contract principals are `<deployer>.<name>`.
    /// Defaults to the owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployer: Option<Principal>,
    pub genesis: Genesis,
    /// Seconds of block time per mined block.
    pub seconds_per_block: u64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            owner: None,
            deployer: None,
            genesis: Genesis::default(),
            seconds_per_block: 600,
        }
    }
}

impl SuiteConfig {
    /// Load from an explicit path, else from `VPC_CONFIG`, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve_with(explicit, std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    /// [`SuiteConfig::resolve`] with the environment lookup supplied.
    pub fn resolve_with(explicit: Option<&Path>, from_env: Option<PathBuf>) -> Result<Self> {
        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(&path),
            None => {
                tracing::debug!("no config file given; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// The owner, falling back to [`DEFAULT_OWNER`].
    pub fn owner(&self) -> Result<Principal> {
        match &self.owner {
            Some(owner) => Ok(owner.clone()),
            None => Principal::new(DEFAULT_OWNER).context("invalid default owner"),
        }
    }

    /// The deployer, falling back to the owner.
    pub fn deployer(&self) -> Result<Principal> {
        match &self.deployer {
            Some(deployer) => Ok(deployer.clone()),
            None => self.owner(),
        }
    }

    /// This config with every default made explicit.
    pub fn effective(&self) -> Result<Self> {
        Ok(Self {
            owner: Some(self.owner()?),
            deployer: Some(self.deployer()?),
            ..self.clone()
        })
    }

    /// The genesis chain clock.
    pub fn clock(&self) -> Result<ChainClock> {
        let time = Timestamp::from_epoch_secs(self.genesis.block_time)
            .context("invalid genesis block time")?;
        Ok(ChainClock::new(self.genesis.block_height, time))
    }

    /// Deploy a fresh suite.
    pub fn deploy(&self) -> Result<CredentialSuite> {
        let suite = CredentialSuite::deploy(self.owner()?, &self.deployer()?, self.clock()?)
            .context("failed to deploy credential suite")?;
        Ok(suite)
    }

    /// YAML rendering of the effective configuration.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to render config")
    }
}
