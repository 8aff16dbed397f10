//! Application and network configuration.
//!
//! Two kinds of configuration live here:
//!
//! - `NetworkConfig`: which replica, identity provider and supply-chain
//!   canister to talk to. Resolved once from the environment at startup
//!   and never changed afterwards.
//! - `Config`: small per-user settings (identity PEM path, last principal)
//!   stored at `~/.config/chainproof/config.json`.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use candid::Principal;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "chainproof";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Public network replica
const IC_HOST: &str = "https://ic0.app";

/// Local dfx replica
const LOCAL_HOST: &str = "http://localhost:4943";

/// Internet Identity on mainnet, also the default for local deployments
const DEFAULT_II_CANISTER_ID: &str = "rdmx6-jaaaa-aaaaa-aaadq-cai";

/// Mainnet identity provider
const IC_IDENTITY_PROVIDER: &str = "https://identity.ic0.app";

const DEFAULT_SUPPLY_CHAIN_CANISTER_ID: &str = "rdmx6-jaaaa-aaaaa-aaadq-cai";

pub const ENV_NETWORK: &str = "DFX_NETWORK";
pub const ENV_II_CANISTER_ID: &str = "INTERNET_IDENTITY_CANISTER_ID";
pub const ENV_SUPPLY_CHAIN_CANISTER_ID: &str = "SUPPLY_CHAIN_CANISTER_ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkMode {
    Local,
    Ic,
}

impl NetworkMode {
    /// Only the literal `ic` selects the public network.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("ic") => NetworkMode::Ic,
            _ => NetworkMode::Local,
        }
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkMode::Local => write!(f, "local"),
            NetworkMode::Ic => write!(f, "ic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub mode: NetworkMode,
    pub host: String,
    pub identity_provider: String,
    pub internet_identity_canister_id: Principal,
    pub supply_chain_canister_id: Principal,
}

impl NetworkConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = NetworkMode::parse(lookup(ENV_NETWORK).as_deref());

        // The override only applies to local deployments; mainnet II has a fixed id
        let ii_text = match mode {
            NetworkMode::Ic => DEFAULT_II_CANISTER_ID.to_string(),
            NetworkMode::Local => lookup(ENV_II_CANISTER_ID)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_II_CANISTER_ID.to_string()),
        };
        let internet_identity_canister_id = Principal::from_text(&ii_text)
            .with_context(|| format!("Invalid Internet Identity canister id: {}", ii_text))?;

        let sc_text = lookup(ENV_SUPPLY_CHAIN_CANISTER_ID)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SUPPLY_CHAIN_CANISTER_ID.to_string());
        let supply_chain_canister_id = Principal::from_text(&sc_text)
            .with_context(|| format!("Invalid supply chain canister id: {}", sc_text))?;

        let (host, identity_provider) = match mode {
            NetworkMode::Ic => (IC_HOST.to_string(), IC_IDENTITY_PROVIDER.to_string()),
            NetworkMode::Local => (
                LOCAL_HOST.to_string(),
                format!("http://{}.localhost:4943", internet_identity_canister_id),
            ),
        };

        Ok(Self {
            mode,
            host,
            identity_provider,
            internet_identity_canister_id,
            supply_chain_canister_id,
        })
    }

    /// Local replicas use a self-generated root key that must be fetched
    /// before response certificates can be verified.
    pub fn requires_root_key(&self) -> bool {
        self.mode == NetworkMode::Local
    }

    pub fn log_summary(&self) {
        info!(
            network = %self.mode,
            host = %self.host,
            identity_provider = %self.identity_provider,
            internet_identity = %self.internet_identity_canister_id,
            supply_chain = %self.supply_chain_canister_id,
            "Network configuration resolved"
        );
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// PEM key imported on login (e.g. output of `dfx identity export`)
    pub identity_pem: Option<PathBuf>,
    pub last_principal: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read config file")?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Cache directory, scoped per network so local and mainnet sessions
    /// never overwrite each other.
    pub fn cache_dir(&self, mode: NetworkMode) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join(mode.to_string()))
    }
}
