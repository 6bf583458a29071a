use alloy_primitives::Address;
use clap::Parser;
use eyre::WrapErr;
use safe_multisig::{
    consts::get_multisend_address, CacheConfig, RetryPolicy, RpcClient, TimelockPolicy,
};
use serde::{Deserialize, Serialize};
use url::Url;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

use consts::{DEFAULT_CONFIG_FILENAME, DEFAULT_ROOT_DIR};

pub mod consts;

#[derive(Debug, Parser, Clone)]
pub struct RpcArgs {
    #[arg(
        long,
        env = "ETH_RPC_URL",
        value_name = "URL",
        help = "The JSON-RPC endpoint of the chain the wallet lives on."
    )]
    pub rpc_url: Url,
}

impl RpcArgs {
    /// A retrying client over an HTTP provider.
    pub fn client(&self, config: &WardenConfig) -> impl safe_multisig::ChainClient {
        let provider = alloy_provider::ProviderBuilder::new().on_http(self.rpc_url.clone());
        RpcClient::with_retry(provider, config.retry_policy())
    }
}

#[derive(Debug, Parser, Clone, Default)]
pub struct ConfigArgs {
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Deployment configuration file. Defaults to ~/.warden/config.json when it exists."
    )]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> eyre::Result<WardenConfig> {
        match &self.config {
            Some(path) => WardenConfig::load(path),
            None => {
                let default = default_config_path();
                if default.exists() {
                    WardenConfig::load(&default)
                } else {
                    Ok(WardenConfig::default())
                }
            }
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_ROOT_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_CONFIG_FILENAME)
}

/// Deployment values read from the configuration file. Command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WardenConfig {
    /// MultiSend relay per chain id, replacing the built-in address.
    #[serde(default)]
    pub multisend: BTreeMap<u64, Address>,
    /// Timelock grace period, e.g. `14days`.
    #[serde(default)]
    pub grace_period: Option<String>,
    #[serde(default)]
    pub retry_attempts: Option<u32>,
    /// Time-to-live of cached wallet parameters, e.g. `30s`.
    #[serde(default)]
    pub cache_ttl: Option<String>,
}

impl WardenConfig {
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .wrap_err_with(|| format!("Invalid config {}", path.display()))?;

        // fail early on unparsable durations
        config.grace_period(None)?;
        config.cache_config()?;

        Ok(config)
    }

    pub fn multisend_address(&self, chain_id: u64) -> eyre::Result<Address> {
        match self.multisend.get(&chain_id) {
            Some(address) => Ok(*address),
            None => Ok(get_multisend_address(chain_id)?),
        }
    }

    pub fn grace_period(&self, flag: Option<humantime::Duration>) -> eyre::Result<TimelockPolicy> {
        let grace_period = match (flag, &self.grace_period) {
            (Some(flag), _) => flag.into(),
            (None, Some(configured)) => parse_duration("gracePeriod", configured)?,
            (None, None) => return Ok(TimelockPolicy::default()),
        };

        Ok(TimelockPolicy { grace_period })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let default = RetryPolicy::default();
        RetryPolicy { max_attempts: self.retry_attempts.unwrap_or(default.max_attempts), ..default }
    }

    pub fn cache_config(&self) -> eyre::Result<CacheConfig> {
        match &self.cache_ttl {
            Some(ttl) => Ok(CacheConfig { ttl: parse_duration("cacheTtl", ttl)? }),
            None => Ok(CacheConfig::default()),
        }
    }
}

fn parse_duration(field: &str, value: &str) -> eyre::Result<Duration> {
    humantime::parse_duration(value).wrap_err_with(|| format!("Invalid {field} `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_a_file() {
        let config = WardenConfig::default();

        assert_eq!(config.grace_period(None).unwrap(), TimelockPolicy::default());
        assert_eq!(config.retry_policy().max_attempts, 3);
        assert_eq!(
            config.multisend_address(1).unwrap(),
            safe_multisig::consts::networks::MULTISEND_CALL_ONLY
        );
        assert!(config.multisend_address(31337).is_err());
    }

    #[test]
    fn file_values_and_flag_precedence() {
        let relay = address!("00000000000000000000000000000000000000aa");
        let file = write_config(
            r#"{
                "multisend": { "31337": "0x00000000000000000000000000000000000000aa" },
                "gracePeriod": "2days",
                "retryAttempts": 5,
                "cacheTtl": "1m"
            }"#,
        );
        let config = ConfigArgs { config: Some(file.path().to_path_buf()) }.load().unwrap();

        assert_eq!(config.multisend_address(31337).unwrap(), relay);
        assert_eq!(config.grace_period(None).unwrap().grace_period, Duration::from_secs(2 * 86400));
        assert_eq!(config.retry_policy().max_attempts, 5);
        assert_eq!(config.cache_config().unwrap().ttl, Duration::from_secs(60));

        let flag: humantime::Duration = "1h".parse().unwrap();
        let policy = config.grace_period(Some(flag)).unwrap();
        assert_eq!(policy.grace_period, Duration::from_secs(3600));
    }

    #[test]
    fn rejects_bad_files() {
        let unknown = write_config(r#"{ "gracePeriod": "1d", "extra": 1 }"#);
        assert!(WardenConfig::load(unknown.path()).is_err());

        let bad_duration = write_config(r#"{ "gracePeriod": "soon" }"#);
        assert!(WardenConfig::load(bad_duration.path()).is_err());
    }
}
