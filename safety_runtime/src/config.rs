//! Runtime configuration — TOML file with serde defaults.
//!
//! Quantities accept either a TOML integer or a decimal string, the
//! latter for values past `i64::MAX`.
//!
//! ```toml
//! data_dir = "./sessions"
//! snapshot_interval = 10
//! log_filter = "info"
//!
//! [deployment]
//! deployer = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
//! initial_value = 10
//! amount = 0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use safety_kernel::calls::{Call, CallEnvelope};
use safety_kernel::identity::{Address, StateValue};

/// First development account; deploys when no deployer is configured.
pub const DEFAULT_DEPLOYER: Address = Address::from_bytes([
    0xf3, 0x9f, 0xd6, 0xe5, 0x1a, 0xad, 0x88, 0xf6, 0xf4, 0xce, 0x6a, 0xb8, 0x82, 0x72, 0x79,
    0xcf, 0xff, 0xb9, 0x22, 0x66,
]);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid log_filter {filter:?}: {source}")]
    LogFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Snapshot every N sequences. 0 disables snapshots.
    #[serde(default)]
    pub snapshot_interval: u64,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub deployment: DeploymentConfig,
}

/// Constructor parameters supplied by the deployment collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    #[serde(default = "default_deployer")]
    pub deployer: Address,
    #[serde(default = "default_initial_value", deserialize_with = "quantity")]
    pub initial_value: StateValue,
    /// Passed through to the contract uninterpreted.
    #[serde(default, deserialize_with = "quantity")]
    pub amount: u128,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Int(u64),
    Text(String),
}

/// TOML has no integer type wider than i64.
fn quantity<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    match RawQuantity::deserialize(deserializer)? {
        RawQuantity::Int(n) => Ok(u128::from(n)),
        RawQuantity::Text(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("{s:?} does not fit in u128"))),
        RawQuantity::Text(s) => Err(serde::de::Error::custom(format!(
            "{s:?} is not a non-negative decimal quantity"
        ))),
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("sessions")
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_deployer() -> Address {
    DEFAULT_DEPLOYER
}

fn default_initial_value() -> StateValue {
    10
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            deployer: default_deployer(),
            initial_value: default_initial_value(),
            amount: 0,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            snapshot_interval: 0,
            log_filter: default_log_filter(),
            deployment: DeploymentConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse a config and check its log filter.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.env_filter()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        EnvFilter::try_new(&self.log_filter).map_err(|source| ConfigError::LogFilter {
            filter: self.log_filter.clone(),
            source,
        })
    }

    /// Install a stderr fmt subscriber filtered by `log_filter`.
    /// Returns `false` when a global subscriber was already set.
    pub fn init_tracing(&self) -> Result<bool, ConfigError> {
        let installed = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter()?)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok();
        Ok(installed)
    }
}

impl DeploymentConfig {
    /// The constructor call, always sequence 1.
    pub fn deploy_call(&self) -> CallEnvelope {
        CallEnvelope::new(
            1,
            self.deployer,
            Call::Deploy {
                initial_value: self.initial_value,
                amount: self.amount,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, RuntimeConfig::default());
        assert_eq!(cfg.deployment.initial_value, 10);
        assert_eq!(cfg.deployment.amount, 0);
        assert_eq!(
            cfg.deployment.deployer,
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn full_config_parses() {
        let cfg = RuntimeConfig::from_toml_str(
            r#"
            data_dir = "/var/lib/safety"
            snapshot_interval = 5
            log_filter = "safety_runtime=debug"

            [deployment]
            deployer = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
            initial_value = 1
            amount = 1000
            "#,
        )
        .unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/var/lib/safety"));
        assert_eq!(cfg.snapshot_interval, 5);
        assert_eq!(cfg.deployment.initial_value, 1);
        assert_eq!(cfg.deployment.amount, 1000);

        let deploy = cfg.deployment.deploy_call();
        assert_eq!(deploy.sequence, 1);
        assert_eq!(deploy.caller, cfg.deployment.deployer);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            RuntimeConfig::from_toml_str("snapshot_every = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn quantities_past_i64_use_strings() {
        let cfg = RuntimeConfig::from_toml_str(
            "[deployment]\ninitial_value = \"340282366920938463463374607431768211455\"\namount = \"0\"",
        )
        .unwrap();
        assert_eq!(cfg.deployment.initial_value, u128::MAX);
        assert_eq!(cfg.deployment.amount, 0);
    }

    #[test]
    fn bad_quantities_are_rejected() {
        for bad in ["amount = -1", "amount = \"+5\"", "amount = \"\"", "amount = \"0x10\""] {
            assert!(
                matches!(
                    RuntimeConfig::from_toml_str(&format!("[deployment]\n{bad}")),
                    Err(ConfigError::Parse(_))
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.toml");
        fs::write(
            &path,
            "snapshot_interval = 3\n\n[deployment]\ninitial_value = 42\namount = 7\n",
        )
        .unwrap();

        let cfg = RuntimeConfig::load(&path).unwrap();
        assert_eq!(cfg.snapshot_interval, 3);
        assert_eq!(cfg.deployment.initial_value, 42);
        assert_eq!(cfg.deployment.amount, 7);

        assert!(matches!(
            RuntimeConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn log_filter_is_validated() {
        let cfg = RuntimeConfig::from_toml_str("log_filter = \"safety_runtime=debug,warn\"").unwrap();
        assert!(cfg.env_filter().is_ok());
        // Either installs or finds another test's subscriber already set.
        cfg.init_tracing().unwrap();
        assert!(matches!(
            RuntimeConfig::from_toml_str("log_filter = \"safety_runtime=loud\""),
            Err(ConfigError::LogFilter { .. })
        ));
    }

    #[test]
    fn bad_deployer_is_rejected() {
        assert!(RuntimeConfig::from_toml_str("[deployment]\ndeployer = \"0x12\"").is_err());
    }
}
