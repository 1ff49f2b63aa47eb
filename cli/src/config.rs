//! TOML configuration loading and validation.
//!
//! Settings resolve in three layers: the optional config file, then the
//! `KUNAIO_*` environment variables, then command-line flags. clap folds the
//! last two together, so [`Settings::resolve`] only has to fall back to the
//! file.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use kuna::{ClientConfig, Market};

/// On-disk configuration. Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub account: AccountConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Idle keep-alive connections kept per host.
    #[serde(default = "default_max_idle")]
    pub max_idle_per_host: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_idle_per_host: default_max_idle(),
        }
    }
}

fn default_base_url() -> String {
    kuna::DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    4
}
fn default_connect_timeout() -> u64 {
    3
}
fn default_max_idle() -> usize {
    5
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    pub market: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("api.base_url must start with http:// or https://, got {url:?}");
        }
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be > 0");
        }
        if self.api.connect_timeout_secs == 0 {
            bail!("api.connect_timeout_secs must be > 0");
        }
        if self.api.connect_timeout_secs > self.api.timeout_secs {
            bail!("api.connect_timeout_secs must not exceed api.timeout_secs");
        }
        if let Some(market) = &self.account.market {
            market.parse::<Market>()?;
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(&self.api.base_url)
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
            .with_connect_timeout(Duration::from_secs(self.api.connect_timeout_secs))
            .with_max_idle_per_host(self.api.max_idle_per_host)
    }
}

/// Effective settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientConfig,
    pub market: Market,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl Settings {
    /// Merge flag/env values over the file config.
    pub fn resolve(
        file: Config,
        market: Option<Market>,
        access_key: Option<String>,
        secret_key: Option<String>,
    ) -> Result<Self> {
        let market = match (market, &file.account.market) {
            (Some(m), _) => m,
            (None, Some(m)) => m.parse()?,
            (None, None) => Market::default(),
        };
        Ok(Self {
            client: file.client_config(),
            market,
            access_key: access_key.or(file.account.access_key),
            secret_key: secret_key.or(file.account.secret_key),
        })
    }

    /// Keys for private commands. Empty strings count as missing.
    pub fn keys(&self) -> Result<(&str, &str)> {
        let access = self.access_key.as_deref().filter(|k| !k.is_empty());
        let secret = self.secret_key.as_deref().filter(|k| !k.is_empty());
        match (access, secret) {
            (None, _) => bail!("--akey option is required"),
            (_, None) => bail!("--skey option is required"),
            (Some(a), Some(s)) => Ok((a, s)),
        }
    }
}
