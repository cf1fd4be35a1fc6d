//! Layered server configuration.
//!
//! Built-in defaults, then an optional YAML file, then `HOPWIRE__*`
//! environment variables (`__` separates nesting levels, e.g.
//! `HOPWIRE__GATEWAY__BIND_ADDR`).

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use hopwire_downstream::DownstreamConfig;
use hopwire_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "HOPWIRE__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub downstream: ServiceSection<DownstreamConfig>,
    pub gateway: ServiceSection<GatewayConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            downstream: ServiceSection {
                bind_addr: SocketAddr::from(([127, 0, 0, 1], 8082)),
                settings: DownstreamConfig::default(),
            },
            gateway: ServiceSection {
                bind_addr: SocketAddr::from(([127, 0, 0, 1], 8081)),
                settings: GatewayConfig::default(),
            },
        }
    }
}

/// Listen address plus the service's own settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection<T> {
    pub bind_addr: SocketAddr,
    pub settings: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: ConsoleFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: ConsoleFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleFormat {
    Pretty,
    Json,
}

impl AppConfig {
    /// Load the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or any layer does not fit
    /// the configuration schema.
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        Self::figment(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    /// Defaults plus the optional YAML file.
    fn figment(file: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        match file {
            Some(path) => figment.merge(Yaml::file_exact(path)),
            None => figment,
        }
    }
}
