use serde::{Deserialize, Serialize};

/// Configuration for the upstream gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Path prefix all endpoints are mounted under.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Name reported as `proxiedBy` on proxied successes.
    #[serde(default = "default_name")]
    pub name: String,
    /// Browser origins allowed by the CORS layer. Empty disables CORS.
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
    #[serde(default)]
    pub downstream: DownstreamClientConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            name: default_name(),
            cors_allowed_origins: default_cors_allowed_origins(),
            downstream: DownstreamClientConfig::default(),
        }
    }
}

/// Where and how the gateway reaches the downstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DownstreamClientConfig {
    /// Base URL including the downstream's own base path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Name used in translated error messages and `details.serviceName`.
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Upper bound for a whole call: connect, send and body read.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for DownstreamClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            service_name: default_service_name(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_base_path() -> String {
    "/api/v1".to_owned()
}

fn default_name() -> String {
    "gateway".to_owned()
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["http://localhost:4200".to_owned()]
}

fn default_base_url() -> String {
    "http://127.0.0.1:8082/api/v1".to_owned()
}

fn default_service_name() -> String {
    "downstream-service".to_owned()
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    2
}
