use serde::{Deserialize, Serialize};

/// Configuration for the downstream demo service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DownstreamConfig {
    /// Path prefix all endpoints are mounted under.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Name reported by `/success`.
    #[serde(default = "default_name")]
    pub name: String,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            name: default_name(),
        }
    }
}

fn default_base_path() -> String {
    "/api/v1".to_owned()
}

fn default_name() -> String {
    "downstream-service".to_owned()
}
