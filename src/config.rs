//! Configuration management for Tollgate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::error::{Result, TollgateError};
use crate::ratelimit::LimiterConfig;
use crate::ring::{HashRing, HasherKind};

/// Top-level configuration: one ring and any number of named limiter rules.
///
/// ```yaml
/// ring:
///   replicas: 100
///   hasher: sha256
/// limiters:
///   api:
///     strategy: token_bucket
///     capacity: 5
///     refill_per_sec: 1.0
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TollgateConfig {
    /// Hash ring configuration
    #[serde(default)]
    pub ring: RingConfig,

    /// Limiter rules by name
    #[serde(default)]
    pub limiters: BTreeMap<String, LimiterConfig>,
}

/// Hash ring configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingConfig {
    /// Virtual nodes per physical node
    #[serde(default = "default_replicas")]
    pub replicas: u32,

    /// Key hashing function
    #[serde(default)]
    pub hasher: HasherKind,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            replicas: default_replicas(),
            hasher: HasherKind::default(),
        }
    }
}

fn default_replicas() -> u32 {
    100
}

impl RingConfig {
    /// Build an empty ring from this configuration.
    pub fn build(&self) -> Result<HashRing<HasherKind>> {
        HashRing::with_hasher(self.replicas, self.hasher)
    }
}

impl TollgateConfig {
    /// Load configuration from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| TollgateError::Config(format!("Failed to parse configuration: {}", e)))
    }

    /// Look up a limiter rule by name.
    pub fn limiter(&self, name: &str) -> Result<&LimiterConfig> {
        self.limiters
            .get(name)
            .ok_or_else(|| TollgateError::Config(format!("No limiter named `{}`", name)))
    }
}
