//! Finder configuration as a deployment descriptor would provide it (JSON).

use std::time::Duration;

use podseed_core::CoreError;
use serde::{Deserialize, Serialize};

use crate::dns::{DnsSrvResolver, DnsSrvResolverBuilder, DEFAULT_LOOKUP_TIMEOUT};

/// SRV finder configuration.
///
/// ```json
/// { "service_name": "my-service.default.svc.cluster.local",
///   "container_port_name": "discovery",
///   "dns": { "cache_lookups": true } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrvFinderConfig {
    pub service_name: String,

    /// When set, the query becomes `_<port>._tcp.<service_name>`.
    #[serde(default)]
    pub container_port_name: Option<String>,

    #[serde(default = "default_shared")]
    pub shared: bool,

    #[serde(default)]
    pub dns: DnsOptions,
}

impl SrvFinderConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            container_port_name: None,
            shared: default_shared(),
            dns: DnsOptions::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("invalid finder config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot work, such as a zero lookup timeout.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.dns.validate()
    }
}

/// DNS client knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsOptions {
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,

    /// Serve the last successful answer when a lookup fails.
    #[serde(default = "default_retain")]
    pub retain_data_on_failures: bool,

    /// Reuse successful answers until their TTL expires.
    #[serde(default)]
    pub cache_lookups: bool,
}

impl DnsOptions {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.lookup_timeout_ms == 0 {
            return Err(CoreError::Config(
                "dns.lookup_timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Resolver builder with these knobs and the default backend.
    pub fn resolver_builder(&self) -> DnsSrvResolverBuilder {
        DnsSrvResolver::builder()
            .dns_lookup_timeout(self.lookup_timeout())
            .retaining_data_on_failures(self.retain_data_on_failures)
            .caching_lookups(self.cache_lookups)
    }
}

impl Default for DnsOptions {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: default_lookup_timeout_ms(),
            retain_data_on_failures: default_retain(),
            cache_lookups: false,
        }
    }
}

fn default_shared() -> bool {
    true
}

fn default_retain() -> bool {
    true
}

fn default_lookup_timeout_ms() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT.as_millis() as u64
}
