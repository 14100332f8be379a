//! SRV address finder: resolves the configured query to seed endpoints on every call.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use podseed_core::{AddressFinder, CoreError, Endpoint, IntoCoreError};
use tracing::{debug, warn};

use super::config::SrvFinderConfig;
use super::query::{check_name, SrvQuery};
use crate::dns::{AnswerSource, DnsSrvResolver, DnsSrvResolverBuilder};

/// Outcome of one lookup, with the provenance of the records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub query: SrvQuery,
    pub endpoints: Vec<Endpoint>,
    pub source: AnswerSource,
}

impl Resolution {
    /// True when the DNS lookup failed and the last-known-good answer was returned.
    pub fn is_stale(&self) -> bool {
        self.source == AnswerSource::Retained
    }
}

enum State {
    Configuring {
        service_name: Option<String>,
        container_port_name: Option<String>,
        dns: DnsSrvResolverBuilder,
    },
    Serving {
        query: SrvQuery,
        dns: Arc<DnsSrvResolver>,
    },
}

/// Address finder backed by DNS SRV records.
///
/// Each name can be set once, and only before the first lookup; the first lookup seals
/// the configuration into an immutable [`SrvQuery`]. Lookups run outside the lock, so
/// concurrent callers only contend for the moment it takes to read the sealed query.
pub struct SrvFinder {
    state: Mutex<State>,
    shared: bool,
}

impl SrvFinder {
    /// Shared finder with the default DNS client (retain on failure, no cache, 1000 ms).
    pub fn new() -> Self {
        Self::with_dns(DnsSrvResolver::builder())
    }

    /// Finder with the given shared flag.
    pub fn with_shared(shared: bool) -> Self {
        let mut finder = Self::new();
        finder.shared = shared;
        finder
    }

    /// Finder whose DNS client is built from `dns` at the first lookup.
    pub fn with_dns(dns: DnsSrvResolverBuilder) -> Self {
        Self {
            state: Mutex::new(State::Configuring {
                service_name: None,
                container_port_name: None,
                dns,
            }),
            shared: true,
        }
    }

    /// Finder fully configured from a descriptor.
    pub fn from_config(config: &SrvFinderConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let mut finder = Self::with_dns(config.dns.resolver_builder());
        finder.shared = config.shared;
        finder.set_service_name(config.service_name.as_str())?;
        if let Some(port) = &config.container_port_name {
            finder.set_container_port_name(port.as_str())?;
        }
        Ok(finder)
    }

    pub fn set_service_name(&self, service_name: impl Into<String>) -> Result<(), CoreError> {
        let value = service_name.into();
        check_name("service name", &value)?;
        let mut state = self.lock();
        match &mut *state {
            State::Serving { .. } => Err(CoreError::Config(
                "service name cannot be changed after the first lookup".into(),
            )),
            State::Configuring {
                service_name: Some(current),
                ..
            } => Err(CoreError::Config(format!(
                "service name already set to {:?}",
                current
            ))),
            State::Configuring { service_name, .. } => {
                *service_name = Some(value);
                Ok(())
            }
        }
    }

    pub fn set_container_port_name(&self, port_name: impl Into<String>) -> Result<(), CoreError> {
        let value = port_name.into();
        check_name("container port name", &value)?;
        let mut state = self.lock();
        match &mut *state {
            State::Serving { .. } => Err(CoreError::Config(
                "container port name cannot be changed after the first lookup".into(),
            )),
            State::Configuring {
                container_port_name: Some(current),
                ..
            } => Err(CoreError::Config(format!(
                "container port name already set to {:?}",
                current
            ))),
            State::Configuring {
                container_port_name,
                ..
            } => {
                *container_port_name = Some(value);
                Ok(())
            }
        }
    }

    /// The sealed query, or the query the current configuration would produce.
    pub fn query(&self) -> Result<SrvQuery, CoreError> {
        match &*self.lock() {
            State::Serving { query, .. } => Ok(query.clone()),
            State::Configuring {
                service_name,
                container_port_name,
                ..
            } => SrvQuery::from_parts(service_name.clone(), container_port_name.clone()),
        }
    }

    /// Look up the SRV records and report where they came from.
    pub fn resolve(&self) -> Result<Resolution, CoreError> {
        let (query, dns) = self.serving()?;
        debug!(fqdn = %query, "looking up SRV records");
        let answer = dns
            .resolve(query.as_str())
            .map_err(|e| e.into_core_error(query.as_str()))?;
        let endpoints: Vec<Endpoint> = answer
            .records
            .into_iter()
            .map(|record| Endpoint::new(record.target, record.port))
            .collect();
        debug!(fqdn = %query, found = endpoints.len(), source = %answer.source, "found nodes");
        if answer.source == AnswerSource::Retained {
            warn!(fqdn = %query, found = endpoints.len(), "dns lookup failed or came back empty, serving last known endpoints");
        }
        Ok(Resolution {
            query,
            endpoints,
            source: answer.source,
        })
    }

    /// Endpoints only. Empty when the DNS answer has no records.
    pub fn resolve_endpoints(&self) -> Result<Vec<Endpoint>, CoreError> {
        self.resolve().map(|resolution| resolution.endpoints)
    }

    /// Seal the configuration on first use and hand out the query and DNS client.
    fn serving(&self) -> Result<(SrvQuery, Arc<DnsSrvResolver>), CoreError> {
        let mut state = self.lock();
        let sealed = match &*state {
            State::Serving { query, dns } => return Ok((query.clone(), Arc::clone(dns))),
            State::Configuring {
                service_name,
                container_port_name,
                dns,
            } => {
                let query = SrvQuery::from_parts(service_name.clone(), container_port_name.clone())?;
                let dns = dns
                    .clone()
                    .build()
                    .map_err(|e| e.into_core_error(query.as_str()))?;
                (query, Arc::new(dns))
            }
        };
        *state = State::Serving {
            query: sealed.0.clone(),
            dns: Arc::clone(&sealed.1),
        };
        Ok(sealed)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SrvFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressFinder for SrvFinder {
    fn registered_addresses(&self) -> Result<Vec<Endpoint>, CoreError> {
        self.resolve_endpoints()
    }

    fn is_shared(&self) -> bool {
        self.shared
    }
}

impl fmt::Debug for SrvFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        let mut out = f.debug_struct("SrvFinder");
        match &*state {
            State::Configuring {
                service_name,
                container_port_name,
                dns,
            } => out
                .field("service_name", service_name)
                .field("container_port_name", container_port_name)
                .field("dns", dns),
            State::Serving { query, dns } => out
                .field("service_name", &query.service_name())
                .field("container_port_name", &query.container_port_name())
                .field("fqdn", &query.as_str())
                .field("dns", dns),
        };
        out.field("shared", &self.shared).finish()
    }
}
