//! SRV resolver with two independent knobs: retain last-known-good data on failure,
//! and cache successful answers for the TTL the backend reports.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use super::{DnsError, HickoryBackend, SrvBackend, SrvRecord};

/// Per-lookup deadline used unless the builder overrides it.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(1000);

/// Where an answer came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerSource {
    /// Fresh answer from the backend.
    Live,
    /// Cached successful answer that has not expired yet.
    Cached,
    /// Last-known-good answer returned because the lookup failed or came back empty.
    Retained,
}

impl fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnswerSource::Live => "live",
            AnswerSource::Cached => "cached",
            AnswerSource::Retained => "retained",
        })
    }
}

/// Records plus their provenance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub records: Vec<SrvRecord>,
    pub source: AnswerSource,
}

struct CachedAnswer {
    records: Vec<SrvRecord>,
    valid_until: Instant,
}

#[derive(Default)]
struct ResolverState {
    cached: HashMap<String, CachedAnswer>,
    last_good: HashMap<String, Vec<SrvRecord>>,
}

/// Blocking SRV resolver.
///
/// Thread-safe; share it behind an `Arc`. State is keyed by query string and is never
/// exposed to callers beyond the [`AnswerSource`] of each answer.
pub struct DnsSrvResolver {
    backend: Arc<dyn SrvBackend>,
    lookup_timeout: Duration,
    retain_data_on_failures: bool,
    cache_lookups: bool,
    state: Mutex<ResolverState>,
}

impl fmt::Debug for DnsSrvResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsSrvResolver")
            .field("lookup_timeout", &self.lookup_timeout)
            .field("retain_data_on_failures", &self.retain_data_on_failures)
            .field("cache_lookups", &self.cache_lookups)
            .finish()
    }
}

impl DnsSrvResolver {
    pub fn builder() -> DnsSrvResolverBuilder {
        DnsSrvResolverBuilder::new()
    }

    pub fn lookup_timeout(&self) -> Duration {
        self.lookup_timeout
    }

    pub fn retains_data_on_failures(&self) -> bool {
        self.retain_data_on_failures
    }

    pub fn caches_lookups(&self) -> bool {
        self.cache_lookups
    }

    /// Resolve `query` as a SRV name. Blocks for at most the lookup timeout.
    pub fn resolve(&self, query: &str) -> Result<Answer, DnsError> {
        if self.cache_lookups {
            if let Some(records) = self.cached(query) {
                debug!(query, "srv answer served from cache");
                return Ok(Answer {
                    records,
                    source: AnswerSource::Cached,
                });
            }
        }

        match self.backend.lookup(query, self.lookup_timeout) {
            Ok(answer) => {
                let mut state = self.lock();
                if self.retain_data_on_failures {
                    if answer.records.is_empty() {
                        if let Some(records) = state.last_good.get(query).cloned() {
                            debug!(query, "srv answer empty, using retained answer");
                            return Ok(Answer {
                                records,
                                source: AnswerSource::Retained,
                            });
                        }
                    } else {
                        state
                            .last_good
                            .insert(query.to_owned(), answer.records.clone());
                    }
                }
                if self.cache_lookups {
                    match answer.valid_until {
                        Some(valid_until) => {
                            state.cached.insert(
                                query.to_owned(),
                                CachedAnswer {
                                    records: answer.records.clone(),
                                    valid_until,
                                },
                            );
                        }
                        None => {
                            state.cached.remove(query);
                        }
                    }
                }
                Ok(Answer {
                    records: answer.records,
                    source: AnswerSource::Live,
                })
            }
            Err(err) => {
                if self.retain_data_on_failures {
                    let retained = self.lock().last_good.get(query).cloned();
                    if let Some(records) = retained {
                        debug!(query, error = %err, "srv lookup failed, using retained answer");
                        return Ok(Answer {
                            records,
                            source: AnswerSource::Retained,
                        });
                    }
                }
                Err(err)
            }
        }
    }

    fn cached(&self, query: &str) -> Option<Vec<SrvRecord>> {
        let mut state = self.lock();
        let now = Instant::now();
        match state.cached.get(query) {
            Some(entry) if entry.valid_until > now => Some(entry.records.clone()),
            Some(_) => {
                state.cached.remove(query);
                None
            }
            None => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ResolverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builder for [`DnsSrvResolver`]. Defaults: 1000 ms timeout, retain on, cache off,
/// hickory backend on the system resolver configuration.
#[derive(Clone)]
pub struct DnsSrvResolverBuilder {
    backend: Option<Arc<dyn SrvBackend>>,
    lookup_timeout: Duration,
    retain_data_on_failures: bool,
    cache_lookups: bool,
}

impl fmt::Debug for DnsSrvResolverBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsSrvResolverBuilder")
            .field("custom_backend", &self.backend.is_some())
            .field("lookup_timeout", &self.lookup_timeout)
            .field("retain_data_on_failures", &self.retain_data_on_failures)
            .field("cache_lookups", &self.cache_lookups)
            .finish()
    }
}

impl DnsSrvResolverBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            retain_data_on_failures: true,
            cache_lookups: false,
        }
    }

    /// Return the last non-empty answer for a query when a later lookup fails or is empty.
    pub fn retaining_data_on_failures(mut self, retain: bool) -> Self {
        self.retain_data_on_failures = retain;
        self
    }

    /// Reuse successful answers until the backend-reported expiry.
    pub fn caching_lookups(mut self, cache: bool) -> Self {
        self.cache_lookups = cache;
        self
    }

    pub fn dns_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Use a custom backend instead of the system resolver.
    pub fn backend(mut self, backend: impl SrvBackend + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    pub fn build(self) -> Result<DnsSrvResolver, DnsError> {
        let backend: Arc<dyn SrvBackend> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(HickoryBackend::from_system_conf(self.lookup_timeout)?),
        };
        Ok(DnsSrvResolver {
            backend,
            lookup_timeout: self.lookup_timeout,
            retain_data_on_failures: self.retain_data_on_failures,
            cache_lookups: self.cache_lookups,
            state: Mutex::new(ResolverState::default()),
        })
    }
}

impl Default for DnsSrvResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
