//! DNS client: SRV records, backend trait, resolver with retain and cache knobs.

mod error;
mod hickory;
mod resolver;

pub use error::DnsError;
pub use hickory::HickoryBackend;
pub use resolver::{Answer, AnswerSource, DnsSrvResolver, DnsSrvResolverBuilder, DEFAULT_LOOKUP_TIMEOUT};

use std::time::{Duration, Instant};

/// One SRV record as returned by the DNS layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SrvRecord {
    /// Target host name, verbatim (usually with a trailing dot).
    pub target: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
}

impl SrvRecord {
    pub fn new(target: impl Into<String>, port: u16) -> Self {
        Self {
            target: target.into(),
            port,
            priority: 0,
            weight: 0,
        }
    }
}

/// Successful answer from a backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SrvAnswer {
    pub records: Vec<SrvRecord>,
    /// When the answer expires, if the backend knows its TTL.
    pub valid_until: Option<Instant>,
}

impl SrvAnswer {
    /// NOERROR with no records.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(records: Vec<SrvRecord>, valid_until: Option<Instant>) -> Self {
        Self {
            records,
            valid_until,
        }
    }
}

/// Performs one SRV query. Implementations: hickory (system resolver), in-memory fakes.
///
/// An answer with no records must be `Ok(SrvAnswer::empty())`; NXDOMAIN, timeouts and
/// transport failures are errors.
pub trait SrvBackend: Send + Sync {
    fn lookup(&self, query: &str, timeout: Duration) -> Result<SrvAnswer, DnsError>;
}

impl<F> SrvBackend for F
where
    F: Fn(&str, Duration) -> Result<SrvAnswer, DnsError> + Send + Sync,
{
    fn lookup(&self, query: &str, timeout: Duration) -> Result<SrvAnswer, DnsError> {
        self(query, timeout)
    }
}
