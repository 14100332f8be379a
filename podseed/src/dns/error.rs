//! DNS client errors.

use std::time::Duration;

/// Errors from an SRV lookup.
#[derive(Debug, thiserror::Error)]
pub enum DnsError {
    /// Lookup did not finish within the configured timeout.
    #[error("srv lookup for {query} timed out after {timeout:?}")]
    Timeout { query: String, timeout: Duration },

    /// The queried name does not exist.
    #[error("no such domain: {0}")]
    NxDomain(String),

    /// Resolver failure (transport, malformed response, system config).
    #[error("dns lookup failed: {0}")]
    Lookup(#[from] hickory_resolver::ResolveError),

    /// Could not start the runtime that drives lookups.
    #[error("dns runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// Failure reported by a custom backend.
    #[error("dns backend: {0}")]
    Backend(String),
}
