//! Discovery: address finders (SRV, static) and DiscoveryModule to install one.

mod config;
mod protocol;
mod query;
mod srv;

pub use config::{DnsOptions, SrvFinderConfig};
pub use protocol::StaticFinder;
pub use query::SrvQuery;
pub use srv::{Resolution, SrvFinder};

use podseed_core::{AddressFinder, CoreError, Discovery, Endpoint, Module};

/// Chooses the address finder and installs it with `discovery.register(&mut module)`.
/// Without a choice an empty static finder is installed.
#[derive(Debug)]
pub struct DiscoveryModule {
    finder: Option<Box<dyn AddressFinder>>,
}

impl DiscoveryModule {
    pub fn new() -> Self {
        Self { finder: None }
    }

    /// Fixed seed list.
    pub fn static_endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.finder = Some(Box::new(StaticFinder::new(endpoints)));
        self
    }

    /// Fixed seed list from (host, port) pairs.
    pub fn static_slice(mut self, pairs: &[(&str, u16)]) -> Self {
        self.finder = Some(Box::new(StaticFinder::from_slice(pairs)));
        self
    }

    /// DNS SRV finder built from a descriptor.
    pub fn srv(mut self, config: &SrvFinderConfig) -> Result<Self, CoreError> {
        self.finder = Some(Box::new(SrvFinder::from_config(config)?));
        Ok(self)
    }

    /// Use a custom implementation (or a preconfigured SrvFinder).
    pub fn finder(mut self, finder: impl AddressFinder + 'static) -> Self {
        self.finder = Some(Box::new(finder));
        self
    }
}

impl Default for DiscoveryModule {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for DiscoveryModule {
    fn register_into(&mut self, discovery: &mut Discovery) -> Result<(), CoreError> {
        let finder = self
            .finder
            .take()
            .unwrap_or_else(|| Box::new(StaticFinder::default()) as Box<dyn AddressFinder>);
        discovery.set_finder(finder);
        Ok(())
    }
}
