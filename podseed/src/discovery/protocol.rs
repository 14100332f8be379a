//! Static address finder: a fixed seed list, e.g. for local clusters or as the host default.

use podseed_core::{AddressFinder, CoreError, Endpoint};

/// Finder over a fixed list of endpoints.
#[derive(Clone, Debug, Default)]
pub struct StaticFinder {
    endpoints: Vec<Endpoint>,
}

impl StaticFinder {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }

    /// Build from a slice of (host, port) pairs.
    pub fn from_slice(pairs: &[(&str, u16)]) -> Self {
        Self {
            endpoints: pairs.iter().map(|&pair| Endpoint::from(pair)).collect(),
        }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }
}

impl AddressFinder for StaticFinder {
    fn registered_addresses(&self) -> Result<Vec<Endpoint>, CoreError> {
        Ok(self.endpoints.clone())
    }
}
