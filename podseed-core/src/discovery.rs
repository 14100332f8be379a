//! Discovery: holds the installed address finder and hands its seed list to the host protocol.

use crate::address_finder::AddressFinder;
use crate::module::Module;
use crate::{CoreError, Endpoint};

/// Discovery host: one address finder, set by a module before the node joins.
#[derive(Debug, Default)]
pub struct Discovery {
    pub(crate) finder: Option<Box<dyn AddressFinder>>,
}

impl Discovery {
    pub fn new() -> Self {
        Self { finder: None }
    }

    /// Set the address finder (called by DiscoveryModule). Replaces any previous one.
    pub fn set_finder(&mut self, finder: Box<dyn AddressFinder>) {
        self.finder = Some(finder);
    }

    /// Address finder if installed.
    pub fn finder(&self) -> Option<&dyn AddressFinder> {
        self.finder.as_deref()
    }

    /// Register a module: app.register(&mut discovery_module).
    pub fn register(&mut self, module: &mut dyn Module) -> Result<(), CoreError> {
        module.register_into(self)
    }

    /// Seed list for a cluster join. Errors if no finder was installed.
    pub fn seed_list(&self) -> Result<Vec<Endpoint>, CoreError> {
        let finder = self
            .finder
            .as_ref()
            .ok_or_else(|| CoreError::Config("no address finder installed".into()))?;
        finder.registered_addresses()
    }
}
