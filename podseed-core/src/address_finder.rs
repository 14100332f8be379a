//! Address finder trait: registered_addresses() -> seed endpoints. Implemented by adapters (SRV, static).

use std::fmt;

use crate::{CoreError, Endpoint};

/// Produces the discovery seed list on demand.
///
/// The host calls [`registered_addresses`](AddressFinder::registered_addresses) whenever it
/// needs peers to join or rejoin a cluster. An empty list is a valid answer; an error means
/// the finder could not produce any data at all. `Debug` is the human-readable description
/// the host prints for diagnostics.
pub trait AddressFinder: fmt::Debug + Send + Sync {
    /// Current seed endpoints. Order is unspecified and duplicates are kept.
    fn registered_addresses(&self) -> Result<Vec<Endpoint>, CoreError>;

    /// Whether the finder's list is shared between nodes. Informational only.
    fn is_shared(&self) -> bool {
        true
    }
}

impl<T: AddressFinder + ?Sized> AddressFinder for Box<T> {
    fn registered_addresses(&self) -> Result<Vec<Endpoint>, CoreError> {
        (**self).registered_addresses()
    }

    fn is_shared(&self) -> bool {
        (**self).is_shared()
    }
}

impl<T: AddressFinder + ?Sized> AddressFinder for std::sync::Arc<T> {
    fn registered_addresses(&self) -> Result<Vec<Endpoint>, CoreError> {
        (**self).registered_addresses()
    }

    fn is_shared(&self) -> bool {
        (**self).is_shared()
    }
}
