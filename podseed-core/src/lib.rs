//! podseed core: endpoint model, address finder contract, discovery host.

pub mod address_finder;
pub mod discovery;
pub mod endpoint;
pub mod into_core_error;
pub mod module;

pub use address_finder::AddressFinder;
pub use discovery::Discovery;
pub use endpoint::Endpoint;
pub use into_core_error::IntoCoreError;
pub use module::Module;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Finder misconfigured or reconfigured after use. Raised before any lookup.
    #[error("configuration error: {0}")]
    Config(String),
    /// DNS lookup failed and no retained data was available.
    #[error("lookup failed for {query}: {reason}")]
    Lookup { query: String, reason: String },
}
