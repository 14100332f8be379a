//! podseed: DNS SRV address finder for cluster discovery seed lists, on podseed-core.
//!
//! ```rust,no_run
//! use podseed::{DiscoveryModule, SrvFinderConfig};
//! use podseed_core::Discovery;
//!
//! # fn main() -> Result<(), podseed_core::CoreError> {
//! let mut config = SrvFinderConfig::new("my-service.default.svc.cluster.local");
//! config.container_port_name = Some("discovery".into());
//!
//! let mut discovery = Discovery::new();
//! discovery.register(&mut DiscoveryModule::new().srv(&config)?)?;
//! for endpoint in discovery.seed_list()? {
//!     println!("{endpoint}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod dns;

pub use discovery::{DiscoveryModule, DnsOptions, Resolution, SrvFinder, SrvFinderConfig, SrvQuery, StaticFinder};
pub use dns::{AnswerSource, DnsError, DnsSrvResolver, DnsSrvResolverBuilder, SrvAnswer, SrvBackend, SrvRecord};
pub use podseed_core::{AddressFinder, CoreError, Discovery, Endpoint, Module};
