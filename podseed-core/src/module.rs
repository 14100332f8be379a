//! Module trait: install a finder (or anything else) into Discovery.

use crate::discovery::Discovery;
use crate::CoreError;

/// Module: register into the discovery host.
pub trait Module {
    fn register_into(&mut self, discovery: &mut Discovery) -> Result<(), CoreError>;
}
