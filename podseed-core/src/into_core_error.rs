//! Map lookup-layer errors to CoreError::Lookup. Used by finders at the host boundary.

use crate::CoreError;

/// Convert any error into a lookup failure for `query`. Use in finders:
/// `.map_err(|e| e.into_core_error(&query))`.
pub trait IntoCoreError {
    fn into_core_error(self, query: &str) -> CoreError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoCoreError for E {
    fn into_core_error(self, query: &str) -> CoreError {
        CoreError::Lookup {
            query: query.to_owned(),
            reason: self.to_string(),
        }
    }
}
