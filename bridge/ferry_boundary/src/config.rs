//! Boundary configuration.

use std::sync::Arc;

use ferry_canon::Canonicalizer;

/// Configuration for [`Boundary`](crate::Boundary).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryConfig {
    /// Rewrites internal names in failure and diagnostic messages.
    pub canonicalizer: Arc<Canonicalizer>,
    /// Catch panics in native code and raise them as fatal host errors.
    /// When off, panics unwind through the boundary (diagnostics are still
    /// flushed on the way out).
    pub catch_panics: bool,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        BoundaryConfig {
            canonicalizer: ferry_canon::shared(),
            catch_panics: true,
        }
    }
}

impl BoundaryConfig {
    /// Use `canonicalizer` instead of the shared default.
    #[must_use]
    pub fn with_canonicalizer(mut self, canonicalizer: Canonicalizer) -> Self {
        self.canonicalizer = Arc::new(canonicalizer);
        self
    }

    /// Enable or disable catching panics in native code.
    #[must_use]
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }
}
