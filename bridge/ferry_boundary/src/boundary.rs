//! Scoped native calls.
//!
//! [`Boundary::call`] runs a native closure under a
//! [`WarningCollector`] and, on the way out, puts things in the order the
//! host expects:
//!
//! 1. a failure (returned or panicked) is translated and raised first
//! 2. the collected diagnostics are flushed, preserving that error
//! 3. the previous diagnostic handler is active again
//!
//! On success the diagnostics are flushed after the closure returns; an
//! escalated diagnostic turns the call into a failure.

use std::panic::{self, AssertUnwindSafe};

use ferry_diagnostic::WarningCollector;
use ferry_host::{ErrorRaised, Host};

use crate::{translate_failure_to_host, BoundaryConfig, Failure};

/// Entry point for native calls made on behalf of a host.
pub struct Boundary<'h, H: Host> {
    host: &'h H,
    config: BoundaryConfig,
}

impl<'h, H: Host> Boundary<'h, H> {
    /// Boundary for `host` with the default configuration.
    pub fn new(host: &'h H) -> Self {
        Self::with_config(host, BoundaryConfig::default())
    }

    /// Boundary for `host` with `config`.
    pub fn with_config(host: &'h H, config: BoundaryConfig) -> Self {
        Boundary { host, config }
    }

    pub fn host(&self) -> &'h H {
        self.host
    }

    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    /// Install a collector without running anything, for callers that manage
    /// the call themselves.
    pub fn collect(&self) -> WarningCollector<'_, H> {
        WarningCollector::install(self.host, &self.config.canonicalizer)
    }

    /// Run `native` and bring its outcome across the boundary.
    ///
    /// `Err(ErrorRaised)` means the host's error slot holds the error the
    /// caller should surface.
    pub fn call<T, E, F>(&self, native: F) -> Result<T, ErrorRaised>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<Failure>,
    {
        let mut collector = self.collect();

        match self.run(native) {
            Ok(value) => {
                collector.finish()?;
                Ok(value)
            }
            Err(failure) => {
                collector.set_in_failure();
                let raised = {
                    let mut session = self.host.session();
                    translate_failure_to_host(&mut session, &self.config.canonicalizer, failure)
                };
                drop(collector);
                Err(raised)
            }
        }
    }

    fn run<T, E, F>(&self, native: F) -> Result<T, Failure>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<Failure>,
    {
        if !self.config.catch_panics {
            return native().map_err(Into::into);
        }

        match panic::catch_unwind(AssertUnwindSafe(native)) {
            Ok(result) => result.map_err(Into::into),
            Err(payload) => {
                tracing::debug!("native call panicked");
                Err(Failure::Foreign(payload))
            }
        }
    }
}
