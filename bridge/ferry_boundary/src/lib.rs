//! Native/host error boundary.
//!
//! Converts failures and deferred diagnostics raised by native code into the
//! host's own error and warning channels at the point where control returns
//! to the host.
//!
//! - **Failures**: [`NativeFailure`] categories map 1:1 onto host error
//!   classes; unknown payloads become fatal errors ([`translate`]).
//! - **Diagnostics**: buffered per call and flushed once the call is over
//!   ([`ferry_diagnostic::WarningCollector`]).
//! - **Calls**: [`Boundary::call`] composes both in the required order.
//!
//! ```text
//! let host = MemoryHost::new();
//! let boundary = Boundary::new(&host);
//! let sum = boundary.call(|| {
//!     native_warn!("accumulating in CPUDoubleType");
//!     Ok::<_, NativeFailure>(42)
//! })?;
//! ```

mod boundary;
mod config;
mod failure;
pub mod translate;

use std::sync::Once;

pub use boundary::Boundary;
pub use config::BoundaryConfig;
pub use failure::{Failure, FailureKind, NativeFailure};
pub use translate::{classify, to_host_error, translate_failure_to_host, Classified, FALLBACK_MESSAGE};

pub use ferry_diagnostic::{native_warn, native_warn_verbatim, WarningCollector};
pub use ferry_host::{ErrorRaised, Host, HostError, HostErrorKind, HostSession};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=ferry_boundary=debug,ferry_diagnostic=trace`. Set
/// `FERRY_LOG_TREE=1` for indented, span-nested output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }

        let tree = std::env::var_os("FERRY_LOG_TREE").is_some();
        let filter = EnvFilter::from_default_env();
        // Another subscriber may already be installed by the embedding host.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tree.then(|| tracing_tree::HierarchicalLayer::new(2).with_targets(true)))
            .with((!tree).then(|| fmt::layer().with_target(true).with_level(true)))
            .try_init();
    });
}
