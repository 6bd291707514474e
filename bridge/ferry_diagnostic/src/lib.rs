//! Native diagnostics for the ferry boundary.
//!
//! Native code raises warnings with [`native_warn!`] (or
//! [`raise_diagnostic`]). Where they go depends on the current thread's
//! handler stack:
//!
//! - inside a native call, a [`WarningCollector`] buffers them and flushes
//!   them into the host once the call returns
//! - outside any call, [`LogHandler`] logs them through `tracing`
//!
//! ```text
//! let mut collector = WarningCollector::install(&host, &canonicalizer);
//! native_warn!("falling back to a slow path for {}", op);
//! collector.finish()?;   // delivered to the host here
//! ```

mod collector;
mod handler;
mod record;

pub use collector::WarningCollector;
pub use handler::{
    current_handler, handler_depth, pop_handler, push_handler, raise_diagnostic, DiagnosticHandler,
    HandlerSlot, LogHandler,
};
pub use record::{DiagnosticRecord, SourceLocation};

/// Raise a diagnostic carrying the caller's source location.
///
/// The host shows the message with ` (Triggered internally at file:line.)`
/// appended.
#[macro_export]
macro_rules! native_warn {
    ($($arg:tt)+) => {
        $crate::raise_diagnostic(
            ::core::option::Option::Some($crate::SourceLocation::new(
                ::core::file!(),
                ::core::line!(),
            )),
            ::std::format!($($arg)+),
            false,
        )
    };
}

/// Raise a diagnostic whose attribution is left to the host.
#[macro_export]
macro_rules! native_warn_verbatim {
    ($($arg:tt)+) => {
        $crate::raise_diagnostic(
            ::core::option::Option::Some($crate::SourceLocation::new(
                ::core::file!(),
                ::core::line!(),
            )),
            ::std::format!($($arg)+),
            true,
        )
    };
}
