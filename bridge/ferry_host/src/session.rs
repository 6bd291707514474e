//! The host channel as seen from native code.
//!
//! A [`Host`] hands out [`HostSession`]s. Opening a session acquires whatever
//! serialization the host's error and diagnostic channel needs (a global
//! interpreter lock, a mutex, ...); dropping it releases that again. The
//! boundary only opens sessions while flushing diagnostics or raising a
//! translated error, never across a native call.

use crate::{ErrorRaised, HostError, PendingError, WarningCategory};

/// An embedding runtime with a single-slot error indicator and a diagnostic
/// channel.
pub trait Host {
    type Session<'a>: HostSession
    where
        Self: 'a;

    /// Acquire the host lock and open the error/diagnostic channel.
    fn session(&self) -> Self::Session<'_>;
}

/// Lock-holding access to the host's error slot and diagnostic channel.
pub trait HostSession {
    /// Take the pending error state out of the error slot, leaving it empty.
    fn fetch_pending(&mut self) -> Option<PendingError>;

    /// Put a previously fetched state back. `None` clears the slot.
    fn restore_pending(&mut self, pending: Option<PendingError>);

    /// Is an error currently set?
    fn has_pending(&self) -> bool;

    /// Set a new error, replacing whatever was in the slot.
    fn set_error(&mut self, error: HostError);

    /// Deliver one diagnostic.
    ///
    /// Host filter policy may turn the diagnostic into an error, which is
    /// returned instead of being set in the slot.
    fn deliver(&mut self, category: WarningCategory, message: &str) -> Result<(), HostError>;

    /// Print a secondary error without touching the error slot.
    fn report(&mut self, error: HostError);

    /// Set `error` in the slot and return proof that it was set.
    fn raise(&mut self, error: HostError) -> ErrorRaised {
        self.set_error(error);
        ErrorRaised(())
    }
}
