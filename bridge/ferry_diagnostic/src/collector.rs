//! Scoped collection of native diagnostics.
//!
//! A [`WarningCollector`] is installed when a native call starts. While it is
//! active every diagnostic raised on this thread lands in its buffer instead
//! of reaching the host. When the call ends (normally, with a failure, or by
//! unwinding) the buffer is flushed into the host's diagnostic channel.
//!
//! # Lifecycle
//!
//! ```text
//! Inactive --install--> Active --finish/drop--> Draining --> Inactive
//! ```
//!
//! Draining pops the buffering handler before anything is delivered, so a
//! diagnostic raised during delivery goes to the enclosing handler and never
//! back into this buffer.
//!
//! # Flushing while a failure is in flight
//!
//! If [`set_in_failure`](WarningCollector::set_in_failure) was called (or the
//! thread is panicking), the host's pending error is fetched before delivery
//! and restored afterwards. A delivery that fails in that state is reported as
//! a side note and the original error stays authoritative. Without a failure in
//! flight, a failed delivery stops the flush and becomes the raised error.

use std::cell::RefCell;
use std::rc::Rc;

use ferry_canon::Canonicalizer;
use ferry_host::{ErrorRaised, Host, HostSession};

use crate::handler::{pop_handler, push_handler, HandlerSlot};
use crate::{DiagnosticHandler, DiagnosticRecord};

#[derive(Debug, Default)]
struct BufferingHandler {
    records: RefCell<Vec<DiagnosticRecord>>,
}

impl DiagnosticHandler for BufferingHandler {
    fn process(&self, record: DiagnosticRecord) {
        tracing::trace!(diagnostic = record.message(), "buffered native diagnostic");
        self.records.borrow_mut().push(record);
    }
}

/// RAII guard buffering diagnostics for the duration of one native call.
///
/// Not `Send`: the handler stack it sits on is per thread.
pub struct WarningCollector<'a, H: Host> {
    host: &'a H,
    canonicalizer: &'a Canonicalizer,
    buffer: Rc<BufferingHandler>,
    slot: Option<HandlerSlot>,
    in_failure: bool,
}

impl<'a, H: Host> WarningCollector<'a, H> {
    /// Install a collector as this thread's active diagnostic handler.
    pub fn install(host: &'a H, canonicalizer: &'a Canonicalizer) -> Self {
        let buffer = Rc::new(BufferingHandler::default());
        let slot = push_handler(Rc::clone(&buffer) as Rc<dyn DiagnosticHandler>);
        WarningCollector {
            host,
            canonicalizer,
            buffer,
            slot: Some(slot),
            in_failure: false,
        }
    }

    /// Record that a failure is propagating out of the native call.
    pub fn set_in_failure(&mut self) {
        self.in_failure = true;
    }

    /// Is the buffering handler still installed?
    pub fn is_active(&self) -> bool {
        self.slot.is_some()
    }

    /// Number of diagnostics waiting to be flushed.
    pub fn buffered(&self) -> usize {
        self.buffer.records.borrow().len()
    }

    /// Restore the previous handler and flush the buffer.
    ///
    /// Returns `Err` when a delivery failed with no failure in flight; the
    /// delivery error is then the host's pending error.
    pub fn finish(mut self) -> Result<(), ErrorRaised> {
        self.drain()
    }

    fn drain(&mut self) -> Result<(), ErrorRaised> {
        let Some(slot) = self.slot.take() else {
            return Ok(());
        };
        pop_handler(slot);

        let records = self.buffer.records.take();
        if records.is_empty() {
            return Ok(());
        }

        let in_failure = self.in_failure || std::thread::panicking();
        tracing::debug!(count = records.len(), in_failure, "flushing native diagnostics");

        let mut session = self.host.session();
        if in_failure {
            tracing::debug!(host_error_set = session.has_pending(), "saving pending host error");
        }
        let saved = in_failure.then(|| session.fetch_pending());

        let mut failed = None;
        for record in records {
            let (category, message) = record.into_delivery(self.canonicalizer);
            if let Err(error) = session.deliver(category, &message) {
                failed = Some(error);
                break;
            }
        }

        match (saved, failed) {
            (Some(saved), failed) => {
                if let Some(error) = failed {
                    session.report(error);
                }
                session.restore_pending(saved);
                Ok(())
            }
            (None, Some(error)) => {
                tracing::debug!(%error, "diagnostic delivery raised an error");
                Err(session.raise(error))
            }
            (None, None) => Ok(()),
        }
    }
}

impl<H: Host> Drop for WarningCollector<'_, H> {
    fn drop(&mut self) {
        // An escalated delivery error is already in the host slot.
        let _ = self.drain();
    }
}

#[cfg(test)]
mod tests;
