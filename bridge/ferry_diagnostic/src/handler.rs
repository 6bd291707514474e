//! Per-thread diagnostic handler stack.
//!
//! Native code raises diagnostics through [`raise_diagnostic`], which hands
//! the record to the handler on top of the current thread's stack. Handlers
//! are pushed and popped in LIFO order; a nested native call installs a new
//! handler above the enclosing one and restores it on exit. With an empty
//! stack, records go to [`LogHandler`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{DiagnosticRecord, SourceLocation};

/// Receives diagnostics raised on this thread.
pub trait DiagnosticHandler {
    fn process(&self, record: DiagnosticRecord);
}

/// Fallback handler: emits the diagnostic as a `tracing` warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogHandler;

impl DiagnosticHandler for LogHandler {
    fn process(&self, record: DiagnosticRecord) {
        match record.location() {
            Some(location) => {
                tracing::warn!(target: "ferry::native", %location, "{}", record.message());
            }
            None => tracing::warn!(target: "ferry::native", "{}", record.message()),
        }
    }
}

struct Installed {
    id: u64,
    handler: Rc<dyn DiagnosticHandler>,
}

thread_local! {
    static HANDLERS: RefCell<Vec<Installed>> = const { RefCell::new(Vec::new()) };
    static NEXT_ID: Cell<u64> = const { Cell::new(0) };
}

/// Position of a pushed handler; consumed by [`pop_handler`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pushed handler must be popped"]
pub struct HandlerSlot {
    id: u64,
    depth: usize,
}

impl HandlerSlot {
    /// Stack depth below this handler when it was pushed.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Make `handler` the active handler for this thread.
pub fn push_handler(handler: Rc<dyn DiagnosticHandler>) -> HandlerSlot {
    let id = NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id.wrapping_add(1));
        id
    });
    HANDLERS.with(|stack| {
        let mut stack = stack.borrow_mut();
        let depth = stack.len();
        stack.push(Installed { id, handler });
        HandlerSlot { id, depth }
    })
}

/// Remove the handler installed at `slot`.
///
/// Only that handler is removed. Popping out of order is logged and leaves the
/// handlers pushed after it in place, still active.
pub fn pop_handler(slot: HandlerSlot) {
    let removed = HANDLERS.try_with(|stack| {
        let mut stack = stack.borrow_mut();
        let position = stack.iter().rposition(|installed| installed.id == slot.id)?;
        if position + 1 != stack.len() {
            tracing::error!(
                depth = slot.depth,
                above = stack.len() - position - 1,
                "diagnostic handler popped out of order"
            );
        }
        Some(stack.remove(position))
    });
    // Dropped outside the borrow: a handler's drop may raise.
    drop(removed);
}
/// The handler diagnostics currently go to, if one is installed.
pub fn current_handler() -> Option<Rc<dyn DiagnosticHandler>> {
    HANDLERS
        .try_with(|stack| stack.borrow().last().map(|top| Rc::clone(&top.handler)))
        .ok()
        .flatten()
}

/// Number of handlers installed on this thread.
pub fn handler_depth() -> usize {
    HANDLERS.with(|stack| stack.borrow().len())
}

/// Raise a diagnostic from native code.
///
/// Routed to the active handler, or logged when none is installed. Never
/// fails.
pub fn raise_diagnostic(location: Option<SourceLocation>, message: impl Into<String>, verbatim: bool) {
    let record = DiagnosticRecord::new(location, message, verbatim);
    // The stack borrow is released before the handler runs.
    match current_handler() {
        Some(handler) => handler.process(record),
        None => LogHandler.process(record),
    }
}
