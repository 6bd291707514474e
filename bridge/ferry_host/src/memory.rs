//! In-process host with an inspectable error slot and warning log.
//!
//! `MemoryHost` behaves like a scripting runtime's warning machinery: every
//! delivered diagnostic is checked against an ordered filter list, and a
//! filter can drop the diagnostic or escalate it into an error. Its state sits
//! behind a `parking_lot::Mutex`, which plays the role of the host lock.

use parking_lot::{Mutex, MutexGuard};

use crate::{Host, HostError, HostErrorKind, HostSession, PendingError, WarningCategory};

/// What a matching filter does with a diagnostic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FilterAction {
    /// Record the diagnostic.
    Default,
    /// Drop the diagnostic silently.
    Ignore,
    /// Turn the diagnostic into an error.
    Error,
}

/// One entry of the host's warning filter list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WarningFilter {
    action: FilterAction,
    category: Option<WarningCategory>,
    message_contains: Option<String>,
}

impl WarningFilter {
    /// A filter matching every diagnostic.
    pub fn new(action: FilterAction) -> Self {
        WarningFilter {
            action,
            category: None,
            message_contains: None,
        }
    }

    /// Only match diagnostics of `category`.
    #[must_use]
    pub fn category(mut self, category: WarningCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Only match diagnostics whose message contains `needle`.
    #[must_use]
    pub fn message_contains(mut self, needle: impl Into<String>) -> Self {
        self.message_contains = Some(needle.into());
        self
    }

    pub fn action(&self) -> FilterAction {
        self.action
    }

    fn matches(&self, category: WarningCategory, message: &str) -> bool {
        self.category.map_or(true, |c| c == category)
            && self
                .message_contains
                .as_deref()
                .map_or(true, |needle| message.contains(needle))
    }
}

/// A diagnostic that made it through the filters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeliveredWarning {
    pub category: WarningCategory,
    pub message: String,
}

#[derive(Debug, Default)]
struct HostState {
    pending: Option<PendingError>,
    delivered: Vec<DeliveredWarning>,
    reports: Vec<HostError>,
    /// Most recently added first.
    filters: Vec<WarningFilter>,
}

/// In-memory [`Host`].
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<HostState>,
}

impl MemoryHost {
    /// Create a host with an empty error slot and no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter; it takes precedence over every filter added before.
    pub fn add_filter(&self, filter: WarningFilter) {
        self.state.lock().filters.insert(0, filter);
    }

    /// Remove every filter.
    pub fn clear_filters(&self) {
        self.state.lock().filters.clear();
    }

    /// Copy of the error slot.
    pub fn pending(&self) -> Option<PendingError> {
        self.state.lock().pending.clone()
    }

    /// The error currently set, if any.
    pub fn error(&self) -> Option<HostError> {
        self.state.lock().pending.as_ref().map(|p| p.error().clone())
    }

    /// Take the error out of the slot, clearing it.
    pub fn take_error(&self) -> Option<HostError> {
        self.state.lock().pending.take().map(PendingError::into_error)
    }

    /// Diagnostics delivered so far, oldest first.
    pub fn delivered(&self) -> Vec<DeliveredWarning> {
        self.state.lock().delivered.clone()
    }

    /// Messages of delivered diagnostics, in delivery order.
    pub fn delivered_messages(&self) -> Vec<String> {
        self.state
            .lock()
            .delivered
            .iter()
            .map(|w| w.message.clone())
            .collect()
    }

    /// Secondary errors printed while another error was in flight.
    pub fn reports(&self) -> Vec<HostError> {
        self.state.lock().reports.clone()
    }

    /// Nothing delivered, reported, or raised so far.
    pub fn is_untouched(&self) -> bool {
        let state = self.state.lock();
        state.pending.is_none() && state.delivered.is_empty() && state.reports.is_empty()
    }

    /// Is a session currently open?
    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }
}

impl Host for MemoryHost {
    type Session<'a> = MemorySession<'a>;

    fn session(&self) -> MemorySession<'_> {
        MemorySession {
            state: self.state.lock(),
        }
    }
}

/// Open session on a [`MemoryHost`]; holds the host lock until dropped.
pub struct MemorySession<'a> {
    state: MutexGuard<'a, HostState>,
}

impl MemorySession<'_> {
    fn action_for(&self, category: WarningCategory, message: &str) -> FilterAction {
        self.state
            .filters
            .iter()
            .find(|filter| filter.matches(category, message))
            .map_or(FilterAction::Default, WarningFilter::action)
    }
}

impl HostSession for MemorySession<'_> {
    fn fetch_pending(&mut self) -> Option<PendingError> {
        self.state.pending.take()
    }

    fn restore_pending(&mut self, pending: Option<PendingError>) {
        self.state.pending = pending;
    }

    fn has_pending(&self) -> bool {
        self.state.pending.is_some()
    }

    fn set_error(&mut self, error: HostError) {
        self.state.pending = Some(PendingError::new(error));
    }

    fn deliver(&mut self, category: WarningCategory, message: &str) -> Result<(), HostError> {
        match self.action_for(category, message) {
            FilterAction::Default => {
                self.state.delivered.push(DeliveredWarning {
                    category,
                    message: message.to_string(),
                });
                Ok(())
            }
            FilterAction::Ignore => Ok(()),
            FilterAction::Error => Err(HostError::new(HostErrorKind::Warning(category), message)),
        }
    }

    fn report(&mut self, error: HostError) {
        tracing::error!(kind = %error.kind(), "{}", error.message());
        self.state.reports.push(error);
    }
}

#[cfg(test)]
mod tests;
