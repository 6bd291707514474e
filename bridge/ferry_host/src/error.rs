//! Host-side error and warning vocabulary.
//!
//! These are the constructs the host runtime exposes to user code. Native
//! failures are translated into a [`HostError`]; diagnostics are delivered
//! under a [`WarningCategory`].

use std::fmt;

/// Base class name shared by the numerical and allocation errors.
pub const RUNTIME_ERROR: &str = "RuntimeError";

/// Category a diagnostic is delivered under.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WarningCategory {
    /// Diagnostic with no native source location.
    Runtime,
    /// User-facing diagnostic.
    User,
}

impl WarningCategory {
    /// Name of the warning class as the host shows it.
    pub fn name(self) -> &'static str {
        match self {
            WarningCategory::Runtime => "RuntimeWarning",
            WarningCategory::User => "UserWarning",
        }
    }
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host-visible error class.
///
/// The first eight variants correspond 1:1 to the native failure
/// categories. `Warning` is produced only when the host's filter policy turns
/// a delivered diagnostic into an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HostErrorKind {
    Index,
    Type,
    Value,
    Attribute,
    LinAlg,
    OutOfMemory,
    NotImplemented,
    /// Unrecoverable internal invariant violation.
    Fatal,
    /// A diagnostic escalated to an error by host filter policy.
    Warning(WarningCategory),
}

impl HostErrorKind {
    /// Name of the error class as the host shows it.
    pub fn name(self) -> &'static str {
        match self {
            HostErrorKind::Index => "IndexError",
            HostErrorKind::Type => "TypeError",
            HostErrorKind::Value => "ValueError",
            HostErrorKind::Attribute => "AttributeError",
            HostErrorKind::LinAlg => "LinAlgError",
            HostErrorKind::OutOfMemory => "OutOfMemoryError",
            HostErrorKind::NotImplemented => "NotImplementedError",
            HostErrorKind::Fatal => "FatalError",
            HostErrorKind::Warning(category) => category.name(),
        }
    }

    /// Host base class for the error classes the binding registers itself.
    pub fn base(self) -> Option<&'static str> {
        match self {
            HostErrorKind::LinAlg | HostErrorKind::OutOfMemory => Some(RUNTIME_ERROR),
            HostErrorKind::Warning(_) => Some("Warning"),
            HostErrorKind::Index
            | HostErrorKind::Type
            | HostErrorKind::Value
            | HostErrorKind::Attribute
            | HostErrorKind::NotImplemented
            | HostErrorKind::Fatal => None,
        }
    }

    /// Documentation attached to binding-registered error classes.
    pub fn doc(self) -> Option<&'static str> {
        match self {
            HostErrorKind::LinAlg => Some(
                "Error raised by a linear algebra function when the cause of error is a \
                 numerical inconsistency in the data, for example a matrix that is not \
                 invertible.",
            ),
            HostErrorKind::OutOfMemory => Some("Error raised when a device allocator is out of memory."),
            HostErrorKind::Fatal => Some(
                "Unrecoverable internal invariant violation in native code. The process \
                 state should not be trusted after this error.",
            ),
            _ => None,
        }
    }

    /// Can user code catch this error and carry on?
    pub fn is_recoverable(self) -> bool {
        !matches!(self, HostErrorKind::Fatal)
    }
}

impl fmt::Display for HostErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error object in host vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostError {
    kind: HostErrorKind,
    message: String,
}

impl HostError {
    /// Create a host error of `kind`.
    pub fn new(kind: HostErrorKind, message: impl Into<String>) -> Self {
        HostError {
            kind,
            message: message.into(),
        }
    }

    /// Error class.
    pub fn kind(&self) -> HostErrorKind {
        self.kind
    }

    /// Message shown after the class name.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(self.kind.name())
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for HostError {}

/// Snapshot of the host's error slot: the error plus its traceback.
///
/// Fetched before flushing diagnostics while a failure is in flight and put
/// back afterwards, so delivery never clobbers the original error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PendingError {
    error: HostError,
    traceback: Option<String>,
}

impl PendingError {
    /// Pending state holding `error` with no traceback.
    pub fn new(error: HostError) -> Self {
        PendingError {
            error,
            traceback: None,
        }
    }

    /// Attach the host traceback captured with the error.
    #[must_use]
    pub fn with_traceback(mut self, traceback: impl Into<String>) -> Self {
        self.traceback = Some(traceback.into());
        self
    }

    pub fn error(&self) -> &HostError {
        &self.error
    }

    pub fn traceback(&self) -> Option<&str> {
        self.traceback.as_deref()
    }

    /// Drop the traceback and keep the error.
    pub fn into_error(self) -> HostError {
        self.error
    }
}

/// Proof that an error has been set in the host's error slot.
///
/// Only obtainable from [`HostSession::raise`](crate::HostSession::raise), so
/// a function returning `Err(ErrorRaised)` cannot forget to tell the host why
/// it failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ErrorRaised(pub(crate) ());

impl fmt::Display for ErrorRaised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("error raised in host")
    }
}

impl std::error::Error for ErrorRaised {}

#[cfg(test)]
mod tests;
