//! Native failure model.
//!
//! Native code reports failures as [`NativeFailure`] values carrying one of a
//! closed set of categories ([`FailureKind`]). Factory functions are the
//! public construction API:
//!
//! ```text
//! return Err(NativeFailure::index_error(format!("index {i} is out of bounds")));
//! ```
//!
//! At the boundary every failure is wrapped in [`Failure`], which also covers
//! errors already in host vocabulary, errors a nested call already raised,
//! and unknown payloads (panics).

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

use ferry_host::{ErrorRaised, HostError, HostErrorKind};

/// Category of a native failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Index or bounds violation.
    Index,
    /// Type mismatch.
    Type,
    /// Invalid value or argument.
    Value,
    /// Missing attribute.
    Attribute,
    /// Numerical or linear-algebra failure.
    LinAlg,
    /// Allocation failure.
    OutOfMemory,
    NotImplemented,
    /// Internal invariant violation; never reclassified.
    Fatal,
}

impl FailureKind {
    pub const ALL: [FailureKind; 8] = [
        FailureKind::Index,
        FailureKind::Type,
        FailureKind::Value,
        FailureKind::Attribute,
        FailureKind::LinAlg,
        FailureKind::OutOfMemory,
        FailureKind::NotImplemented,
        FailureKind::Fatal,
    ];

    /// The host error class this category is raised as.
    pub fn host_kind(self) -> HostErrorKind {
        match self {
            FailureKind::Index => HostErrorKind::Index,
            FailureKind::Type => HostErrorKind::Type,
            FailureKind::Value => HostErrorKind::Value,
            FailureKind::Attribute => HostErrorKind::Attribute,
            FailureKind::LinAlg => HostErrorKind::LinAlg,
            FailureKind::OutOfMemory => HostErrorKind::OutOfMemory,
            FailureKind::NotImplemented => HostErrorKind::NotImplemented,
            FailureKind::Fatal => HostErrorKind::Fatal,
        }
    }

    /// Short lowercase name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            FailureKind::Index => "index",
            FailureKind::Type => "type",
            FailureKind::Value => "value",
            FailureKind::Attribute => "attribute",
            FailureKind::LinAlg => "linalg",
            FailureKind::OutOfMemory => "out of memory",
            FailureKind::NotImplemented => "not implemented",
            FailureKind::Fatal => "fatal",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A failure raised by native code.
#[derive(Debug)]
pub struct NativeFailure {
    kind: FailureKind,
    message: String,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl NativeFailure {
    /// Failure of `kind` with `message`.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        NativeFailure {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Index or bounds violation.
    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Index, message)
    }

    /// Type mismatch.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Type, message)
    }

    /// Invalid value or argument.
    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Value, message)
    }

    /// Missing attribute.
    pub fn attribute_error(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Attribute, message)
    }

    /// Numerical failure in a linear algebra routine.
    pub fn lin_alg_error(message: impl Into<String>) -> Self {
        Self::new(FailureKind::LinAlg, message)
    }

    /// Allocation failure.
    pub fn out_of_memory(message: impl Into<String>) -> Self {
        Self::new(FailureKind::OutOfMemory, message)
    }

    /// Operation without an implementation for these inputs.
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotImplemented, message)
    }

    /// Internal invariant violation.
    #[cold]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Fatal, message)
    }

    /// Attach the error that caused this failure.
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Category of this failure.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn into_parts(self) -> (FailureKind, String) {
        (self.kind, self.message)
    }
}

impl fmt::Display for NativeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure: {}", self.kind, self.message)
    }
}

impl StdError for NativeFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

/// An in-flight failure about to cross into the host.
#[derive(Debug)]
pub enum Failure {
    /// Categorized native failure.
    Native(NativeFailure),
    /// Error already expressed in host vocabulary; passed through untouched.
    Host(HostError),
    /// Error already raised in the host by a nested call; the host's error
    /// slot is left exactly as it is.
    Raised(ErrorRaised),
    /// Unknown payload, typically caught from a panic.
    Foreign(Box<dyn Any + Send>),
}

impl From<NativeFailure> for Failure {
    fn from(failure: NativeFailure) -> Self {
        Failure::Native(failure)
    }
}

impl From<ErrorRaised> for Failure {
    fn from(raised: ErrorRaised) -> Self {
        Failure::Raised(raised)
    }
}

impl From<HostError> for Failure {
    fn from(error: HostError) -> Self {
        Failure::Host(error)
    }
}
