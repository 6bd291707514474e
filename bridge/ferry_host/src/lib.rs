//! Host channel interface for the ferry native/host boundary.
//!
//! The host is the embedding runtime that calls into native code. It owns a
//! single-slot error indicator and a diagnostic (warning) channel whose
//! filter policy may escalate a warning into an error. This crate defines:
//!
//! - **Vocabulary**: [`HostError`], [`HostErrorKind`], [`WarningCategory`]
//! - **Collaborator traits**: [`Host`] and [`HostSession`]
//! - **Proof token**: [`ErrorRaised`], returned only after an error was set
//! - **In-memory host**: [`memory::MemoryHost`] for embedding and tests

mod error;
pub mod memory;
mod session;

pub use error::{
    ErrorRaised, HostError, HostErrorKind, PendingError, WarningCategory, RUNTIME_ERROR,
};
pub use session::{Host, HostSession};
