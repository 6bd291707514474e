//! Buffered diagnostic records.

use std::borrow::Cow;
use std::fmt;

use ferry_canon::Canonicalizer;
use ferry_host::WarningCategory;

/// Native source position a diagnostic was raised from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    file: Cow<'static, str>,
    line: u32,
}

impl SourceLocation {
    /// Location at `file`:`line`.
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        SourceLocation {
            file: file.into(),
            line,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One diagnostic raised by native code.
///
/// `verbatim` records whether the host should attribute the diagnostic itself
/// (`true`) or whether the native location belongs in the message text
/// (`false`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DiagnosticRecord {
    location: Option<SourceLocation>,
    message: String,
    verbatim: bool,
}

impl DiagnosticRecord {
    /// Create a record; normally done by [`raise_diagnostic`](crate::raise_diagnostic).
    pub fn new(location: Option<SourceLocation>, message: impl Into<String>, verbatim: bool) -> Self {
        DiagnosticRecord {
            location,
            message: message.into(),
            verbatim,
        }
    }

    /// Where the diagnostic was raised, if known.
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_verbatim(&self) -> bool {
        self.verbatim
    }

    /// Category and final text for host delivery.
    ///
    /// The message is canonicalized first. Without a location the record goes
    /// out as a runtime warning. A verbatim record goes out unchanged as a user
    /// warning; otherwise the native location is appended, since the host
    /// cannot attribute it.
    pub fn into_delivery(self, canonicalizer: &Canonicalizer) -> (WarningCategory, String) {
        let DiagnosticRecord {
            location,
            mut message,
            verbatim,
        } = self;
        canonicalizer.canonicalize_in_place(&mut message);

        match location {
            None => (WarningCategory::Runtime, message),
            Some(_) if verbatim => (WarningCategory::User, message),
            Some(location) => (
                WarningCategory::User,
                format!("{message} (Triggered internally at {location}.)"),
            ),
        }
    }
}
