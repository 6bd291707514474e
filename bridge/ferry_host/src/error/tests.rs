use super::*;
use pretty_assertions::assert_eq;

#[test]
fn host_error_display_is_kind_prefixed() {
    let err = HostError::new(HostErrorKind::Index, "bad index");
    assert_eq!(err.to_string(), "IndexError: bad index");
}

#[test]
fn host_error_display_without_message() {
    let err = HostError::new(HostErrorKind::Fatal, "");
    assert_eq!(err.to_string(), "FatalError");
}

#[test]
fn escalated_warning_uses_category_name() {
    let err = HostError::new(HostErrorKind::Warning(WarningCategory::User), "careful");
    assert_eq!(err.to_string(), "UserWarning: careful");
    assert_eq!(err.kind().base(), Some("Warning"));
}

#[test]
fn registered_errors_derive_from_runtime_error() {
    assert_eq!(HostErrorKind::LinAlg.base(), Some(RUNTIME_ERROR));
    assert_eq!(HostErrorKind::OutOfMemory.base(), Some(RUNTIME_ERROR));
    assert_eq!(HostErrorKind::Fatal.base(), None);
    assert_eq!(HostErrorKind::Index.base(), None);
}

#[test]
fn registered_errors_carry_docs() {
    assert!(HostErrorKind::LinAlg.doc().is_some());
    assert!(HostErrorKind::OutOfMemory.doc().is_some());
    assert!(HostErrorKind::Fatal.doc().is_some());
    assert!(HostErrorKind::Value.doc().is_none());
}

#[test]
fn only_fatal_is_unrecoverable() {
    let kinds = [
        HostErrorKind::Index,
        HostErrorKind::Type,
        HostErrorKind::Value,
        HostErrorKind::Attribute,
        HostErrorKind::LinAlg,
        HostErrorKind::OutOfMemory,
        HostErrorKind::NotImplemented,
        HostErrorKind::Warning(WarningCategory::Runtime),
    ];
    for kind in kinds {
        assert!(kind.is_recoverable(), "{kind} should be recoverable");
    }
    assert!(!HostErrorKind::Fatal.is_recoverable());
}

#[test]
fn pending_error_keeps_traceback() {
    let pending = PendingError::new(HostError::new(HostErrorKind::Value, "bad"))
        .with_traceback("frame 0\nframe 1");
    assert_eq!(pending.traceback(), Some("frame 0\nframe 1"));
    assert_eq!(pending.error().message(), "bad");
    assert_eq!(pending.into_error().kind(), HostErrorKind::Value);
}

#[test]
fn error_raised_display() {
    assert_eq!(ErrorRaised(()).to_string(), "error raised in host");
}
