#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn fresh_host_is_untouched() {
    let host = MemoryHost::new();
    assert!(host.is_untouched());
    assert!(!host.is_locked());
}

#[test]
fn session_holds_the_host_lock() {
    let host = MemoryHost::new();
    {
        let _session = host.session();
        assert!(host.is_locked());
    }
    assert!(!host.is_locked());
}

#[test]
fn default_delivery_is_recorded_in_order() {
    let host = MemoryHost::new();
    {
        let mut session = host.session();
        session.deliver(WarningCategory::User, "first").unwrap();
        session.deliver(WarningCategory::Runtime, "second").unwrap();
    }
    assert_eq!(
        host.delivered(),
        vec![
            DeliveredWarning {
                category: WarningCategory::User,
                message: "first".to_string(),
            },
            DeliveredWarning {
                category: WarningCategory::Runtime,
                message: "second".to_string(),
            },
        ]
    );
}

#[test]
fn error_filter_escalates_matching_diagnostics() {
    let host = MemoryHost::new();
    host.add_filter(WarningFilter::new(FilterAction::Error).message_contains("deprecated"));

    let mut session = host.session();
    let err = session
        .deliver(WarningCategory::User, "foo is deprecated")
        .unwrap_err();
    assert_eq!(err.kind(), HostErrorKind::Warning(WarningCategory::User));
    assert_eq!(err.message(), "foo is deprecated");
    assert!(session.deliver(WarningCategory::User, "fine").is_ok());
    assert!(!session.has_pending());
}

#[test]
fn ignore_filter_drops_diagnostics() {
    let host = MemoryHost::new();
    host.add_filter(WarningFilter::new(FilterAction::Ignore).category(WarningCategory::Runtime));
    {
        let mut session = host.session();
        session.deliver(WarningCategory::Runtime, "dropped").unwrap();
        session.deliver(WarningCategory::User, "kept").unwrap();
    }
    assert_eq!(host.delivered_messages(), vec!["kept".to_string()]);
}

#[test]
fn newest_filter_wins() {
    let host = MemoryHost::new();
    host.add_filter(WarningFilter::new(FilterAction::Error));
    host.add_filter(WarningFilter::new(FilterAction::Ignore).message_contains("quiet"));

    let mut session = host.session();
    assert!(session.deliver(WarningCategory::User, "quiet please").is_ok());
    assert!(session.deliver(WarningCategory::User, "loud").is_err());
    drop(session);

    host.clear_filters();
    assert!(host.session().deliver(WarningCategory::User, "loud").is_ok());
}

#[test]
fn fetch_and_restore_round_trip_the_error_slot() {
    let host = MemoryHost::new();
    let original = PendingError::new(HostError::new(HostErrorKind::Type, "wrong type"))
        .with_traceback("tb");

    let mut session = host.session();
    session.restore_pending(Some(original.clone()));
    assert!(session.has_pending());

    let fetched = session.fetch_pending();
    assert_eq!(fetched, Some(original.clone()));
    assert!(!session.has_pending());

    session.restore_pending(fetched);
    drop(session);
    assert_eq!(host.pending(), Some(original));
}

#[test]
fn restoring_nothing_clears_the_slot() {
    let host = MemoryHost::new();
    let mut session = host.session();
    session.set_error(HostError::new(HostErrorKind::Value, "stale"));
    session.restore_pending(None);
    assert!(!session.has_pending());
}

#[test]
fn raise_sets_the_error() {
    let host = MemoryHost::new();
    let _raised = host
        .session()
        .raise(HostError::new(HostErrorKind::Attribute, "no attribute 'x'"));
    assert_eq!(
        host.take_error(),
        Some(HostError::new(HostErrorKind::Attribute, "no attribute 'x'"))
    );
    assert_eq!(host.error(), None);
}

#[test]
fn report_does_not_touch_the_error_slot() {
    let host = MemoryHost::new();
    let mut session = host.session();
    session.set_error(HostError::new(HostErrorKind::Index, "original"));
    session.report(HostError::new(
        HostErrorKind::Warning(WarningCategory::User),
        "side note",
    ));
    drop(session);

    assert_eq!(host.error().map(|e| e.message().to_string()), Some("original".to_string()));
    assert_eq!(host.reports().len(), 1);
}
