#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use super::*;
use crate::{handler_depth, raise_diagnostic, SourceLocation};
use ferry_host::memory::{FilterAction, MemoryHost, WarningFilter};
use ferry_host::{HostError, HostErrorKind, PendingError, WarningCategory};
use pretty_assertions::assert_eq;

fn warn(message: &str) {
    raise_diagnostic(None, message, false);
}

#[test]
fn empty_collector_leaves_host_untouched() {
    let host = MemoryHost::new();
    let canon = Canonicalizer::default();

    let collector = WarningCollector::install(&host, &canon);
    assert!(collector.is_active());
    assert_eq!(handler_depth(), 1);
    assert_eq!(collector.finish(), Ok(()));

    assert_eq!(handler_depth(), 0);
    assert!(host.is_untouched());
}

#[test]
fn diagnostics_are_buffered_until_finish() {
    let host = MemoryHost::new();
    let canon = Canonicalizer::default();

    let collector = WarningCollector::install(&host, &canon);
    warn("w1");
    warn("w2");
    warn("w3");
    assert_eq!(collector.buffered(), 3);
    assert!(host.delivered().is_empty());
    assert!(!host.is_locked());

    collector.finish().unwrap();
    assert_eq!(
        host.delivered_messages(),
        vec!["w1".to_string(), "w2".to_string(), "w3".to_string()]
    );
    assert!(!host.is_locked());
}

#[test]
fn drop_flushes_like_finish() {
    let host = MemoryHost::new();
    let canon = Canonicalizer::default();
    {
        let _collector = WarningCollector::install(&host, &canon);
        warn("dropped scope");
    }
    assert_eq!(host.delivered_messages(), vec!["dropped scope".to_string()]);
    assert_eq!(handler_depth(), 0);
}

#[test]
fn delivery_styles_follow_the_record() {
    let host = MemoryHost::new();
    let canon = Canonicalizer::default();

    let collector = WarningCollector::install(&host, &canon);
    raise_diagnostic(None, "plain CPUFloatType", false);
    raise_diagnostic(Some(SourceLocation::new("op.cpp", 9)), "verbatim", true);
    raise_diagnostic(Some(SourceLocation::new("op.cpp", 10)), "located", false);
    collector.finish().unwrap();

    let delivered = host.delivered();
    assert_eq!(delivered[0].category, WarningCategory::Runtime);
    assert_eq!(delivered[0].message, "plain torch.FloatTensor");
    assert_eq!(delivered[1].category, WarningCategory::User);
    assert_eq!(delivered[1].message, "verbatim");
    assert_eq!(delivered[2].category, WarningCategory::User);
    assert_eq!(
        delivered[2].message,
        "located (Triggered internally at op.cpp:10.)"
    );
}

#[test]
fn escalated_delivery_without_pending_error_becomes_the_error() {
    let host = MemoryHost::new();
    host.add_filter(WarningFilter::new(FilterAction::Error).message_contains("bad"));
    let canon = Canonicalizer::default();

    let collector = WarningCollector::install(&host, &canon);
    warn("ok");
    warn("bad");
    warn("never delivered");
    assert!(collector.finish().is_err());

    assert_eq!(host.delivered_messages(), vec!["ok".to_string()]);
    assert_eq!(
        host.error(),
        Some(HostError::new(
            HostErrorKind::Warning(WarningCategory::Runtime),
            "bad"
        ))
    );
}

#[test]
fn pending_error_survives_the_flush() {
    let host = MemoryHost::new();
    let canon = Canonicalizer::default();
    let original = PendingError::new(HostError::new(HostErrorKind::Index, "bad index"))
        .with_traceback("frame");

    let mut collector = WarningCollector::install(&host, &canon);
    warn("w1");
    collector.set_in_failure();
    host.session().restore_pending(Some(original.clone()));
    collector.finish().unwrap();

    assert_eq!(host.delivered_messages(), vec!["w1".to_string()]);
    assert_eq!(host.pending(), Some(original));
}

#[test]
fn escalated_delivery_with_pending_error_is_reported() {
    let host = MemoryHost::new();
    host.add_filter(WarningFilter::new(FilterAction::Error).message_contains("escalate"));
    let canon = Canonicalizer::default();

    let mut collector = WarningCollector::install(&host, &canon);
    warn("first");
    warn("escalate me");
    warn("skipped");
    collector.set_in_failure();
    host.session()
        .set_error(HostError::new(HostErrorKind::Value, "original"));
    assert_eq!(collector.finish(), Ok(()));

    assert_eq!(host.delivered_messages(), vec!["first".to_string()]);
    assert_eq!(
        host.reports(),
        vec![HostError::new(
            HostErrorKind::Warning(WarningCategory::Runtime),
            "escalate me"
        )]
    );
    assert_eq!(
        host.error(),
        Some(HostError::new(HostErrorKind::Value, "original"))
    );
}

#[test]
fn failure_flag_without_pending_error_keeps_slot_empty() {
    let host = MemoryHost::new();
    host.add_filter(WarningFilter::new(FilterAction::Error));
    let canon = Canonicalizer::default();

    let mut collector = WarningCollector::install(&host, &canon);
    warn("escalated");
    collector.set_in_failure();
    assert_eq!(collector.finish(), Ok(()));

    assert_eq!(host.reports().len(), 1);
    assert_eq!(host.error(), None);
}

#[test]
fn nested_collectors_flush_at_their_own_exit() {
    let host = MemoryHost::new();
    let canon = Canonicalizer::default();

    let outer = WarningCollector::install(&host, &canon);
    warn("outer before");
    {
        let inner = WarningCollector::install(&host, &canon);
        assert_eq!(handler_depth(), 2);
        warn("inner");
        inner.finish().unwrap();
    }
    assert_eq!(host.delivered_messages(), vec!["inner".to_string()]);
    assert_eq!(handler_depth(), 1);

    warn("outer after");
    assert_eq!(outer.buffered(), 2);
    outer.finish().unwrap();

    assert_eq!(
        host.delivered_messages(),
        vec![
            "inner".to_string(),
            "outer before".to_string(),
            "outer after".to_string()
        ]
    );
}

#[test]
fn collectors_dropped_out_of_order_keep_the_inner_one_active() {
    let host = MemoryHost::new();
    let canon = Canonicalizer::default();

    let outer = WarningCollector::install(&host, &canon);
    warn("for outer");
    let inner = WarningCollector::install(&host, &canon);
    warn("for inner");

    drop(outer);
    assert_eq!(host.delivered_messages(), vec!["for outer".to_string()]);
    assert_eq!(handler_depth(), 1);
    assert!(inner.is_active());

    warn("still for inner");
    assert_eq!(inner.buffered(), 2);
    drop(inner);

    assert_eq!(handler_depth(), 0);
    assert_eq!(
        host.delivered_messages(),
        vec![
            "for outer".to_string(),
            "for inner".to_string(),
            "still for inner".to_string()
        ]
    );
}

#[test]
fn out_of_order_drop_during_unwind_does_not_abort() {
    let host = MemoryHost::new();
    let canon = Canonicalizer::default();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let outer = WarningCollector::install(&host, &canon);
        let inner = WarningCollector::install(&host, &canon);
        warn("unwinding");
        // Tuple fields drop first to last, so `outer` goes before `inner`.
        let _collectors = (outer, inner);
        panic!("native failure");
    }));

    assert!(result.is_err());
    assert_eq!(handler_depth(), 0);
    assert_eq!(host.delivered_messages(), vec!["unwinding".to_string()]);
}

#[test]
fn unwinding_counts_as_failure_in_flight() {
    let host = MemoryHost::new();
    host.add_filter(WarningFilter::new(FilterAction::Error));
    let canon = Canonicalizer::default();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _collector = WarningCollector::install(&host, &canon);
        warn("during unwind");
        panic!("native code blew up");
    }));

    assert!(result.is_err());
    assert_eq!(handler_depth(), 0);
    assert_eq!(host.reports().len(), 1);
    assert_eq!(host.error(), None);
}
