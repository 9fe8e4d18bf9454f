//! Edge Case Tests
//!
//! Tests for boundaries and failure plumbing:
//! - Timeouts that are zero or effectively unbounded
//! - Dispatchers that refuse work
//! - Error display and cause chains
//! - Non-string panic payloads

use crate::*;
use pledge::{DispatchError, Job};
use std::sync::Arc;
use std::time::Duration;

/// Dispatcher that never starts a unit
struct RefusingDispatcher;

impl Dispatcher for RefusingDispatcher {
    fn dispatch(&self, label: &'static str, _job: Job) -> Result<(), DispatchError> {
        Err(DispatchError::Rejected {
            label,
            message: "closed".to_string(),
        })
    }
}

fn refusing() -> Arc<dyn Dispatcher> {
    Arc::new(RefusingDispatcher)
}

#[test]
fn test_zero_timeout_on_settled_promise() {
    let promise = resolve(1);
    assert_eq!(promise.get_timeout(Duration::ZERO).unwrap(), 1);
}

#[test]
fn test_zero_timeout_on_pending_promise() {
    let (promise, _fulfiller, _) = deferred::<i32>();
    let err = promise.get_timeout(Duration::ZERO).unwrap_err();
    assert!(err.is_timeout());
}

#[test]
fn test_max_timeout_behaves_like_get() {
    let promise = resolve("x");
    assert_eq!(promise.get_timeout(Duration::MAX).unwrap(), "x");
}

#[test]
fn test_refused_dispatch_rejects_continuation() {
    let promise = Promise::new_in(refusing(), |ok, _| ok.fulfil(1));
    let derived = promise.then(|v| v + 1);

    let reason = derived.get_timeout(WAIT).unwrap_err().into_reason().unwrap();
    let err = reason.downcast_ref::<DispatchError>().unwrap();
    assert!(matches!(err, DispatchError::Rejected { label: "then", .. }));
    // Source is unaffected
    assert_eq!(promise.get().unwrap(), 1);
}

#[test]
fn test_refused_dispatch_rejects_combinator() {
    let member = Promise::new_in(refusing(), |ok, _| ok.fulfil(1));
    let result = pledge::all_settled(&[member]);

    let reason = result.get_timeout(WAIT).unwrap_err().into_reason().unwrap();
    assert!(reason.downcast_ref::<DispatchError>().is_some());
}

#[test]
fn test_settle_error_display() {
    let (_, fulfiller, _) = deferred::<i32>();
    fulfiller.fulfil(1).unwrap();
    let err = fulfiller.fulfil(2).unwrap_err();
    assert!(err.to_string().contains("fulfilled"), "{}", err);
}

#[test]
fn test_timeout_error_display() {
    let (promise, _fulfiller, _) = deferred::<i32>();
    let err = promise.get_timeout(Duration::from_millis(1)).unwrap_err();
    assert!(err.to_string().contains("timed out"), "{}", err);
}

#[test]
fn test_non_string_panic_payload() {
    let derived = resolve(1).then(|_| -> i32 { std::panic::panic_any(17u32) });
    let reason = derived.get_timeout(WAIT).unwrap_err().into_reason().unwrap();
    assert_eq!(
        reason.downcast_ref::<PanicError>().unwrap().message(),
        "non-string panic payload"
    );
}

#[test]
fn test_context_on_rejection_in_chain() {
    let promise: Promise<i32> = reject(Reason::msg("socket closed"));
    let wrapped = promise.catch_error(|_| {}).try_then(|v| Ok::<_, Reason>(v));
    let reason = wrapped
        .get_timeout(WAIT)
        .unwrap_err()
        .into_reason()
        .unwrap()
        .context("fetching profile");

    let chain: Vec<String> = reason.chain().map(|e| e.to_string()).collect();
    assert_eq!(chain, vec!["fetching profile", "socket closed"]);
}

#[test]
fn test_unit_and_large_values() {
    assert!(resolve(()).get().is_ok());

    let big = vec![7u8; 1 << 20];
    let len = resolve(big).then(|v| v.len());
    assert_eq!(len.get_timeout(WAIT).unwrap(), 1 << 20);
}

/// Payload without a `Debug` impl
#[derive(Clone)]
struct Opaque(u32);

#[test]
fn test_values_need_no_debug_impl() {
    let failed: Promise<Opaque> = reject(Reason::msg("opaque failure"));
    assert_eq!(rejection_message(&failed), "opaque failure");

    let ok = resolve(Opaque(9)).then(|o| o.0 + 1);
    assert_eq!(ok.get_timeout(WAIT).unwrap(), 10);
}
