//! Settlement Tests
//!
//! Tests for construction and the single-assignment rule:
//! - Producer settles synchronously or later
//! - First settlement wins; later attempts are reported
//! - Blocking getters return the value or the reason

use crate::*;
use std::thread;

#[test]
fn test_get_returns_fulfilled_value() {
    let promise = Promise::new(|ok, _| ok.fulfil(42));
    assert_eq!(promise.status(), Status::Fulfilled);
    assert_eq!(promise.get().unwrap(), 42);
}

#[test]
fn test_get_returns_rejection_reason() {
    let reason = Reason::msg("E");
    let given = reason.clone();
    let promise: Promise<i32> = Promise::new(move |_, err| err.reject(given));

    let err = promise.get().unwrap_err();
    assert!(err.is_rejected());
    assert!(Reason::ptr_eq(err.reason().unwrap(), &reason));
}

#[test]
fn test_settle_from_another_thread() {
    let (promise, fulfiller, _) = deferred::<String>();
    assert_eq!(promise.status(), Status::Pending);
    assert!(promise.peek().is_none());

    let handle = thread::spawn(move || fulfiller.fulfil("later".to_string()));

    assert_eq!(promise.get_timeout(WAIT).unwrap(), "later");
    handle.join().unwrap().unwrap();
}

#[test]
fn test_second_fulfil_is_reported_and_ignored() {
    let (promise, fulfiller, rejecter) = deferred::<i32>();

    fulfiller.fulfil(1).unwrap();
    let err = fulfiller.fulfil(2).unwrap_err();
    assert_eq!(err.status(), Status::Fulfilled);
    let err = rejecter.reject(Reason::msg("late")).unwrap_err();
    assert_eq!(err.status(), Status::Fulfilled);

    assert_eq!(promise.get().unwrap(), 1);
}

#[test]
fn test_second_reject_is_reported_and_ignored() {
    let (promise, fulfiller, rejecter) = deferred::<i32>();

    rejecter.reject(Reason::msg("first")).unwrap();
    assert!(rejecter.reject(Reason::msg("second")).is_err());
    assert!(fulfiller.fulfil(9).is_err());

    assert_eq!(rejection_message(&promise), "first");
}

#[test]
fn test_producer_error_rejects() {
    let promise: Promise<u32> = Promise::new(|_, _| "x".parse::<u32>().map(|_| ()));
    let err = promise.get().unwrap_err();
    assert!(err
        .reason()
        .unwrap()
        .downcast_ref::<std::num::ParseIntError>()
        .is_some());
}

#[test]
fn test_producer_panic_rejects() {
    let promise: Promise<i32> = Promise::new(|_, _| -> Result<(), Reason> {
        panic!("producer blew up")
    });
    let reason = promise.get().unwrap_err().into_reason().unwrap();
    let panic = reason.downcast_ref::<PanicError>().unwrap();
    assert_eq!(panic.message(), "producer blew up");
}

#[test]
fn test_rejection_chain_root_cause() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
    let promise: Promise<()> = reject(Reason::new(io).context("loading manifest"));

    let err = promise.get().unwrap_err();
    let reason = err.reason().unwrap();
    assert_eq!(reason.to_string(), "loading manifest");
    assert_eq!(reason.root_cause().to_string(), "disk gone");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_clones_observe_same_settlement() {
    let (promise, fulfiller, _) = deferred::<u8>();
    let clone = promise.clone();
    fulfiller.fulfil(3).unwrap();
    assert_eq!(clone.get().unwrap(), 3);
    assert_eq!(promise.peek().unwrap().value(), Some(&3));
}

#[test]
fn test_get_timeout_on_pending() {
    let (promise, _fulfiller, _) = deferred::<i32>();
    let err = promise.get_timeout(SHORT).unwrap_err();
    assert!(err.is_timeout());
    assert!(err.reason().is_none());
    assert_eq!(promise.status(), Status::Pending);
}

mod properties {
    use crate::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_get_round_trips_value(value in any::<i64>()) {
            let promise = Promise::new(move |ok, _| ok.fulfil(value));
            prop_assert_eq!(promise.get().unwrap(), value);
        }

        #[test]
        fn prop_get_round_trips_reason(message in "[a-zA-Z0-9 ]{1,24}") {
            let promise: Promise<()> = reject(Reason::msg(&message));
            let err = promise.get().unwrap_err();
            prop_assert_eq!(err.reason().unwrap().to_string(), message);
        }
    }
}
