//! Concurrency Tests
//!
//! Tests for thread safety:
//! - fulfil / reject racing on one promise
//! - Many waiters released by one settlement
//! - Many continuations and combinator members in flight

use crate::*;
use std::sync::{Arc, Barrier};
use std::thread;

/// Test that concurrent fulfil and reject admit exactly one winner
#[test]
fn test_fulfil_reject_race_has_one_winner() {
    const ROUNDS: usize = 50;

    for _ in 0..ROUNDS {
        let (promise, fulfiller, rejecter) = deferred::<i32>();
        let barrier = Arc::new(Barrier::new(2));

        let b1 = Arc::clone(&barrier);
        let fulfilling = thread::spawn(move || {
            b1.wait();
            fulfiller.fulfil(1)
        });
        let b2 = Arc::clone(&barrier);
        let rejecting = thread::spawn(move || {
            b2.wait();
            rejecter.reject(Reason::msg("E"))
        });

        let fulfil_result = fulfilling.join().unwrap();
        let reject_result = rejecting.join().unwrap();
        assert_ne!(fulfil_result.is_ok(), reject_result.is_ok());

        if fulfil_result.is_ok() {
            assert_eq!(reject_result.unwrap_err().status(), Status::Fulfilled);
            assert_eq!(promise.get().unwrap(), 1);
        } else {
            assert_eq!(fulfil_result.unwrap_err().status(), Status::Rejected);
            assert_eq!(rejection_message(&promise), "E");
        }
    }
}

/// Test that many fulfillers contend and only one value sticks
#[test]
fn test_concurrent_fulfillers_single_winner() {
    const NUM_THREADS: usize = 10;

    let (promise, fulfiller, _) = deferred::<usize>();
    let barrier = Arc::new(Barrier::new(NUM_THREADS));

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|i| {
            let fulfiller = fulfiller.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                fulfiller.fulfil(i).is_ok()
            })
        })
        .collect();

    let winners: Vec<usize> = handles
        .into_iter()
        .enumerate()
        .filter_map(|(i, h)| h.join().unwrap().then_some(i))
        .collect();

    assert_eq!(winners.len(), 1);
    assert_eq!(promise.get().unwrap(), winners[0]);
}

/// Test that every blocked getter is released by one settlement
#[test]
fn test_waiters_released_together() {
    const NUM_WAITERS: usize = 10;

    let (promise, fulfiller, _) = deferred::<String>();
    let barrier = Arc::new(Barrier::new(NUM_WAITERS + 1));

    let handles: Vec<_> = (0..NUM_WAITERS)
        .map(|_| {
            let promise = promise.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                promise.get_timeout(WAIT)
            })
        })
        .collect();

    barrier.wait();
    fulfiller.fulfil("done".to_string()).unwrap();

    for h in handles {
        assert_eq!(h.join().unwrap().unwrap(), "done");
    }
}

/// Test continuations registered from many threads at once
#[test]
fn test_concurrent_then_registration() {
    const NUM_THREADS: usize = 8;

    let (source, fulfiller, _) = deferred::<i32>();
    let barrier = Arc::new(Barrier::new(NUM_THREADS));

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|i| {
            let source = source.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                source.then(move |v| v * i as i32)
            })
        })
        .collect();

    let derived: Vec<Promise<i32>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    fulfiller.fulfil(3).unwrap();

    for (i, promise) in derived.iter().enumerate() {
        assert_eq!(promise.get_timeout(WAIT).unwrap(), 3 * i as i32);
    }
}

/// Test all() over members settled from separate threads
#[test]
fn test_all_with_members_settled_concurrently() {
    const NUM_MEMBERS: usize = 16;

    let (promises, fulfillers): (Vec<_>, Vec<_>) = (0..NUM_MEMBERS)
        .map(|_| {
            let (promise, fulfiller, _) = deferred::<usize>();
            (promise, fulfiller)
        })
        .unzip();

    let result = pledge::all(&promises);
    let barrier = Arc::new(Barrier::new(NUM_MEMBERS));

    let handles: Vec<_> = fulfillers
        .into_iter()
        .enumerate()
        .map(|(i, fulfiller)| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                fulfiller.fulfil(i).unwrap();
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let expected: Vec<usize> = (0..NUM_MEMBERS).collect();
    assert_eq!(result.get_timeout(WAIT).unwrap(), expected);
}

/// Test that a promise can be shared across threads for reading
#[test]
fn test_concurrent_peek_after_settlement() {
    const NUM_READERS: usize = 10;
    const READS_PER_THREAD: usize = 100;

    let promise = resolve(42u64);
    let barrier = Arc::new(Barrier::new(NUM_READERS));

    let handles: Vec<_> = (0..NUM_READERS)
        .map(|_| {
            let promise = promise.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..READS_PER_THREAD {
                    assert_eq!(promise.peek().unwrap().into_value(), Some(42));
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
