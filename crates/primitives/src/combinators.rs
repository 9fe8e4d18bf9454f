//! Combinators: wrap values and compose fixed sequences of promises
//!
//! | Combinator | Fulfils with | Rejects with | Empty input |
//! |------------|--------------|--------------|-------------|
//! | `all` | every value, input order | first rejection (fail-fast) | fulfils `[]` |
//! | `all_settled` | every outcome, input order | never | fulfils `[]` |
//! | `race` | first settlement | first settlement | stays pending |
//! | `any` | first fulfilment | `AggregateError`, input order | rejects |
//!
//! ## Monitors
//!
//! A non-empty combinator dispatches one monitor unit per member, on that
//! member's dispatcher. Each monitor blocks on its member and records the
//! outcome into a per-combinator slot vector indexed by input position, so
//! results come out in input order regardless of completion order. The
//! combinator's own promise is settled through the settle-if-pending path:
//! monitors that lose the race are expected and silently dropped.
//!
//! Monitors are never cancelled. After a short-circuit (`all` rejecting,
//! `race` or `any` settling), the remaining monitors keep waiting on their
//! members and exit once those settle.

use crate::promise::Promise;
use parking_lot::Mutex;
use pledge_concurrency::default_dispatcher;
use pledge_core::{AggregateError, Outcome, Reason};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Resolve / Reject
// ============================================================================

/// Conversion into a promise for [`resolve_with`]
pub trait IntoPromise<T> {
    /// Convert into a promise
    fn into_promise(self) -> Promise<T>;
}

/// A promise is returned unchanged
impl<T> IntoPromise<T> for Promise<T>
where
    T: Clone + Send + 'static,
{
    fn into_promise(self) -> Promise<T> {
        self
    }
}

/// `Ok` becomes a fulfilled promise, `Err` a rejected one
impl<T, E> IntoPromise<T> for Result<T, E>
where
    T: Clone + Send + 'static,
    E: Into<Reason>,
{
    fn into_promise(self) -> Promise<T> {
        Promise::settled_in(default_dispatcher(), self.into())
    }
}

impl<T> IntoPromise<T> for Outcome<T>
where
    T: Clone + Send + 'static,
{
    fn into_promise(self) -> Promise<T> {
        Promise::settled_in(default_dispatcher(), self)
    }
}

/// A promise already fulfilled with `value`
pub fn resolve<T>(value: T) -> Promise<T>
where
    T: Clone + Send + 'static,
{
    Promise::fulfilled(value)
}

/// Resolve something that may already be a promise or a failure
///
/// A [`Promise`] is returned as-is, without wrapping. A `Result` or
/// [`Outcome`] becomes a promise already fulfilled or rejected accordingly.
pub fn resolve_with<T, P>(value: P) -> Promise<T>
where
    P: IntoPromise<T>,
{
    value.into_promise()
}

/// A new promise already rejected with `reason`
///
/// Always creates a new promise; the reason is stored as given.
pub fn reject<T>(reason: impl Into<Reason>) -> Promise<T>
where
    T: Clone + Send + 'static,
{
    Promise::rejected(reason)
}

// ============================================================================
// Aggregates
// ============================================================================

/// Fulfil with every value in input order, or reject with the first
/// rejection
pub fn all<T>(promises: &[Promise<T>]) -> Promise<Vec<T>>
where
    T: Clone + Send + 'static,
{
    let Some(result) = aggregate_result(promises) else {
        return Promise::settled_in(default_dispatcher(), Outcome::Fulfilled(Vec::new()));
    };
    tracing::trace!(members = promises.len(), "all started");

    let slots = Arc::new(Mutex::new(vec![None; promises.len()]));
    let remaining = Arc::new(AtomicUsize::new(promises.len()));

    for (index, member) in promises.iter().enumerate() {
        let slots = Arc::clone(&slots);
        let remaining = Arc::clone(&remaining);
        let target = result.clone();
        let source = member.clone();

        spawn_monitor(member, "all", &result, move || match source.wait() {
            Outcome::Fulfilled(value) => {
                slots.lock()[index] = Some(value);
                if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    let values = std::mem::take(&mut *slots.lock());
                    target.offer(Outcome::Fulfilled(values.into_iter().flatten().collect()));
                }
            }
            Outcome::Rejected(reason) => {
                target.offer(Outcome::Rejected(reason));
            }
        });
    }

    result
}

/// Fulfil with every member's outcome in input order once all have settled
///
/// Never rejects on account of its members.
pub fn all_settled<T>(promises: &[Promise<T>]) -> Promise<Vec<Outcome<T>>>
where
    T: Clone + Send + 'static,
{
    let Some(result) = aggregate_result(promises) else {
        return Promise::settled_in(default_dispatcher(), Outcome::Fulfilled(Vec::new()));
    };
    tracing::trace!(members = promises.len(), "all_settled started");

    let slots = Arc::new(Mutex::new(vec![None; promises.len()]));
    let remaining = Arc::new(AtomicUsize::new(promises.len()));

    for (index, member) in promises.iter().enumerate() {
        let slots = Arc::clone(&slots);
        let remaining = Arc::clone(&remaining);
        let target = result.clone();
        let source = member.clone();

        spawn_monitor(member, "all-settled", &result, move || {
            let outcome = source.wait();
            slots.lock()[index] = Some(outcome);
            if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                let outcomes = std::mem::take(&mut *slots.lock());
                target.offer(Outcome::Fulfilled(outcomes.into_iter().flatten().collect()));
            }
        });
    }

    result
}

/// Settle like whichever member settles first
///
/// With no members the result stays pending forever.
pub fn race<T>(promises: &[Promise<T>]) -> Promise<T>
where
    T: Clone + Send + 'static,
{
    let Some(result) = aggregate_result(promises) else {
        return Promise::pending_in(default_dispatcher());
    };
    tracing::trace!(members = promises.len(), "race started");

    for member in promises {
        let target = result.clone();
        let source = member.clone();

        spawn_monitor(member, "race", &result, move || {
            target.offer(source.wait());
        });
    }

    result
}

/// Fulfil with the first member to fulfil
///
/// Rejections are ignored until every member has rejected; the result then
/// rejects with an [`AggregateError`] holding every reason in input order.
/// With no members the result rejects immediately with an empty aggregate.
pub fn any<T>(promises: &[Promise<T>]) -> Promise<T>
where
    T: Clone + Send + 'static,
{
    let Some(result) = aggregate_result(promises) else {
        return Promise::settled_in(
            default_dispatcher(),
            Outcome::Rejected(AggregateError::new(Vec::new()).into()),
        );
    };
    tracing::trace!(members = promises.len(), "any started");

    let reasons: Arc<Mutex<Vec<Option<Reason>>>> =
        Arc::new(Mutex::new(vec![None; promises.len()]));
    let remaining = Arc::new(AtomicUsize::new(promises.len()));

    for (index, member) in promises.iter().enumerate() {
        let reasons = Arc::clone(&reasons);
        let remaining = Arc::clone(&remaining);
        let target = result.clone();
        let source = member.clone();

        spawn_monitor(member, "any", &result, move || match source.wait() {
            Outcome::Fulfilled(value) => {
                target.offer(Outcome::Fulfilled(value));
            }
            Outcome::Rejected(reason) => {
                reasons.lock()[index] = Some(reason);
                if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    let collected = std::mem::take(&mut *reasons.lock());
                    let aggregate = AggregateError::new(collected.into_iter().flatten().collect());
                    target.offer(Outcome::Rejected(aggregate.into()));
                }
            }
        });
    }

    result
}

/// Pending result promise on the first member's dispatcher, or `None` for an
/// empty input
fn aggregate_result<T, R>(promises: &[Promise<T>]) -> Option<Promise<R>>
where
    T: Clone + Send + 'static,
    R: Clone + Send + 'static,
{
    promises
        .first()
        .map(|first| Promise::pending_in(Arc::clone(first.dispatcher())))
}

/// Dispatch a monitor for `member`; if that fails, reject `result`
fn spawn_monitor<T, R, F>(member: &Promise<T>, label: &'static str, result: &Promise<R>, monitor: F)
where
    T: Clone + Send + 'static,
    R: Clone + Send + 'static,
    F: FnOnce() + Send + 'static,
{
    if let Err(err) = member.dispatcher().dispatch(label, Box::new(monitor)) {
        result.offer(Outcome::Rejected(err.into()));
    }
}
