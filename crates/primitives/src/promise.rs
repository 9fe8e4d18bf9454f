//! Promise: a deferred result settled exactly once
//!
//! ## Design
//!
//! A [`Promise`] is a handle to one [`SettlementCell`]. Cloning the handle
//! does not create a new promise: every clone, every continuation and every
//! blocking getter observes the same cell.
//!
//! ## Continuations
//!
//! `then`, `try_then`, `then_or_else`, `catch_error` and `and_finally` never
//! block and never touch the source promise. Each call:
//!
//! ```text
//! 1. Create a new pending promise (the derived promise)
//! 2. Dispatch one unit of execution that
//!    a. blocks until the source settles
//!    b. runs the user callback against the source outcome
//!    c. settles the derived promise
//! 3. Return the derived promise immediately
//! ```
//!
//! A panic inside a callback is caught by the unit and rejects the derived
//! promise with a [`PanicError`]. A rejected source with no handler is
//! carried forward unchanged, so a chain like
//! `p.then(f).then(g).and_finally(h)` delivers the original reason to the
//! final `get()`.
//!
//! ## Ordering
//!
//! Two continuations registered on the same source run on independent units
//! and may complete in either order.
//!
//! ## Example
//!
//! ```ignore
//! let length = Promise::new(|ok, _| ok.fulfil("Resolved".to_string()))
//!     .then(|s| s.len())
//!     .then(|len| len + 10);
//!
//! assert_eq!(length.get()?, 18);
//! ```

use crate::settler::{Fulfiller, Rejecter};
use pledge_concurrency::{default_dispatcher, Dispatcher, Job, SettlementCell};
use pledge_core::{Outcome, PanicError, PromiseError, Reason, Status};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

/// A deferred result: pending until fulfilled with a `T` or rejected with a
/// [`Reason`]
pub struct Promise<T> {
    cell: Arc<SettlementCell<T>>,
    /// Creates units for continuations; inherited by derived promises
    dispatcher: Arc<dyn Dispatcher>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Promise {
            cell: Arc::clone(&self.cell),
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("status", &self.cell.status())
            .finish()
    }
}

impl<T> Promise<T>
where
    T: Clone + Send + 'static,
{
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create a promise and run `producer` on the calling thread
    ///
    /// The producer receives handles bound to the new promise and may settle
    /// it synchronously or hand the handles to another thread. If the
    /// producer returns `Err` or panics, the promise is rejected with that
    /// failure instead of propagating it to the caller. A failure after the
    /// producer already settled the promise is logged and discarded.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let ready = Promise::new(|ok, _| ok.fulfil(5));
    /// let failed: Promise<i32> = Promise::new(|_, err| err.reject(Reason::msg("no")));
    /// ```
    pub fn new<F, E>(producer: F) -> Self
    where
        F: FnOnce(Fulfiller<T>, Rejecter<T>) -> Result<(), E>,
        E: Into<Reason>,
    {
        Self::new_in(default_dispatcher(), producer)
    }

    /// Like [`Promise::new`], with continuations dispatched on `dispatcher`
    pub fn new_in<F, E>(dispatcher: Arc<dyn Dispatcher>, producer: F) -> Self
    where
        F: FnOnce(Fulfiller<T>, Rejecter<T>) -> Result<(), E>,
        E: Into<Reason>,
    {
        let promise = Self::pending_in(dispatcher);
        let fulfiller = Fulfiller::new(Arc::clone(&promise.cell));
        let rejecter = Rejecter::new(Arc::clone(&promise.cell));

        let failure: Option<Reason> =
            match panic::catch_unwind(AssertUnwindSafe(|| producer(fulfiller, rejecter))) {
                Ok(Ok(())) => None,
                Ok(Err(error)) => Some(error.into()),
                Err(payload) => Some(PanicError::from_payload(payload).into()),
            };

        if let Some(reason) = failure {
            if let Err(err) = promise.cell.reject(reason.clone()) {
                tracing::warn!(
                    status = %err.status(),
                    reason = %reason,
                    "producer failed after settling its promise; failure discarded"
                );
            }
        }

        promise
    }

    /// Create a promise already fulfilled with `value`
    pub fn fulfilled(value: T) -> Self {
        Self::settled_in(default_dispatcher(), Outcome::Fulfilled(value))
    }

    /// Create a promise already rejected with `reason`
    pub fn rejected(reason: impl Into<Reason>) -> Self {
        Self::settled_in(default_dispatcher(), Outcome::Rejected(reason.into()))
    }

    pub(crate) fn pending_in(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Promise {
            cell: Arc::new(SettlementCell::new()),
            dispatcher,
        }
    }

    pub(crate) fn settled_in(dispatcher: Arc<dyn Dispatcher>, outcome: Outcome<T>) -> Self {
        Promise {
            cell: Arc::new(SettlementCell::settled(outcome)),
            dispatcher,
        }
    }

    /// Settle if still pending; see [`SettlementCell::offer`]
    pub(crate) fn offer(&self, outcome: Outcome<T>) -> bool {
        self.cell.offer(outcome)
    }

    // ========================================================================
    // Inspection and retrieval
    // ========================================================================

    /// Current status (never blocks on settlement)
    pub fn status(&self) -> Status {
        self.cell.status()
    }

    /// Check if settled
    pub fn is_settled(&self) -> bool {
        self.cell.is_settled()
    }

    /// Current outcome, if settled (never blocks on settlement)
    pub fn peek(&self) -> Option<Outcome<T>> {
        self.cell.peek()
    }

    /// Block until settled and return the outcome
    pub fn wait(&self) -> Outcome<T> {
        self.cell.wait()
    }

    /// Block until settled or until `timeout` elapses
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Outcome<T>, PromiseError> {
        self.cell.wait_timeout(timeout)
    }

    /// Block until settled and return the value
    ///
    /// # Errors
    ///
    /// `PromiseError::Rejected` carrying the reason if the promise was
    /// rejected.
    pub fn get(&self) -> Result<T, PromiseError> {
        self.wait().into_result()
    }

    /// Block until settled or until `timeout` elapses and return the value
    ///
    /// # Errors
    ///
    /// - `PromiseError::Timeout` if still pending at the deadline. The
    ///   promise is unaffected and a later `get` keeps waiting normally.
    /// - `PromiseError::Rejected` if the promise was rejected.
    pub fn get_timeout(&self, timeout: Duration) -> Result<T, PromiseError> {
        self.wait_timeout(timeout)?.into_result()
    }

    /// Dispatcher used for continuations registered on this promise
    pub fn dispatcher(&self) -> &Arc<dyn Dispatcher> {
        &self.dispatcher
    }

    /// Whether two handles refer to the same promise
    pub fn ptr_eq(a: &Promise<T>, b: &Promise<T>) -> bool {
        Arc::ptr_eq(&a.cell, &b.cell)
    }

    // ========================================================================
    // Continuations
    // ========================================================================

    /// Transform the value once fulfilled
    ///
    /// The derived promise fulfils with `on_fulfil(value)`, or rejects with
    /// the source's reason, or with a [`PanicError`] if `on_fulfil` panics.
    pub fn then<U, F>(&self, on_fulfil: F) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.derive("then", move |outcome| outcome.map(on_fulfil))
    }

    /// Fallible transform of the value once fulfilled
    ///
    /// An `Err` returned by `on_fulfil` rejects the derived promise.
    pub fn try_then<U, E, F>(&self, on_fulfil: F) -> Promise<U>
    where
        U: Clone + Send + 'static,
        E: Into<Reason>,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        self.derive("then", move |outcome| match outcome {
            Outcome::Fulfilled(value) => on_fulfil(value).into(),
            Outcome::Rejected(reason) => Outcome::Rejected(reason),
        })
    }

    /// Transform the value, or observe the rejection
    ///
    /// If the source rejects, `on_reject` sees the reason and the derived
    /// promise is rejected with that same reason.
    pub fn then_or_else<U, F, R>(&self, on_fulfil: F, on_reject: R) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
        R: FnOnce(&Reason) + Send + 'static,
    {
        self.derive("then", move |outcome| match outcome {
            Outcome::Fulfilled(value) => Outcome::Fulfilled(on_fulfil(value)),
            Outcome::Rejected(reason) => {
                on_reject(&reason);
                Outcome::Rejected(reason)
            }
        })
    }

    /// Observe a rejection
    ///
    /// The derived promise carries the source's settlement unchanged, so
    /// several handlers can be chained.
    pub fn catch_error<R>(&self, on_reject: R) -> Promise<T>
    where
        R: FnOnce(&Reason) + Send + 'static,
    {
        self.derive("catch", move |outcome| {
            if let Outcome::Rejected(reason) = &outcome {
                on_reject(reason);
            }
            outcome
        })
    }

    /// Observe the settlement, whatever it is
    ///
    /// The derived promise carries the source's settlement unchanged unless
    /// `on_settle` panics, in which case it is rejected with that panic.
    pub fn and_finally<S>(&self, on_settle: S) -> Promise<T>
    where
        S: FnOnce(&Outcome<T>) + Send + 'static,
    {
        self.derive("finally", move |outcome| {
            on_settle(&outcome);
            outcome
        })
    }

    /// Dispatch a unit that waits on this promise and settles a new one with
    /// `body(outcome)`
    fn derive<U, F>(&self, label: &'static str, body: F) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(Outcome<T>) -> Outcome<U> + Send + 'static,
    {
        let derived = Promise::pending_in(Arc::clone(&self.dispatcher));
        let source = Arc::clone(&self.cell);
        let target = Arc::clone(&derived.cell);

        let job: Job = Box::new(move || {
            let outcome = source.wait();
            let next = match panic::catch_unwind(AssertUnwindSafe(|| body(outcome))) {
                Ok(next) => next,
                Err(payload) => Outcome::Rejected(PanicError::from_payload(payload).into()),
            };
            // This unit is the only writer of the derived cell
            target.offer(next);
        });

        if let Err(err) = self.dispatcher.dispatch(label, job) {
            derived.offer(Outcome::Rejected(err.into()));
        }

        derived
    }
}
