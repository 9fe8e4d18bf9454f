//! Settlement cell: the shared state behind one promise
//!
//! A cell is a condition-variable-guarded record holding `None` while pending
//! and `Some(outcome)` once settled.
//!
//! ## Invariants
//!
//! - Transitions are only `Pending -> Fulfilled` or `Pending -> Rejected`
//! - The payload is written at most once, under the cell's mutex, in the same
//!   critical section that changes the status
//! - Every successful settlement wakes every blocked waiter
//!
//! ## Settlement Entry Points
//!
//! | Method | On an already-settled cell |
//! |--------|----------------------------|
//! | `fulfil` / `reject` / `settle` | `Err(SettleError::AlreadySettled)` |
//! | `offer` | returns `false` |
//!
//! `offer` exists for units that legitimately race for the same derived
//! cell (combinator monitors), where losing the race is expected.

use parking_lot::{Condvar, Mutex};
use pledge_core::{Outcome, PromiseError, Reason, SettleError, Status};
use std::fmt;
use std::time::{Duration, Instant};

/// Condvar-guarded settlement state shared by all holders of one promise
pub struct SettlementCell<T> {
    /// `None` while pending
    state: Mutex<Option<Outcome<T>>>,
    /// Signalled (notify_all) after the single successful settlement
    settled: Condvar,
}

impl<T> SettlementCell<T> {
    /// Create a pending cell
    pub fn new() -> Self {
        SettlementCell {
            state: Mutex::new(None),
            settled: Condvar::new(),
        }
    }

    /// Create a cell that is already settled
    pub fn settled(outcome: Outcome<T>) -> Self {
        SettlementCell {
            state: Mutex::new(Some(outcome)),
            settled: Condvar::new(),
        }
    }

    /// Current status (never blocks on settlement)
    pub fn status(&self) -> Status {
        self.state
            .lock()
            .as_ref()
            .map_or(Status::Pending, Outcome::status)
    }

    /// Check if settled
    pub fn is_settled(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Fulfil with a value
    pub fn fulfil(&self, value: T) -> Result<(), SettleError> {
        self.settle(Outcome::Fulfilled(value))
    }

    /// Reject with a reason
    pub fn reject(&self, reason: Reason) -> Result<(), SettleError> {
        self.settle(Outcome::Rejected(reason))
    }

    /// Settle with an outcome
    ///
    /// Fails without touching the cell if it already left `Pending`.
    pub fn settle(&self, outcome: Outcome<T>) -> Result<(), SettleError> {
        let status = outcome.status();
        {
            let mut state = self.state.lock();
            let current = state.as_ref().map_or(Status::Pending, Outcome::status);
            if !current.can_transition_to(status) {
                return Err(SettleError::AlreadySettled { status: current });
            }
            *state = Some(outcome);
        }
        self.settled.notify_all();
        tracing::trace!(%status, "cell settled");
        Ok(())
    }

    /// Settle if still pending
    ///
    /// Returns whether this call settled the cell. A refused offer leaves the
    /// earlier settlement untouched and drops `outcome`.
    pub fn offer(&self, outcome: Outcome<T>) -> bool {
        match self.settle(outcome) {
            Ok(()) => true,
            Err(SettleError::AlreadySettled { status }) => {
                tracing::trace!(%status, "offer refused, cell already settled");
                false
            }
        }
    }
}

impl<T: Clone> SettlementCell<T> {
    /// Current outcome, if settled (never blocks on settlement)
    pub fn peek(&self) -> Option<Outcome<T>> {
        self.state.lock().clone()
    }

    /// Block until settled and return the outcome
    pub fn wait(&self) -> Outcome<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(outcome) = state.as_ref() {
                return outcome.clone();
            }
            self.settled.wait(&mut state);
        }
    }

    /// Block until settled or until `timeout` elapses
    ///
    /// Spurious wake-ups do not shorten the wait. On timeout the cell is left
    /// pending and a later `wait` keeps waiting normally.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Outcome<T>, PromiseError> {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            // Unrepresentable deadline: no observable difference from unbounded
            None => return Ok(self.wait()),
        };

        let mut state = self.state.lock();
        loop {
            if let Some(outcome) = state.as_ref() {
                return Ok(outcome.clone());
            }
            if self.settled.wait_until(&mut state, deadline).timed_out() {
                return match state.as_ref() {
                    Some(outcome) => Ok(outcome.clone()),
                    None => Err(PromiseError::Timeout { waited: timeout }),
                };
            }
        }
    }
}

impl<T> Default for SettlementCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SettlementCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettlementCell")
            .field("status", &self.status())
            .finish()
    }
}
