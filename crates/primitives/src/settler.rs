//! Settlement handles passed to a promise's producer
//!
//! [`Promise::new`](crate::Promise::new) hands its producer one
//! [`Fulfiller`] and one [`Rejecter`], both bound to the new promise's cell.
//! They are cheap to clone and may be moved to other threads, so a producer
//! can return immediately and settle later from anywhere.
//!
//! Only the first settlement applies. Any later `fulfil`/`reject` returns
//! [`SettleError::AlreadySettled`] and leaves the promise untouched.

use pledge_concurrency::SettlementCell;
use pledge_core::{Reason, SettleError, Status};
use std::fmt;
use std::sync::Arc;

/// Handle that fulfils one promise
pub struct Fulfiller<T> {
    cell: Arc<SettlementCell<T>>,
}

impl<T> Fulfiller<T> {
    pub(crate) fn new(cell: Arc<SettlementCell<T>>) -> Self {
        Fulfiller { cell }
    }

    /// Fulfil the promise with `value`
    pub fn fulfil(&self, value: T) -> Result<(), SettleError> {
        self.cell.fulfil(value)
    }

    /// Status of the bound promise
    pub fn status(&self) -> Status {
        self.cell.status()
    }
}

impl<T> Clone for Fulfiller<T> {
    fn clone(&self) -> Self {
        Fulfiller {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for Fulfiller<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fulfiller")
            .field("status", &self.status())
            .finish()
    }
}

/// Handle that rejects one promise
pub struct Rejecter<T> {
    cell: Arc<SettlementCell<T>>,
}

impl<T> Rejecter<T> {
    pub(crate) fn new(cell: Arc<SettlementCell<T>>) -> Self {
        Rejecter { cell }
    }

    /// Reject the promise with `reason`
    pub fn reject(&self, reason: impl Into<Reason>) -> Result<(), SettleError> {
        self.cell.reject(reason.into())
    }

    /// Status of the bound promise
    pub fn status(&self) -> Status {
        self.cell.status()
    }
}

impl<T> Clone for Rejecter<T> {
    fn clone(&self) -> Self {
        Rejecter {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for Rejecter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejecter")
            .field("status", &self.status())
            .finish()
    }
}
