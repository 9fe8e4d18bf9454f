//! Error types for pledge
//!
//! ## Taxonomy
//!
//! | Type | Raised by | Meaning |
//! |------|-----------|---------|
//! | [`PromiseError::Rejected`] | `get` | The promise settled as rejected; the reason is the source |
//! | [`PromiseError::Timeout`] | `get_timeout` | The bound elapsed while still pending; the cell is untouched |
//! | [`SettleError::AlreadySettled`] | `fulfil`/`reject` | Illegal re-settlement (programming error) |
//! | [`AggregateError`] | `any` | Every member rejected; reasons kept in input order |
//! | [`PanicError`] | continuations | A user callback panicked |
//!
//! [`MessageError`] and [`ContextError`] are the building blocks behind
//! [`Reason::msg`] and [`Reason::context`].

use crate::reason::Reason;
use crate::status::Status;
use std::any::Any;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced when retrieving a promise's value
#[derive(Debug, Clone, Error)]
pub enum PromiseError {
    /// The promise was rejected
    #[error("promise rejected: {reason}")]
    Rejected {
        /// The rejection reason
        #[source]
        reason: Reason,
    },

    /// The bounded wait elapsed before the promise settled
    #[error("timed out after {waited:?} waiting for settlement")]
    Timeout {
        /// How long the caller waited
        waited: Duration,
    },
}

impl PromiseError {
    /// Check if this is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, PromiseError::Timeout { .. })
    }

    /// Check if this is a rejection
    pub fn is_rejected(&self) -> bool {
        matches!(self, PromiseError::Rejected { .. })
    }

    /// The rejection reason, if the promise was rejected
    pub fn reason(&self) -> Option<&Reason> {
        match self {
            PromiseError::Rejected { reason } => Some(reason),
            PromiseError::Timeout { .. } => None,
        }
    }

    /// Take the rejection reason, if the promise was rejected
    pub fn into_reason(self) -> Option<Reason> {
        match self {
            PromiseError::Rejected { reason } => Some(reason),
            PromiseError::Timeout { .. } => None,
        }
    }
}

/// Attempt to settle a cell that already left `Pending`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SettleError {
    /// The cell was settled earlier; the original settlement is kept
    #[error("promise already settled as {status}")]
    AlreadySettled {
        /// The status the cell already holds
        status: Status,
    },
}

impl SettleError {
    /// The status the cell holds
    pub fn status(&self) -> Status {
        match self {
            SettleError::AlreadySettled { status } => *status,
        }
    }
}

/// Every member of an `any` combinator rejected
///
/// Reasons are kept in input order, regardless of the order in which the
/// members settled.
#[derive(Debug, Clone, Error)]
#[error("all {} promises were rejected", .reasons.len())]
pub struct AggregateError {
    reasons: Vec<Reason>,
}

impl AggregateError {
    /// Create from reasons in input order
    pub fn new(reasons: Vec<Reason>) -> Self {
        AggregateError { reasons }
    }

    /// Individual rejection reasons in input order
    pub fn reasons(&self) -> &[Reason] {
        &self.reasons
    }

    /// Number of collected reasons
    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    /// Check if no reasons were collected (empty input)
    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Take the reasons
    pub fn into_reasons(self) -> Vec<Reason> {
        self.reasons
    }
}

/// A producer, transform or handler panicked
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("callback panicked: {message}")]
pub struct PanicError {
    message: String,
}

impl PanicError {
    /// Create from a message
    pub fn new(message: impl Into<String>) -> Self {
        PanicError {
            message: message.into(),
        }
    }

    /// Build from a payload returned by `std::panic::catch_unwind`
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        PanicError { message }
    }

    /// The panic message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Plain-message error behind [`Reason::msg`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MessageError {
    message: String,
}

impl MessageError {
    /// Create from a message
    pub fn new(message: impl Into<String>) -> Self {
        MessageError {
            message: message.into(),
        }
    }

    /// The message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Higher-level message wrapping an earlier reason
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ContextError {
    pub(crate) message: String,
    #[source]
    pub(crate) source: Reason,
}

impl ContextError {
    /// The wrapping message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped reason
    pub fn cause(&self) -> &Reason {
        &self.source
    }
}
