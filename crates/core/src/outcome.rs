//! Value-or-error payload of a settled promise
//!
//! An [`Outcome`] holds exactly one of a success value or a rejection
//! [`Reason`]. Querying the branch that is not populated returns `None`
//! instead of failing.

use crate::error::PromiseError;
use crate::reason::Reason;
use crate::status::Status;

/// Settled payload: a value or a rejection reason
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    /// Settled with a value
    Fulfilled(T),
    /// Settled with a rejection reason
    Rejected(Reason),
}

impl<T> Outcome<T> {
    /// Status this outcome settles a cell into
    pub fn status(&self) -> Status {
        match self {
            Outcome::Fulfilled(_) => Status::Fulfilled,
            Outcome::Rejected(_) => Status::Rejected,
        }
    }

    /// Check if fulfilled
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Outcome::Fulfilled(_))
    }

    /// Check if rejected
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    /// The value, if fulfilled
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Fulfilled(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    /// The reason, if rejected
    pub fn reason(&self) -> Option<&Reason> {
        match self {
            Outcome::Fulfilled(_) => None,
            Outcome::Rejected(reason) => Some(reason),
        }
    }

    /// Take the value, if fulfilled
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Fulfilled(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    /// Take the reason, if rejected
    pub fn into_reason(self) -> Option<Reason> {
        match self {
            Outcome::Fulfilled(_) => None,
            Outcome::Rejected(reason) => Some(reason),
        }
    }

    /// Convert into the result `get` reports
    pub fn into_result(self) -> Result<T, PromiseError> {
        match self {
            Outcome::Fulfilled(value) => Ok(value),
            Outcome::Rejected(reason) => Err(PromiseError::Rejected { reason }),
        }
    }

    /// Map the fulfilled value, leaving a rejection untouched
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Fulfilled(value) => Outcome::Fulfilled(f(value)),
            Outcome::Rejected(reason) => Outcome::Rejected(reason),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T>
where
    E: Into<Reason>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Fulfilled(value),
            Err(error) => Outcome::Rejected(error.into()),
        }
    }
}
