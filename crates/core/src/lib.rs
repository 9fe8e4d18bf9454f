//! Core types for pledge
//!
//! This crate defines the data model shared by every layer:
//! - Status: the settlement state machine (Pending, Fulfilled, Rejected)
//! - Outcome: the value-or-error payload of a settled promise
//! - Reason: shared rejection reasons with unwrappable cause chains
//! - Error types: retrieval, re-settlement, aggregate and panic failures

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod outcome;
pub mod reason;
pub mod status;

pub use error::{
    AggregateError, ContextError, MessageError, PanicError, PromiseError, SettleError,
};
pub use outcome::Outcome;
pub use reason::{Chain, Reason};
pub use status::Status;
