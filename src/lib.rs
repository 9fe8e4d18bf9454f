//! # Pledge
//!
//! Thread-backed promises: single-assignment deferred results that are
//! settled once, observed by any number of threads, and composed with
//! continuations and aggregate combinators.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pledge::prelude::*;
//!
//! // Producer runs synchronously; settle now or hand the handles away
//! let greeting = Promise::new(|ok, _| ok.fulfil("Resolved".to_string()));
//!
//! // Continuations run on their own unit of execution
//! let length = greeting.then(|s| s.len()).then(|n| n + 10);
//! assert_eq!(length.get()?, 18);
//!
//! // Aggregates
//! let both = pledge::all(&[resolve(1), resolve(2)]);
//! assert_eq!(both.get()?, vec![1, 2]);
//! ```
//!
//! ## Layers
//!
//! - `pledge-core` - [`Status`], [`Outcome`], [`Reason`] and the error types
//! - `pledge-concurrency` - [`SettlementCell`] and [`Dispatcher`]s
//! - `pledge-primitives` - [`Promise`], settlers and combinators
//!
//! ## Failures
//!
//! A rejected promise carries a [`Reason`], a shared handle to any
//! `std::error::Error + Send + Sync`. Blocking getters surface it as
//! [`PromiseError::Rejected`]; [`Reason::root_cause`] walks to the innermost
//! cause.

#![warn(missing_docs)]

pub mod prelude;

// Re-export core types
pub use pledge_core::{
    AggregateError, Chain, ContextError, MessageError, Outcome, PanicError, PromiseError,
    Reason, SettleError, Status,
};

// Re-export execution machinery
pub use pledge_concurrency::{
    default_dispatcher, DispatchConfig, DispatchError, Dispatcher, Job, SettlementCell,
    ThreadDispatcher,
};

// Re-export promises and combinators
pub use pledge_primitives::{
    all, all_settled, any, race, reject, resolve, resolve_with, Fulfiller, IntoPromise, Promise,
    Rejecter,
};
