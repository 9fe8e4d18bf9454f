//! Promise primitives for pledge
//!
//! This crate implements the user-facing promise surface:
//! - Promise: single-assignment deferred result with blocking getters
//! - Continuations: then / try_then / then_or_else / catch_error / and_finally
//! - Settlers: Fulfiller and Rejecter handles handed to a producer
//! - Combinators: resolve, reject, all, all_settled, race, any

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod combinators;
pub mod promise;
pub mod settler;

pub use combinators::{all, all_settled, any, race, reject, resolve, resolve_with, IntoPromise};
pub use promise::Promise;
pub use settler::{Fulfiller, Rejecter};
