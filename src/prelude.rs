//! Convenient imports for pledge.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```ignore
//! use pledge::prelude::*;
//!
//! let p = Promise::new(|ok, _| ok.fulfil(5));
//! assert_eq!(p.then(|v| v * 2).get()?, 10);
//! ```
//!
//! `all`, `race` and `any` are left out to avoid shadowing common names;
//! call them as `pledge::all` and so on.

// Main entry point
pub use crate::{Fulfiller, Promise, Rejecter};

// Settled payloads
pub use crate::{Outcome, Reason, Status};

// Error handling
pub use crate::{PromiseError, SettleError};

// Construction helpers
pub use crate::{reject, resolve, resolve_with};
