//! Concurrency layer for pledge
//!
//! This crate implements the blocking machinery under every promise:
//! - SettlementCell: Mutex + Condvar state record, settled exactly once
//! - Dispatcher: one execution unit per continuation or combinator member
//! - ThreadDispatcher: default dispatcher, one named OS thread per job

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod dispatch;

pub use cell::SettlementCell;
pub use dispatch::{
    default_dispatcher, DispatchConfig, DispatchError, Dispatcher, Job, ThreadDispatcher,
};
