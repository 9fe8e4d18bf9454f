//! Execution-unit dispatch for continuations and combinator monitors
//!
//! Every continuation registration and every combinator member gets its own
//! unit of execution. [`Dispatcher`] is the seam that creates those units;
//! [`ThreadDispatcher`] is the default and starts one named OS thread per
//! job. There is no pooling and no reuse: a unit runs its job to completion
//! and exits.
//!
//! ## Thread Names
//!
//! Units are named `<prefix>-<label>-<seq>`, e.g. `pledge-then-17`, so log
//! lines and panic messages identify which registration produced them.
//!
//! ## Configuration
//!
//! ```ignore
//! let dispatcher = ThreadDispatcher::new(
//!     DispatchConfig::compact().with_thread_name_prefix("ingest"),
//! );
//! let promise = Promise::new_in(Arc::new(dispatcher), |ok, _| ok.fulfil(1));
//! ```

use once_cell::sync::Lazy;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use thiserror::Error;

/// A unit of work handed to a dispatcher
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Creates execution units for dispatched jobs
///
/// Implementations must run each job on a unit that does not block the
/// caller of `dispatch`, and must run every accepted job exactly once.
pub trait Dispatcher: Send + Sync {
    /// Start `job` on a new unit of execution
    ///
    /// `label` names the kind of work (`then`, `all`, ...) for diagnostics.
    /// On error the job has been dropped without running.
    fn dispatch(&self, label: &'static str, job: Job) -> Result<(), DispatchError>;
}

/// Failure to start a unit of execution
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The OS refused to spawn a thread
    #[error("failed to spawn {label} unit: {source}")]
    Spawn {
        /// Kind of work that was being dispatched
        label: &'static str,
        /// Underlying spawn error
        #[source]
        source: io::Error,
    },

    /// The dispatcher no longer accepts work
    #[error("dispatcher rejected {label} unit: {message}")]
    Rejected {
        /// Kind of work that was being dispatched
        label: &'static str,
        /// Why the dispatcher refused the job
        message: String,
    },
}

// ============================================================================
// Configuration
// ============================================================================

/// Default thread name prefix
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "pledge";

/// Stack size used by [`DispatchConfig::compact`]
pub const COMPACT_STACK_SIZE: usize = 256 * 1024;

/// Options for [`ThreadDispatcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Prefix for unit thread names
    pub thread_name_prefix: String,
    /// Stack size per unit; `None` uses the platform default
    pub stack_size: Option<usize>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            stack_size: None,
        }
    }
}

impl DispatchConfig {
    /// Small stacks for many short continuations
    ///
    /// Returns `stack_size: Some(256 KiB)` with the default prefix.
    pub fn compact() -> Self {
        DispatchConfig {
            stack_size: Some(COMPACT_STACK_SIZE),
            ..Default::default()
        }
    }

    /// Set the thread name prefix
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set the per-unit stack size
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

// ============================================================================
// Thread-per-job dispatcher
// ============================================================================

/// Dispatcher that starts one detached OS thread per job
#[derive(Debug, Default)]
pub struct ThreadDispatcher {
    config: DispatchConfig,
    /// Sequence number for thread names; counts every dispatch attempt
    dispatched: AtomicU64,
}

impl ThreadDispatcher {
    /// Create with the given options
    pub fn new(config: DispatchConfig) -> Self {
        ThreadDispatcher {
            config,
            dispatched: AtomicU64::new(0),
        }
    }

    /// Options this dispatcher was created with
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Number of dispatch attempts so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }
}

impl Dispatcher for ThreadDispatcher {
    fn dispatch(&self, label: &'static str, job: Job) -> Result<(), DispatchError> {
        let seq = self.dispatched.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{}-{}", self.config.thread_name_prefix, label, seq);

        let mut builder = thread::Builder::new().name(name);
        if let Some(bytes) = self.config.stack_size {
            builder = builder.stack_size(bytes);
        }

        // The join handle is dropped: units are detached and never reclaimed.
        match builder.spawn(job) {
            Ok(handle) => {
                tracing::debug!(label, thread = ?handle.thread().name(), "unit dispatched");
                Ok(())
            }
            Err(source) => {
                tracing::error!(label, error = %source, "failed to spawn dispatch unit");
                Err(DispatchError::Spawn { label, source })
            }
        }
    }
}

static DEFAULT_DISPATCHER: Lazy<Arc<ThreadDispatcher>> =
    Lazy::new(|| Arc::new(ThreadDispatcher::default()));

/// Process-wide dispatcher used when none is given explicitly
pub fn default_dispatcher() -> Arc<dyn Dispatcher> {
    DEFAULT_DISPATCHER.clone()
}
