//! Rejection reasons
//!
//! A [`Reason`] is the failure half of a settled promise. It is shared by
//! every holder of the promise and by every continuation derived from it, so
//! it is a cheap-to-clone handle (`Arc`) around a thread-safe error object.
//!
//! ## Cause Chains
//!
//! Reasons may wrap earlier reasons with [`Reason::context`]. The chain is the
//! ordinary `std::error::Error::source` chain, so [`Reason::chain`] and
//! [`Reason::root_cause`] also walk through causes carried by foreign error
//! types.
//!
//! ```ignore
//! let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
//! let reason = Reason::new(io).context("loading manifest");
//!
//! assert_eq!(reason.to_string(), "loading manifest");
//! assert_eq!(reason.root_cause().to_string(), "disk gone");
//! ```

use crate::error::{ContextError, MessageError};
use std::error::Error as StdError;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Shared, thread-safe rejection reason
///
/// Converts from any `std::error::Error + Send + Sync + 'static`, so `?` and
/// `.into()` work for ordinary error types. `Reason` itself deliberately does
/// not implement `std::error::Error` (it dereferences to one instead), which
/// keeps that blanket conversion coherent.
#[derive(Clone)]
pub struct Reason {
    inner: Arc<dyn StdError + Send + Sync + 'static>,
}

impl Reason {
    /// Wrap an error object
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Reason {
            inner: Arc::new(error),
        }
    }

    /// Create a reason from a plain message
    pub fn msg(message: impl fmt::Display) -> Self {
        Reason::new(MessageError::new(message.to_string()))
    }

    /// Wrap this reason with a higher-level message
    ///
    /// The returned reason displays `message` and reports `self` as its
    /// source.
    pub fn context(self, message: impl fmt::Display) -> Self {
        Reason::new(ContextError {
            message: message.to_string(),
            source: self,
        })
    }

    /// Borrow the underlying error object
    pub fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner
    }

    /// Iterate the cause chain, starting with this reason's own error
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            next: Some(self.as_error()),
        }
    }

    /// The innermost cause of this reason
    ///
    /// Returns this reason's own error when it has no source.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut cause: &(dyn StdError + 'static) = self.as_error();
        while let Some(next) = cause.source() {
            cause = next;
        }
        cause
    }

    /// Downcast this reason's own error (not its causes) to a concrete type
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.inner.downcast_ref::<E>()
    }

    /// Search the whole cause chain for an error of type `E`
    pub fn find_cause<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.chain().find_map(|cause| cause.downcast_ref::<E>())
    }

    /// Whether two reasons are handles to the same error object
    pub fn ptr_eq(a: &Reason, b: &Reason) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl<E> From<E> for Reason
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Reason::new(error)
    }
}

impl Deref for Reason {
    type Target = dyn StdError + Send + Sync + 'static;

    fn deref(&self) -> &Self::Target {
        self.as_error()
    }
}

impl AsRef<dyn StdError + Send + Sync + 'static> for Reason {
    fn as_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.as_error()
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reason").field(&self.inner).finish()
    }
}

/// Iterator over a reason's cause chain
///
/// Created by [`Reason::chain`].
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}
