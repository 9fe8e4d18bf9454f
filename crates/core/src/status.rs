//! Settlement status of a promise
//!
//! ## State Machine
//!
//! ```text
//! Pending --fulfil--> Fulfilled   (terminal)
//! Pending --reject--> Rejected    (terminal)
//! ```
//!
//! A status never moves back to `Pending` and never moves between the two
//! terminal states.

/// Lifecycle state of a settlement cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Not yet settled
    #[default]
    Pending,
    /// Settled with a value
    Fulfilled,
    /// Settled with a rejection reason
    Rejected,
}

impl Status {
    /// Check if still pending
    pub fn is_pending(&self) -> bool {
        matches!(self, Status::Pending)
    }

    /// Check if settled (fulfilled or rejected)
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// Check if fulfilled
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Status::Fulfilled)
    }

    /// Check if rejected
    pub fn is_rejected(&self) -> bool {
        matches!(self, Status::Rejected)
    }

    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(&self, next: Status) -> bool {
        self.is_pending() && next.is_settled()
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Fulfilled => "fulfilled",
            Status::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
