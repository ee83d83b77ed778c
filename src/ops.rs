//! Explicit state for asynchronous operations.
//!
//! The editor tracks its persistence work with [`OpState`] instead of loose
//! booleans, and hands out [`SeedTicket`]s so a roster fetch that has been
//! superseded can be recognized and discarded when it finally lands.

/// Lifecycle of one asynchronous operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpState<T, E> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(E),
}

impl<T, E> OpState<T, E> {
    pub fn is_pending(&self) -> bool {
        matches!(self, OpState::Pending)
    }

    /// The failure payload, if the last run failed.
    pub fn failure(&self) -> Option<&E> {
        match self {
            OpState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Identifies one roster fetch. Tickets are handed out in increasing order;
/// only the most recently issued ticket may apply its result. Cancellation
/// is advisory: a stale fetch is not aborted on the wire, its result is
/// simply dropped on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedTicket(pub(crate) u64);
