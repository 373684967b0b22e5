//! Order and consultation state machines.
//!
//! Every transition is a pure function from the current record to a [`Transition`].
//! Requests that the machine does not allow come back as [`Transition::Ignored`]
//! with the record untouched; nothing here panics or returns an error.

pub mod consult;
pub mod order;

/// Result of asking a state machine to move.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<T> {
    /// The new state
    Applied(T),
    /// The request was not allowed
    Ignored { reason: String },
}

impl<T> Transition<T> {
    pub(crate) fn ignored(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::debug!(%reason, "transition ignored");
        Transition::Ignored { reason }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied(_))
    }

    /// The new state, if the transition was applied.
    pub fn applied(self) -> Option<T> {
        match self {
            Transition::Applied(state) => Some(state),
            Transition::Ignored { .. } => None,
        }
    }

    /// The new state, or `current` when the request was ignored.
    pub fn or_keep(self, current: T) -> T {
        self.applied().unwrap_or(current)
    }
}
