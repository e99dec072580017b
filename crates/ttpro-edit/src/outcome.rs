//! Edit scope outcome state machine
//!
//! ```text
//! Pending
//!   ↓ save RPC succeeded          ↓ scope abandoned / save failed
//! Saved                           Cancelled
//! ```
//!
//! A handle that never obtained the lock (an ignored conflict) stays
//! `Pending` forever: no scope ran, so no terminal transition occurs.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Scope not yet exited (or never entered)
    Pending,
    /// Normal exit, save RPC issued
    Saved,
    /// Abnormal exit or explicit cancel, cancelSave RPC issued
    Cancelled,
}

impl EditOutcome {
    /// Check if transition to another outcome is valid
    pub fn can_transition_to(&self, target: EditOutcome) -> bool {
        matches!(
            (self, target),
            (EditOutcome::Pending, EditOutcome::Saved)
                | (EditOutcome::Pending, EditOutcome::Cancelled)
        )
    }

    /// Whether this is a terminal outcome
    pub fn is_final(&self) -> bool {
        !matches!(self, EditOutcome::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EditOutcome::Pending => "pending",
            EditOutcome::Saved => "saved",
            EditOutcome::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(EditOutcome::Pending.can_transition_to(EditOutcome::Saved));
        assert!(EditOutcome::Pending.can_transition_to(EditOutcome::Cancelled));
    }

    #[test]
    fn test_terminal_outcomes_do_not_transition() {
        assert!(!EditOutcome::Saved.can_transition_to(EditOutcome::Cancelled));
        assert!(!EditOutcome::Saved.can_transition_to(EditOutcome::Pending));
        assert!(!EditOutcome::Cancelled.can_transition_to(EditOutcome::Saved));
        assert!(!EditOutcome::Cancelled.can_transition_to(EditOutcome::Pending));
        assert!(!EditOutcome::Pending.can_transition_to(EditOutcome::Pending));
    }

    #[test]
    fn test_finality() {
        assert!(!EditOutcome::Pending.is_final());
        assert!(EditOutcome::Saved.is_final());
        assert!(EditOutcome::Cancelled.is_final());
    }
}
