//! Status queries over edit handles
//!
//! Pure functions usable against both a live [`EditLock`] and a finalized
//! [`EditReport`], mirroring the questions callers ask after a scope ran:
//! did it save, did anything go wrong, and was the lock the problem.

use ttpro_api::Fault;
use ttpro_model::Entity;

use crate::lock::{EditLock, EditReport};
use crate::outcome::EditOutcome;

/// Anything that carries edit scope state.
pub trait EditStatus {
    fn outcome(&self) -> EditOutcome;
    fn fault(&self) -> Option<&Fault>;
    fn lock_held(&self) -> bool;
}

impl<E: Entity> EditStatus for EditLock<'_, E> {
    fn outcome(&self) -> EditOutcome {
        EditLock::outcome(self)
    }

    fn fault(&self) -> Option<&Fault> {
        EditLock::fault(self)
    }

    fn lock_held(&self) -> bool {
        self.is_lock_held()
    }
}

impl<E: Entity> EditStatus for EditReport<E> {
    fn outcome(&self) -> EditOutcome {
        self.outcome
    }

    fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    fn lock_held(&self) -> bool {
        false
    }
}

/// The scope exited normally and the payload was saved.
pub fn is_saved(status: &impl EditStatus) -> bool {
    status.outcome() == EditOutcome::Saved
}

/// Something went wrong inside the scope: the lock was never obtained, or
/// the save leg faulted.
pub fn has_error(status: &impl EditStatus) -> bool {
    status.fault().is_some()
}

/// The server-side write lock is held right now. True only strictly
/// between a successful edit entry and the scope exit.
pub fn is_edit_lock_held(status: &impl EditStatus) -> bool {
    status.lock_held()
}

/// The captured fault is specifically a lock conflict (another session was
/// editing the record).
pub fn was_edit_lock_conflict(status: &impl EditStatus) -> bool {
    status.fault().is_some_and(Fault::is_lock_conflict)
}
