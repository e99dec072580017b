//! ttpro edit-lock scopes
//!
//! Every `edit*` call on the server implicitly takes a per-entity write
//! lock (with a 15 minute server-side expiry) that only a paired `save*` or
//! `cancelSave*` call releases. [`EditLock`] pairs the three: acquiring it
//! issues the edit call, consuming it with [`EditLock::save`] issues the
//! save, and every other way out of scope issues the cancel, exactly once,
//! so an abandoned or failed edit never leaves the record locked.

mod error;
mod lock;
mod outcome;
mod status;

pub use error::EditError;
pub use lock::{with_edit, EditLock, EditOptions, EditReport};
pub use outcome::EditOutcome;
pub use status::{
    has_error, is_edit_lock_held, is_saved, was_edit_lock_conflict, EditStatus,
};

pub type Result<T> = std::result::Result<T, EditError>;
