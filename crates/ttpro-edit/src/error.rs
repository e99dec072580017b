//! Edit scope error types

use thiserror::Error;

use ttpro_api::Fault;
use ttpro_model::EntityKind;
use ttpro_session::SessionError;

#[derive(Error, Debug)]
pub enum EditError {
    /// The entity is being edited by another session
    #[error("edit lock denied on {kind} {record_id}: {message}")]
    LockConflict {
        kind: EntityKind,
        record_id: i64,
        message: String,
    },

    /// The save leg of a successful edit failed; the edit lock was still
    /// released via a best-effort cancel
    #[error("save failed for {kind} {record_id}: {fault}")]
    Save {
        kind: EntityKind,
        record_id: i64,
        #[source]
        fault: Fault,
    },

    #[error("malformed {kind} payload: {source}")]
    Decode {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}
