//! ttpro client
//!
//! High-level entry point for talking to a TestTrack server: one [`Client`]
//! per authenticated session, typed reads and edit scopes per entity, and
//! cookie plumbing handled underneath.

mod client;
mod error;

pub use client::Client;
pub use error::ClientError;

// Re-export the component crates' surface
pub use ttpro_api::{methods, Fault, SoapTransport, EDIT_LOCK_DENIED_CODE};
pub use ttpro_edit::{
    has_error, is_edit_lock_held, is_saved, was_edit_lock_conflict, with_edit, EditError,
    EditLock, EditOptions, EditOutcome, EditReport, EditStatus,
};
pub use ttpro_model::{Attachment, Defect, Entity, EntityKind, Requirement, TestCase};
pub use ttpro_session::{Session, SessionConfig, SessionError};

pub type Result<T> = std::result::Result<T, ClientError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
