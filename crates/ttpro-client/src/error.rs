//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Session error: {0}")]
    Session(#[from] ttpro_session::SessionError),

    #[error("Edit error: {0}")]
    Edit(#[from] ttpro_edit::EditError),

    #[error("Payload decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
