//! Session error types

use thiserror::Error;
use ttpro_api::Fault;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("session expired: {0}")]
    Expired(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Any other server fault, passed through unchanged
    #[error(transparent)]
    Fault(#[from] Fault),
}
