//! Server fault model

use thiserror::Error;

/// Wire detail code the server returns when an entity's edit lock is
/// already held by another session.
pub const EDIT_LOCK_DENIED_CODE: &str = "22";

/// A fault returned by the remote service.
///
/// The server reports faults as a detail code plus a message string; the
/// variants here are the classes the client layers care about. Everything
/// unrecognized stays a [`Fault::Generic`] passthrough.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Login was rejected
    #[error("authentication rejected: {message}")]
    Auth { message: String },

    /// The entity's edit lock is held by another session
    #[error("edit lock denied: {message}")]
    LockConflict { message: String },

    /// The session cookie is invalid or has expired
    #[error("session expired: {message}")]
    SessionExpired { message: String },

    /// Any other server fault, passed through unchanged
    #[error("server fault {code}: {message}")]
    Generic { code: String, message: String },
}

impl Fault {
    /// Classify a raw fault (detail code + message) from the wire.
    pub fn from_wire(code: &str, message: &str) -> Self {
        if code == EDIT_LOCK_DENIED_CODE {
            Fault::LockConflict {
                message: message.to_string(),
            }
        } else {
            Fault::Generic {
                code: code.to_string(),
                message: message.to_string(),
            }
        }
    }

    /// The detail code for faults that carry one
    pub fn code(&self) -> Option<&str> {
        match self {
            Fault::LockConflict { .. } => Some(EDIT_LOCK_DENIED_CODE),
            Fault::Generic { code, .. } => Some(code),
            _ => None,
        }
    }

    /// The human-readable fault message
    pub fn message(&self) -> &str {
        match self {
            Fault::Auth { message }
            | Fault::LockConflict { message }
            | Fault::SessionExpired { message }
            | Fault::Generic { message, .. } => message,
        }
    }

    pub fn is_lock_conflict(&self) -> bool {
        matches!(self, Fault::LockConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire_classifies_lock_code() {
        let fault = Fault::from_wire("22", "Defect 11 is locked");
        assert!(fault.is_lock_conflict());
        assert_eq!(fault.code(), Some(EDIT_LOCK_DENIED_CODE));

        let fault = Fault::from_wire("7", "Record not found");
        assert!(!fault.is_lock_conflict());
        assert_eq!(fault.code(), Some("7"));
    }

    #[test]
    fn test_message_accessor() {
        let fault = Fault::Auth {
            message: "bad password".to_string(),
        };
        assert_eq!(fault.message(), "bad password");
        assert!(fault.code().is_none());
    }
}
