//! ttpro remote call surface
//!
//! The TestTrack SDK exposes a SOAP RPC interface where almost every call
//! takes the session cookie as its first argument. This crate defines the
//! typed fault model for that interface, the transport seam the rest of the
//! workspace talks through, and an in-memory mock server for tests.
//! SOAP/WSDL handling itself belongs to the transport implementation and is
//! not part of this workspace.

mod fault;
mod transport;

pub mod mock;

pub use fault::{Fault, EDIT_LOCK_DENIED_CODE};
pub use transport::{methods, SoapTransport};

pub type Result<T> = std::result::Result<T, Fault>;
