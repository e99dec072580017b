//! ttpro entity model
//!
//! Typed payloads for the entities the client edits. The server returns
//! entities as loose records; here every field is a named `Option` so any
//! subset may be populated before a save, replacing the dynamic attribute
//! bag the SOAP layer works with.

mod defect;
mod entity;
mod kind;
mod requirement;
mod test_case;

pub use defect::Defect;
pub use entity::{Attachment, Entity};
pub use kind::EntityKind;
pub use requirement::Requirement;
pub use test_case::TestCase;
