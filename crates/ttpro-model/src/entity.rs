//! Entity trait and shared payload pieces

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::kind::EntityKind;

/// A typed entity payload that can travel through an edit scope.
///
/// `Default` is the empty payload handed back when a lock conflict is being
/// ignored; callers detect that case through the scope status queries.
pub trait Entity:
    Clone + std::fmt::Debug + Default + Serialize + DeserializeOwned
{
    const KIND: EntityKind;

    /// Server-assigned record identifier, if the payload has one
    fn record_id(&self) -> Option<i64>;
}

/// A file attached to an entity.
///
/// Contents are only populated when the edit was entered with eager
/// attachment download; otherwise the server sends name and size alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "filesize", skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    /// Base64 file contents, present only on eager download
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}
