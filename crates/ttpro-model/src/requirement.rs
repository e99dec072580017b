//! Requirement payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Attachment, Entity};
use crate::kind::EntityKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirement {
    #[serde(rename = "recordid", skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
    #[serde(rename = "requirementnumber", skip_serializing_if = "Option::is_none")]
    pub requirement_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub requirement_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "enteredby", skip_serializing_if = "Option::is_none")]
    pub entered_by: Option<String>,
    #[serde(rename = "dateentered", skip_serializing_if = "Option::is_none")]
    pub date_entered: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Entity for Requirement {
    const KIND: EntityKind = EntityKind::Requirement;

    fn record_id(&self) -> Option<i64> {
        self.record_id
    }
}
