//! Defect payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Attachment, Entity};
use crate::kind::EntityKind;

/// An issue record.
///
/// Field names follow the wire representation (lowercase, run together) so
/// a payload round-trips through the transport untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defect {
    #[serde(rename = "recordid", skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
    #[serde(rename = "defectnumber", skip_serializing_if = "Option::is_none")]
    pub defect_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub defect_type: Option<String>,
    #[serde(rename = "enteredby", skip_serializing_if = "Option::is_none")]
    pub entered_by: Option<String>,
    #[serde(rename = "dateentered", skip_serializing_if = "Option::is_none")]
    pub date_entered: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Entity for Defect {
    const KIND: EntityKind = EntityKind::Defect;

    fn record_id(&self) -> Option<i64> {
        self.record_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_names() {
        let defect: Defect = serde_json::from_value(json!({
            "recordid": 11,
            "summary": "Crash on save",
            "priority": "High",
            "enteredby": "alice",
        }))
        .unwrap();

        assert_eq!(defect.record_id, Some(11));
        assert_eq!(defect.entered_by.as_deref(), Some("alice"));
        assert!(defect.product.is_none());
    }

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let defect = Defect {
            record_id: Some(11),
            priority: Some("Immediate".to_string()),
            ..Defect::default()
        };

        let value = serde_json::to_value(&defect).unwrap();
        assert_eq!(value, json!({"recordid": 11, "priority": "Immediate"}));
    }
}
