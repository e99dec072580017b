//! Test case payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Attachment, Entity};
use crate::kind::EntityKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCase {
    #[serde(rename = "recordid", skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
    #[serde(rename = "testcasenumber", skip_serializing_if = "Option::is_none")]
    pub test_case_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<String>,
    #[serde(rename = "expectedresults", skip_serializing_if = "Option::is_none")]
    pub expected_results: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "enteredby", skip_serializing_if = "Option::is_none")]
    pub entered_by: Option<String>,
    #[serde(rename = "dateentered", skip_serializing_if = "Option::is_none")]
    pub date_entered: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Entity for TestCase {
    const KIND: EntityKind = EntityKind::TestCase;

    fn record_id(&self) -> Option<i64> {
        self.record_id
    }
}
