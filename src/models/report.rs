use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::document::{Collection, FieldReader};
use super::location::Location;
use crate::error::ValidationError;

pub const ANONYMOUS_EMAIL: &str = "anonymous@civic-sense.local";
pub const DEFAULT_REPORTER_NAME: &str = "Citizen";
pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_STATUS: &str = "Submitted";

/// A civic issue submitted by a citizen, stored in the `report` collection.
///
/// Only `description` is required. Every other field falls back to a
/// default when its key is absent; an explicit `null` is kept as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Report {
    pub user_email: Option<String>,
    pub name: Option<String>,
    pub description: String,
    pub category: Option<String>,
    pub location: Option<Location>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub status: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: Option<i64>,
    #[serde(rename = "pointsAwarded")]
    pub points_awarded: Option<i64>,
}

impl Report {
    /// An anonymous report with every default applied, timestamped now.
    pub fn new(description: impl Into<String>) -> Self {
        Report {
            user_email: Some(ANONYMOUS_EMAIL.to_string()),
            name: Some(DEFAULT_REPORTER_NAME.to_string()),
            description: description.into(),
            category: Some(DEFAULT_CATEGORY.to_string()),
            location: Some(Location::default()),
            image_url: Some(String::new()),
            status: Some(DEFAULT_STATUS.to_string()),
            timestamp: Some(now_millis()),
            points_awarded: Some(0),
        }
    }

    /// Reads a report, using `now_ms` if the input has no `timestamp`.
    pub fn from_document_at(
        doc: &Map<String, Value>,
        now_ms: i64,
    ) -> Result<Self, ValidationError> {
        let mut fields = FieldReader::new(doc);
        let report = Report {
            user_email: fields.optional_text("user_email", ANONYMOUS_EMAIL),
            name: fields.optional_text("name", DEFAULT_REPORTER_NAME),
            description: fields.required_text("description"),
            category: fields.optional_text("category", DEFAULT_CATEGORY),
            location: fields.optional_embedded(
                "location",
                Location::from_document,
                Location::default,
            ),
            image_url: fields.optional_text("imageUrl", ""),
            status: fields.optional_text("status", DEFAULT_STATUS),
            timestamp: fields.optional_integer("timestamp", || now_ms),
            points_awarded: fields.optional_integer("pointsAwarded", || 0),
        };
        fields.finish(Self::NAME, report)
    }
}

impl Collection for Report {
    const NAME: &'static str = "report";

    fn from_document(doc: &Map<String, Value>) -> Result<Self, ValidationError> {
        Self::from_document_at(doc, now_millis())
    }
}

impl TryFrom<Map<String, Value>> for Report {
    type Error = ValidationError;

    fn try_from(doc: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::from_document(&doc)
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
