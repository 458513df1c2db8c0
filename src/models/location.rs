use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::document::FieldReader;
use crate::error::ValidationError;

/// Where a report was made. Embedded in a report, never stored on its own.
///
/// Missing coordinates stay `None`, so "no coordinates" is never confused
/// with a point at the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Location {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Nearest address or landmark.
    pub address: Option<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            lat: None,
            lng: None,
            address: Some(String::new()),
        }
    }
}

impl Location {
    pub fn from_document(doc: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = FieldReader::new(doc);
        let location = Location {
            lat: fields.optional_float("lat"),
            lng: fields.optional_float("lng"),
            address: fields.optional_text("address", ""),
        };
        fields.finish("location", location)
    }

    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }
}

impl TryFrom<Map<String, Value>> for Location {
    type Error = ValidationError;

    fn try_from(doc: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::from_document(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read(value: Value) -> Result<Location, ValidationError> {
        match value {
            Value::Object(doc) => Location::from_document(&doc),
            _ => panic!("test document must be an object"),
        }
    }

    #[test]
    fn empty_input_gives_empty_location() {
        let location = read(json!({})).unwrap();
        assert_eq!(location, Location::default());
        assert_eq!(location.lat, None);
        assert_eq!(location.address.as_deref(), Some(""));
        assert!(!location.has_coordinates());
    }

    #[test]
    fn origin_is_not_absent() {
        let location = read(json!({ "lat": 0, "lng": 0.0 })).unwrap();
        assert_eq!(location.lat, Some(0.0));
        assert_eq!(location.lng, Some(0.0));
        assert!(location.has_coordinates());
    }

    #[test]
    fn explicit_null_address_stays_none() {
        let location = read(json!({ "address": null })).unwrap();
        assert_eq!(location.address, None);
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        let err = read(json!({ "lat": "12.9", "lng": 77.5 })).unwrap_err();
        assert!(err.has("lat"));
        assert!(!err.has("lng"));
    }
}
