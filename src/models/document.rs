use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use validator::ValidateEmail;

use crate::error::{FieldError, ValidationError, Violation};

/// A record stored in its own document-store collection.
///
/// Documents are JSON objects whose keys are exactly the record's field
/// names. Reading a document is the only way to obtain a record, so every
/// value of an implementing type has passed validation.
pub trait Collection: Serialize + DeserializeOwned + Sized {
    /// Collection name: the schema name, lower-cased.
    const NAME: &'static str;

    fn from_document(doc: &Map<String, Value>) -> Result<Self, ValidationError>;

    /// The stored form of the record. Fails if the record does not serialize
    /// to a JSON object, so an empty or partial document never reaches storage.
    fn to_document(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(doc) => Ok(doc),
            _ => Err(serde::ser::Error::custom(format!(
                "{} record did not serialize to an object",
                Self::NAME
            ))),
        }
    }

    fn from_value(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(doc) => Self::from_document(doc),
            _ => Err(ValidationError::single(
                ROOT_FIELD,
                Violation::WrongType { expected: "object" },
            )),
        }
    }
}

/// Field name used when the whole input, not one key, is wrong.
pub const ROOT_FIELD: &str = "$root";

/// Reads typed fields out of an input mapping, collecting every violation.
///
/// Readers return a placeholder on failure so the caller can build the whole
/// record in one expression; [`FieldReader::finish`] then discards it if any
/// field was rejected.
pub(crate) struct FieldReader<'a> {
    doc: &'a Map<String, Value>,
    seen: Vec<&'static str>,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(doc: &'a Map<String, Value>) -> Self {
        Self {
            doc,
            seen: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn get(&mut self, key: &'static str) -> Option<&'a Value> {
        self.seen.push(key);
        self.doc.get(key)
    }

    fn reject(&mut self, key: &str, violation: Violation) {
        self.errors.push(FieldError::new(key, violation));
    }

    /// A text field that must be present and non-null.
    pub(crate) fn required_text(&mut self, key: &'static str) -> String {
        match self.get(key) {
            None | Some(Value::Null) => {
                self.reject(key, Violation::Missing);
                String::new()
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.reject(key, Violation::WrongType { expected: "string" });
                String::new()
            }
        }
    }

    /// Like [`required_text`](Self::required_text), but blank text is rejected too.
    pub(crate) fn non_empty_text(&mut self, key: &'static str) -> String {
        let value = self.required_text(key);
        if self.doc.get(key).is_some_and(Value::is_string) && value.trim().is_empty() {
            self.reject(key, Violation::Empty);
        }
        value
    }

    /// A required text field holding a syntactically valid email address.
    pub(crate) fn email(&mut self, key: &'static str) -> String {
        let value = self.required_text(key);
        if self.doc.get(key).is_some_and(Value::is_string) && !is_email_address(&value) {
            self.reject(key, Violation::MalformedEmail);
        }
        value
    }

    /// An optional text field. Absent keys take `default`; `null` stays `None`.
    pub(crate) fn optional_text(&mut self, key: &'static str, default: &str) -> Option<String> {
        match self.get(key) {
            None => Some(default.to_string()),
            Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.reject(key, Violation::WrongType { expected: "string" });
                None
            }
        }
    }

    /// An optional float. Both absent and `null` read as `None`.
    pub(crate) fn optional_float(&mut self, key: &'static str) -> Option<f64> {
        match self.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64(),
            Some(_) => {
                self.reject(key, Violation::WrongType { expected: "number" });
                None
            }
        }
    }

    /// An optional integer. Absent keys take `default()`; `null` stays `None`.
    pub(crate) fn optional_integer(
        &mut self,
        key: &'static str,
        default: impl FnOnce() -> i64,
    ) -> Option<i64> {
        match self.get(key) {
            None => Some(default()),
            Some(Value::Null) => None,
            Some(Value::Number(n)) => match integral(n) {
                Some(i) => Some(i),
                None => {
                    self.reject(key, Violation::WrongType { expected: "integer" });
                    None
                }
            },
            Some(_) => {
                self.reject(key, Violation::WrongType { expected: "integer" });
                None
            }
        }
    }

    /// A non-optional boolean with a default for absent keys.
    pub(crate) fn bool_or(&mut self, key: &'static str, default: bool) -> bool {
        match self.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                self.reject(key, Violation::WrongType { expected: "boolean" });
                default
            }
        }
    }

    /// A non-optional field parsed from text, e.g. an enumeration literal.
    pub(crate) fn parsed_or<T>(&mut self, key: &'static str, default: T) -> T
    where
        T: std::str::FromStr<Err = Violation>,
    {
        match self.get(key) {
            None => default,
            Some(Value::String(s)) => match s.parse() {
                Ok(parsed) => parsed,
                Err(violation) => {
                    self.reject(key, violation);
                    default
                }
            },
            Some(_) => {
                self.reject(key, Violation::WrongType { expected: "string" });
                default
            }
        }
    }

    /// An optional embedded object. Absent keys take `default()`; `null`
    /// stays `None`. Nested violations are reported as `key.field`.
    pub(crate) fn optional_embedded<T>(
        &mut self,
        key: &'static str,
        read: impl FnOnce(&Map<String, Value>) -> Result<T, ValidationError>,
        default: impl FnOnce() -> T,
    ) -> Option<T> {
        match self.get(key) {
            None => Some(default()),
            Some(Value::Null) => None,
            Some(Value::Object(inner)) => match read(inner) {
                Ok(value) => Some(value),
                Err(e) => {
                    self.errors.extend(e.nested_under(key).into_errors());
                    None
                }
            },
            Some(_) => {
                self.reject(key, Violation::WrongType { expected: "object" });
                None
            }
        }
    }

    /// Returns `value` if every field read so far was accepted.
    pub(crate) fn finish<T>(self, schema: &str, value: T) -> Result<T, ValidationError> {
        for key in self.doc.keys() {
            if !self.seen.iter().any(|seen| *seen == key.as_str()) {
                tracing::debug!(schema, key = %key, "ignoring unknown field");
            }
        }

        if self.errors.is_empty() {
            Ok(value)
        } else {
            let err = ValidationError::new(self.errors);
            tracing::debug!(schema, "validation failed: {}", err);
            Err(err)
        }
    }
}

/// Address shape check. On top of `validate_email`, the domain must be a
/// dotted host name: bare hosts like `localhost` and `[ip]` literals are rejected.
fn is_email_address(value: &str) -> bool {
    if !value.validate_email() {
        return false;
    }
    match value.rsplit_once('@') {
        Some((_, domain)) => domain.contains('.') && !domain.starts_with('['),
        None => false,
    }
}

fn integral(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
