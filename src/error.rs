use std::fmt;

use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use crate::result::ApiResult;

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("field is required")]
    Missing,
    #[error("expected {expected}")]
    WrongType { expected: &'static str },
    #[error("must not be empty")]
    Empty,
    #[error("not a valid email address")]
    MalformedEmail,
    #[error("unknown role `{value}`, expected one of: user, municipal")]
    UnknownRole { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {violation}")]
pub struct FieldError {
    pub field: String,
    pub violation: Violation,
}

impl FieldError {
    pub fn new(field: impl Into<String>, violation: Violation) -> Self {
        Self {
            field: field.into(),
            violation,
        }
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FieldError", 2)?;
        state.serialize_field("field", &self.field)?;
        state.serialize_field("reason", &self.violation.to_string())?;
        state.end()
    }
}

/// Raised when an input mapping cannot become a record.
///
/// Always holds at least one [`FieldError`]; all violations found in the
/// input are reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors }
    }

    pub fn single(field: impl Into<String>, violation: Violation) -> Self {
        Self::new(vec![FieldError::new(field, violation)])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Whether `field` is among the rejected fields.
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }

    /// Prefixes every field path with `parent.`, for embedded objects.
    pub(crate) fn nested_under(self, parent: &str) -> Self {
        let errors = self
            .errors
            .into_iter()
            .map(|e| FieldError::new(format!("{}.{}", parent, e.field), e.violation))
            .collect();
        Self { errors }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const BAD_REQUEST: i32 = 1006;
}

/// Errors surfaced to the HTTP caller at the request boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(err) => {
                let body = Json(ApiResult::error_with_content(
                    error_codes::VALIDATION_ERROR,
                    "invalid input",
                    err.into_errors(),
                ));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            AppError::MalformedBody(reason) => {
                let body = Json(ApiResult::<()>::error(error_codes::BAD_REQUEST, &reason));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}
