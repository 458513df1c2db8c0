//! Record schemas for the Civic-Sense backend.
//!
//! A [`User`] is an account; a [`Report`] is a civic issue with an embedded
//! [`Location`]. Records are only built from validated input mappings and
//! are handed to the document store as JSON objects via [`Collection`].

pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod result;

pub use error::{AppError, FieldError, ValidationError, Violation};
pub use models::{Collection, Location, Report, Role, User, UserProfile};
