mod document;
mod location;
mod report;
mod user;

pub use document::{Collection, ROOT_FIELD};
pub use location::Location;
pub use report::{
    ANONYMOUS_EMAIL, DEFAULT_CATEGORY, DEFAULT_REPORTER_NAME, DEFAULT_STATUS, Report,
};
pub use user::{Role, User, UserProfile};
