use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::document::{Collection, FieldReader};
use crate::error::{ValidationError, Violation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Municipal,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Municipal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Municipal => "municipal",
        }
    }

    /// Municipal accounts see the dashboard that manages incoming reports.
    pub fn is_municipal(&self) -> bool {
        matches!(self, Role::Municipal)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Violation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Violation::UnknownRole {
                value: s.to_string(),
            })
    }
}

/// An account record, stored in the `user` collection.
///
/// Fields are private: `email` is only ever set from validated input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct User {
    name: String,
    email: String,
    role: Role,
    password_hash: String,
    is_active: bool,
}

/// What other users and the front end may see of an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
}

impl User {
    /// Builds an active `user`-role account. `password_hash` must already be hashed.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let mut doc = Map::new();
        doc.insert("name".into(), Value::String(name.into()));
        doc.insert("email".into(), Value::String(email.into()));
        doc.insert("password_hash".into(), Value::String(password_hash.into()));
        Self::from_document(&doc)
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            is_active: self.is_active,
        }
    }
}

impl Collection for User {
    const NAME: &'static str = "user";

    fn from_document(doc: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = FieldReader::new(doc);
        let user = User {
            name: fields.non_empty_text("name"),
            email: fields.email("email"),
            role: fields.parsed_or("role", Role::default()),
            password_hash: fields.non_empty_text("password_hash"),
            is_active: fields.bool_or("is_active", true),
        };
        fields.finish(Self::NAME, user)
    }
}

impl TryFrom<Map<String, Value>> for User {
    type Error = ValidationError;

    fn try_from(doc: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::from_document(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use rstest::rstest;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    fn valid() -> Map<String, Value> {
        doc(json!({
            "name": "Asha Rao",
            "email": "asha@example.org",
            "password_hash": "$2b$12$abcdefghijklmnopqrstuv",
        }))
    }

    #[test]
    fn defaults_role_and_active_flag() {
        let user = User::from_document(&valid()).unwrap();
        assert_eq!(user.name(), "Asha Rao");
        assert_eq!(user.email(), "asha@example.org");
        assert_eq!(user.role(), Role::User);
        assert!(user.is_active());
    }

    #[test]
    fn accepts_municipal_role_and_inactive_flag() {
        let mut input = valid();
        input.insert("role".into(), json!("municipal"));
        input.insert("is_active".into(), json!(false));
        let user = User::from_document(&input).unwrap();
        assert!(user.role().is_municipal());
        assert!(!user.is_active());
    }

    #[rstest]
    #[case("admin")]
    #[case("User")]
    #[case("")]
    #[case("municipal ")]
    fn rejects_roles_outside_the_set(#[case] role: &str) {
        let mut input = valid();
        input.insert("role".into(), json!(role));
        let err = User::from_document(&input).unwrap_err();
        assert_eq!(
            err.errors(),
            [FieldError::new(
                "role",
                Violation::UnknownRole {
                    value: role.to_string()
                }
            )]
        );
    }

    #[rstest]
    #[case("not-an-email")]
    #[case("missing-domain@")]
    #[case("@missing-local.org")]
    #[case("two@@signs.org")]
    #[case("asha@localhost")]
    #[case("asha@[127.0.0.1]")]
    #[case("Asha <asha@example.org>")]
    fn rejects_malformed_email(#[case] email: &str) {
        let mut input = valid();
        input.insert("email".into(), json!(email));
        let err = User::from_document(&input).unwrap_err();
        assert_eq!(err.errors(), [FieldError::new("email", Violation::MalformedEmail)]);
    }

    #[rstest]
    #[case("name")]
    #[case("email")]
    #[case("password_hash")]
    fn rejects_missing_required_field(#[case] field: &str) {
        let mut input = valid();
        input.remove(field);
        let err = User::from_document(&input).unwrap_err();
        assert_eq!(err.errors(), [FieldError::new(field, Violation::Missing)]);
    }

    #[test]
    fn rejects_blank_name_and_password_hash() {
        let mut input = valid();
        input.insert("name".into(), json!(""));
        input.insert("password_hash".into(), json!("  "));
        let err = User::from_document(&input).unwrap_err();
        assert!(err.has("name"));
        assert!(err.has("password_hash"));
    }

    #[test]
    fn reports_every_violation_at_once() {
        let input = doc(json!({ "email": "nope", "role": "admin", "is_active": "yes" }));
        let err = User::from_document(&input).unwrap_err();
        let mut fields: Vec<_> = err.fields().collect();
        fields.sort_unstable();
        assert_eq!(fields, ["email", "is_active", "name", "password_hash", "role"]);
    }

    #[test]
    fn boolean_strings_are_not_coerced() {
        let mut input = valid();
        input.insert("is_active".into(), json!("true"));
        let err = User::from_document(&input).unwrap_err();
        assert_eq!(
            err.errors(),
            [FieldError::new("is_active", Violation::WrongType { expected: "boolean" })]
        );
    }

    #[test]
    fn null_role_is_a_type_error() {
        let mut input = valid();
        input.insert("role".into(), Value::Null);
        let err = User::from_document(&input).unwrap_err();
        assert_eq!(
            err.errors(),
            [FieldError::new("role", Violation::WrongType { expected: "string" })]
        );
    }

    #[test]
    fn typed_constructor_validates_email() {
        assert!(User::new("Asha", "asha@example.org", "hash").is_ok());
        assert!(User::new("Asha", "asha.example.org", "hash").unwrap_err().has("email"));
        assert!(User::new("Asha", "asha@localhost", "hash").unwrap_err().has("email"));
    }

    #[test]
    fn document_round_trip_keeps_every_field() {
        let user = User::new("Asha", "asha@example.org", "hash")
            .unwrap()
            .with_role(Role::Municipal)
            .deactivated();
        let stored = user.to_document().unwrap();
        assert_eq!(
            Value::Object(stored.clone()),
            json!({
                "name": "Asha",
                "email": "asha@example.org",
                "role": "municipal",
                "password_hash": "hash",
                "is_active": false,
            })
        );
        assert_eq!(User::from_document(&stored).unwrap(), user);
    }

    #[test]
    fn profile_omits_password_hash() {
        let user = User::new("Asha", "asha@example.org", "hash").unwrap();
        let profile = serde_json::to_value(user.profile()).unwrap();
        assert!(profile.get("password_hash").is_none());
        assert_eq!(profile["role"], "user");
    }

    #[test]
    fn deserialize_runs_validation() {
        let parsed: Result<User, _> =
            serde_json::from_value(json!({ "name": "A", "email": "bad", "password_hash": "h" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn role_parses_and_displays_literals() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }
}
