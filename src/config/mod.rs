use std::env;

use crate::models::Collection;

const DEFAULT_DATABASE_NAME: &str = "civic_sense";

/// Where records are stored. Read by the host binary and passed to the
/// persistence layer.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub database_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key))
    }

    /// Builds the config from any variable source, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let database_name = match lookup("DATABASE_NAME") {
            Ok(name) if !name.trim().is_empty() => name,
            Ok(_) | Err(env::VarError::NotPresent) => DEFAULT_DATABASE_NAME.to_string(),
            Err(e) => return Err(e),
        };

        Ok(Config {
            database_url: lookup("DATABASE_URL")?,
            database_name,
        })
    }

    /// `<database>.<collection>`, the namespace a record type is stored under.
    pub fn namespace<T: Collection>(&self) -> String {
        format!("{}.{}", self.database_name, T::NAME)
    }
}
