//! Server configuration
//!
//! Layered: built-in defaults, then an optional `todo-server.{toml,yaml,json}`
//! in the working directory, then `TODO_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const CONFIG_FILE_STEM: &str = "todo-server";
pub const ENV_PREFIX: &str = "TODO";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// `postgres://...` or `sqlite:...`. Required.
    pub database_url: String,
    pub bind_address: String,
    pub max_connections: u32,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("max_connections", i64::from(DEFAULT_MAX_CONNECTIONS))?
            .add_source(File::with_name(CONFIG_FILE_STEM).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// Scheme of the database URL, safe to log.
    pub fn database_scheme(&self) -> &str {
        self.database_url.split(':').next().unwrap_or_default()
    }
}
