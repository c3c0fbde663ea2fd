//! # configs
//!
//! Runtime settings for the Questboard server. Values come from built-in
//! defaults, overridden by `QUESTBOARD_*` environment variables. A `.env`
//! file in the working directory is read first when present.

use config::{Config, Environment, Map};
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "QUESTBOARD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Which port implementation backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local maps, lost on restart
    Memory,
    /// SQLite file at `database_url` (requires the `db-sqlite` feature)
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub database_url: String,
    /// Rows returned by the leaderboard route
    pub ranking_limit: usize,
    pub body_limit_mb: usize,
    pub log_json: bool,
}

impl Settings {
    /// Reads `.env` (if any) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case
        let _ = dotenvy::dotenv();
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    /// Builds settings from an explicit variable map instead of the process
    /// environment. Keys carry the `QUESTBOARD_` prefix.
    pub fn from_map(vars: Map<String, String>) -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000_i64)?
            .set_default("store", "sqlite")?
            .set_default("database_url", "sqlite:rpg.db")?
            .set_default("ranking_limit", 100_i64)?
            .set_default("body_limit_mb", 50_i64)?
            .set_default("log_json", false)?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize::<Settings>()?;

        tracing::debug!(?settings, "configuration loaded");
        Ok(settings)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb.saturating_mul(1024 * 1024)
    }
}
