use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub assignment: AssignmentSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub shutdown_grace_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Mongodb,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub backend: StoreBackend,
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
    /// Connect and server-selection timeout applied to every store call.
    pub timeout_secs: u64,
    pub connect_attempts: u32,
    pub connect_retry_delay_ms: u64,
}

/// What a reassignment does when the team has nobody left to hand the review to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoCandidatePolicy {
    /// Reject the reassignment with `NO_CANDIDATE`.
    #[default]
    Fail,
    /// Leave the current reviewer in place and report them as the replacement.
    Keep,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssignmentSettings {
    pub rng_seed: Option<u64>,
    pub no_candidate: NoCandidatePolicy,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("ROSTER"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8080)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("app.shutdown_grace_secs", 5)?
            .set_default("database.backend", "mongodb")?
            .set_default("database.url", "mongodb://localhost:27017/?replicaSet=rs0")?
            .set_default("database.name", "reviewer_roster")?
            .set_default("database.max_pool_size", 10)?
            .set_default("database.min_pool_size", 1)?
            .set_default("database.timeout_secs", 3)?
            .set_default("database.connect_attempts", 10)?
            .set_default("database.connect_retry_delay_ms", 2000)?
            .set_default("assignment.rng_seed", None::<u64>)?
            .set_default("assignment.no_candidate", "fail")?
            .build()?;

        config.try_deserialize()
    }
}
