use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Seconds a RESERVED hold stays live.
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: i64,
    /// Explicit cancels park the slot in CANCELLED instead of reviving it.
    #[serde(default)]
    pub terminal_cancel: bool,
    /// Interval for the background expiry sweep; absent disables it and
    /// leaves expiry fully lazy.
    #[serde(default)]
    pub sweep_interval_seconds: Option<u64>,
}

fn default_hold_seconds() -> i64 {
    600
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `FAIRWAY_SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("FAIRWAY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
