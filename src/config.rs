//! Runtime configuration read from the environment (and `.env`).

use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_JWT_SECRET: &str = "smartfill-jwt-secret-change-in-production";
const DEFAULT_GUEST_SESSION_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_TEMPLATE_CACHE_TTL_SECS: u64 = 10 * 60;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub guest_session_ttl: Duration,
    pub template_cache_ttl: Duration,
    pub typst_bin: String,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default secret. SET THIS IN PRODUCTION!");
            DEFAULT_JWT_SECRET.to_string()
        });

        Ok(Self {
            database_url,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            jwt_secret,
            guest_session_ttl: secs_var("GUEST_SESSION_TTL_SECS", DEFAULT_GUEST_SESSION_TTL_SECS)?,
            template_cache_ttl: secs_var("TEMPLATE_CACHE_TTL_SECS", DEFAULT_TEMPLATE_CACHE_TTL_SECS)?,
            typst_bin: env::var("TYPST_BIN").unwrap_or_else(|_| "typst".to_string()),
            allowed_origins: parse_origins(
                &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
            ),
        })
    }
}

fn secs_var(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_secs(name, &value),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

fn parse_secs(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::Invalid {
            name,
            value: value.to_string(),
        })
}

pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
