use anyhow::{Context, Result};
use std::time::Duration;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: required("DATABASE_HOST")?,
            port: required("DATABASE_PORT")?
                .parse::<u16>()
                .context("DATABASE_PORT must be a port number")?,
            username: required("DATABASE_USERNAME")?,
            password: required("DATABASE_PASSWORD")?,
            database: required("DATABASE_NAME")?,
            acquire_timeout: seconds_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
        };
        let identity = IdentityConfig {
            verify_url: required("IDENTITY_VERIFY_URL")?,
            timeout: seconds_or("IDENTITY_TIMEOUT_SECS", 5)?,
        };
        let server = ServerConfig {
            port: match std::env::var("SERVER_PORT") {
                Ok(v) => v.parse().context("SERVER_PORT must be a port number")?,
                Err(_) => 8080,
            },
        };
        Ok(Self {
            database,
            identity,
            server,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub acquire_timeout: Duration,
}

pub struct IdentityConfig {
    /// Endpoint of the external token verification service.
    pub verify_url: String,
    pub timeout: Duration,
}

pub struct ServerConfig {
    pub port: u16,
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("environment variable {key} is not set"))
}

fn seconds_or(key: &str, default: u64) -> Result<Duration> {
    let secs = match std::env::var(key) {
        Ok(v) => v
            .parse::<u64>()
            .with_context(|| format!("{key} must be a number of seconds"))?,
        Err(_) => default,
    };
    Ok(Duration::from_secs(secs))
}
