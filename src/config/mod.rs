use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub tracking: TrackingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Destination for tracked click redirects; the recipient email is
    /// appended as a query parameter.
    pub signup_url: String,
}

impl TrackingConfig {
    fn default_signup_url() -> String {
        "https://yourcourse.com/signup".to_string()
    }
}

/// Rewrite the legacy `postgres://` scheme still handed out by some hosting
/// providers to the `postgresql://` scheme the driver expects.
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix("postgres://") {
        Some(rest) => format!("postgresql://{rest}"),
        None => url.to_string(),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL is not set; it must point at the event store")?;
        let database_url = normalize_database_url(&database_url);

        let backend = if database_url.starts_with("sqlite") {
            DatabaseBackend::Sqlite
        } else {
            DatabaseBackend::Postgres
        };

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()?;

        let signup_url =
            std::env::var("SIGNUP_URL").unwrap_or_else(|_| TrackingConfig::default_signup_url());

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
            },
            server: ServerConfig { host, port },
            tracking: TrackingConfig { signup_url },
        })
    }
}
