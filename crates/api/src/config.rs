use std::str::FromStr;

use anyhow::{bail, Context};

/// Deployment mode. Only `Development` exposes internal error detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => bail!("APP_ENV must be 'development' or 'production', got '{other}'"),
        }
    }
}

/// Which [`QuoteStore`](roofquote_core::store::QuoteStore) implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        }
    }
}

/// Log output format for the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development,
/// except `DATABASE_URL` which the Postgres backend requires.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub environment: Environment,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is Postgres.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec!["http://localhost:5173".into()],
            request_timeout_secs: 30,
            environment: Environment::default(),
            store_backend: StoreBackend::default(),
            database_url: None,
            database_max_connections: 20,
            log_format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `APP_ENV`                  | `production`               |
    /// | `STORE_BACKEND`            | `postgres`                 |
    /// | `DATABASE_URL`             | (required for postgres)    |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`                       |
    /// | `LOG_FORMAT`               | `pretty`                   |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid u16, got '{raw}'"))?,
            None => defaults.port,
        };

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("REQUEST_TIMEOUT_SECS must be a valid u64, got '{raw}'"))?,
            None => defaults.request_timeout_secs,
        };

        let environment = match lookup("APP_ENV") {
            Some(raw) => raw.parse()?,
            None => defaults.environment,
        };

        let store_backend = match lookup("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.store_backend,
        };

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND is 'postgres'");
        }

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => {
                let n: u32 = raw.trim().parse().with_context(|| {
                    format!("DATABASE_MAX_CONNECTIONS must be a valid u32, got '{raw}'")
                })?;
                if n == 0 {
                    bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
                }
                n
            }
            None => defaults.database_max_connections,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            Some("pretty") | Some("") | None => LogFormat::Pretty,
            Some(other) => bail!("LOG_FORMAT must be 'pretty' or 'json', got '{other}'"),
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            environment,
            store_backend,
            database_url,
            database_max_connections,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn memory_backend_needs_no_database() {
        let config = load(&[("STORE_BACKEND", "memory")]).unwrap();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let config = load(&[("DATABASE_URL", "postgres://localhost/quotes")]).unwrap();
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.database_max_connections, 20);
    }

    #[test]
    fn parses_overrides() {
        let config = load(&[
            ("STORE_BACKEND", "memory"),
            ("PORT", "8080"),
            ("APP_ENV", "Development"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.environment.is_development());
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_values_fail_fast() {
        assert!(load(&[("STORE_BACKEND", "memory"), ("PORT", "http")]).is_err());
        assert!(load(&[("STORE_BACKEND", "mongo")]).is_err());
        assert!(load(&[("STORE_BACKEND", "memory"), ("APP_ENV", "staging")]).is_err());
        assert!(load(&[("STORE_BACKEND", "memory"), ("DATABASE_MAX_CONNECTIONS", "0")]).is_err());
    }
}
