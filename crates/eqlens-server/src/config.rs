//! Configuration management

use serde::{Deserialize, Serialize};

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default upload body limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Default minimum database connections in the pool.
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 2;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default database idle timeout in seconds (10 minutes).
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    /// `None` runs the server on the in-memory repository
    pub database: Option<DatabaseConfig>,
    pub cors: CorsConfig,
    pub datasets: DatasetConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

/// Dataset handling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Datasets kept per user; older uploads are deleted
    pub retention_cap: usize,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Build configuration from a key lookup, falling back to defaults for
    /// missing or unparsable values
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            server: ServerConfig {
                host: get("EQLENS_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
                port: parsed(&get, "EQLENS_PORT").unwrap_or(DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: parsed(&get, "EQLENS_SHUTDOWN_TIMEOUT")
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
                max_upload_bytes: parsed(&get, "EQLENS_MAX_UPLOAD_BYTES").unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            },
            database: get("DATABASE_URL")
                .filter(|url| !url.trim().is_empty())
                .map(|url| DatabaseConfig {
                    url,
                    max_connections: parsed(&get, "DATABASE_MAX_CONNECTIONS")
                        .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
                    min_connections: parsed(&get, "DATABASE_MIN_CONNECTIONS")
                        .unwrap_or(DEFAULT_DATABASE_MIN_CONNECTIONS),
                    connect_timeout_secs: parsed(&get, "DATABASE_CONNECT_TIMEOUT")
                        .unwrap_or(DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS),
                    idle_timeout_secs: parsed(&get, "DATABASE_IDLE_TIMEOUT")
                        .unwrap_or(DEFAULT_DATABASE_IDLE_TIMEOUT_SECS),
                }),
            cors: CorsConfig {
                allowed_origins: get("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: parsed(&get, "CORS_ALLOW_CREDENTIALS").unwrap_or(true),
            },
            datasets: DatasetConfig {
                retention_cap: parsed(&get, "EQLENS_RETENTION_CAP")
                    .unwrap_or(eqlens_analytics::RETENTION_CAP),
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.server.max_upload_bytes == 0 {
            anyhow::bail!("Upload limit must be greater than 0 bytes");
        }

        if self.datasets.retention_cap == 0 {
            anyhow::bail!("Retention cap must keep at least one dataset per user");
        }

        if let Some(database) = &self.database {
            if database.max_connections == 0 {
                anyhow::bail!("Database max_connections must be greater than 0");
            }

            if database.min_connections > database.max_connections {
                anyhow::bail!(
                    "Database min_connections ({}) cannot be greater than max_connections ({})",
                    database.min_connections,
                    database.max_connections
                );
            }
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        if self.cors.allow_credentials && self.cors.allowed_origins.iter().any(|o| o == "*") {
            anyhow::bail!("CORS credentials cannot be combined with a wildcard origin");
        }

        Ok(())
    }
}

fn parsed<T, F>(get: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    get(key).and_then(|s| s.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            database: None,
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: true,
            },
            datasets: DatasetConfig {
                retention_cap: eqlens_analytics::RETENTION_CAP,
            },
        }
    }
}
