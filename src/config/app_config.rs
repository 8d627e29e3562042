use serde::Deserialize;

use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub metrics: MetricsConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Key store selection and PostgreSQL pool settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `in_memory` or `postgres`
    pub backend: String,
    /// Falls back to `DATABASE_URL` when unset
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Settings for the `keys` command's HTTP client
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    /// Per-request timeout; none by default
    pub timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        let pool = PostgresConfig::default();

        Self {
            backend: "in_memory".to_string(),
            database_url: None,
            max_connections: pool.max_connections,
            min_connections: pool.min_connections,
            connect_timeout_secs: pool.connect_timeout_secs,
            idle_timeout_secs: pool.idle_timeout_secs,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            timeout_secs: None,
        }
    }
}

impl StorageSettings {
    pub fn storage_type(&self) -> anyhow::Result<StorageType> {
        StorageType::from_str(&self.backend)
            .ok_or_else(|| anyhow::anyhow!("Unknown storage backend '{}'", self.backend))
    }

    /// Pool settings for the PostgreSQL backend
    pub fn postgres_config(&self) -> anyhow::Result<PostgresConfig> {
        let url = match &self.database_url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => std::env::var("DATABASE_URL").map_err(|_| {
                anyhow::anyhow!(
                    "storage.database_url or DATABASE_URL is required for the postgres backend"
                )
            })?,
        };

        Ok(PostgresConfig::new(url)
            .with_max_connections(self.max_connections)
            .with_min_connections(self.min_connections)
            .with_connect_timeout(self.connect_timeout_secs)
            .with_idle_timeout(self.idle_timeout_secs))
    }

    /// Resolve the backend selection into an openable storage configuration
    pub fn storage_config(&self) -> anyhow::Result<StorageConfig> {
        match self.storage_type()? {
            StorageType::InMemory => Ok(StorageConfig::InMemory),
            StorageType::Postgres => Ok(StorageConfig::Postgres(self.postgres_config()?)),
        }
    }
}

impl AppConfig {
    /// Load `.env`, then `config/default`, `config/local` and `APP__*` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
