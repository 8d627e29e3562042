//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ClientConfig, LogFormat, LoggingConfig, ServerConfig, StorageSettings,
};
