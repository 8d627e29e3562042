//! API Key Dashboard
//!
//! Issue and manage opaque bearer tokens ("API keys"):
//! - Create, list, rename and delete keys over a small JSON API
//! - Validate a presented secret against the stored keys
//! - In-memory or PostgreSQL key stores
//! - A client layer that keeps a masked, observable copy of the key list

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use tracing::info;

use api::state::AppState;
use infrastructure::storage::KeyStore;

/// Open the configured key store and build the application state around it
///
/// The store is returned alongside the state so the caller can close it on shutdown.
pub async fn create_app_state_with_config(
    config: &AppConfig,
) -> anyhow::Result<(AppState, KeyStore)> {
    let storage_config = config.storage.storage_config()?;
    info!("Storage backend: {:?}", storage_config.storage_type());

    let store = KeyStore::open(&storage_config).await?;
    let state = AppState::new(store.service());

    Ok((state, store))
}

/// Application state over an empty in-memory key store
pub fn in_memory_app_state() -> AppState {
    AppState::new(KeyStore::in_memory().service())
}
