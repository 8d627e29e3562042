//! Storage infrastructure - connection pooling, schema migrations and backend selection

mod factory;
pub mod migrations;
mod postgres;

pub use factory::{KeyStore, StorageConfig, StorageType};
pub use migrations::{run_migrations, Migration, PostgresMigrator};
pub use postgres::{connect_pool, PostgresConfig};
