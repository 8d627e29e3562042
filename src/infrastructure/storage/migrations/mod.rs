//! Database migrations infrastructure

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// PostgreSQL migrator tracking applied versions in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage_unavailable(format!("Failed to create migrations table: {}", e))
        })?;

        Ok(())
    }

    /// Runs a single migration unless it is already recorded
    ///
    /// Returns whether the migration was applied by this call.
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage_unavailable(format!(
                        "Failed to check migration status: {}",
                        e
                    ))
                })?;

        if applied {
            return Ok(false);
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::storage_unavailable(format!("Failed to start migration: {}", e))
        })?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage_unavailable(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage_unavailable(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit().await.map_err(|e| {
            DomainError::storage_unavailable(format!(
                "Failed to commit migration {}: {}",
                migration.version, e
            ))
        })?;

        info!(
            "Applied migration {}: {}",
            migration.version, migration.description
        );

        Ok(true)
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage_unavailable(format!(
                    "Failed to get migration version: {}",
                    e
                ))
            })
    }
}

/// Represents a database migration
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Migration version, strictly increasing
    pub version: i64,
    /// Human-readable description
    pub description: &'static str,
    /// SQL to run when applying the migration
    pub up: &'static str,
}

/// Schema for the key store, in application order
pub fn api_key_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            description: "Create api_keys table",
            up: r#"
            CREATE TABLE IF NOT EXISTS api_keys (
                seq BIGSERIAL NOT NULL,
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL CHECK (btrim(name) <> ''),
                secret TEXT NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
        },
        Migration {
            version: 2,
            description: "Index api_keys by creation order",
            up: r#"
            CREATE INDEX IF NOT EXISTS idx_api_keys_created_at
                ON api_keys (created_at DESC, seq DESC);
            "#,
        },
    ]
}

/// Runs all pending key store migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());

    for migration in api_key_migrations() {
        migrator.run_migration(&migration).await?;
    }

    if let Some(version) = migrator.current_version().await? {
        info!("Database schema at version {}", version);
    }

    Ok(())
}
