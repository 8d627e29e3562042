//! PostgreSQL-backed API key repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use tracing::info;

use crate::domain::api_key::{ApiKeyId, ApiKeyRecord, ApiKeyRepository, NewApiKeyRecord};
use crate::domain::DomainError;
use crate::infrastructure::storage::{connect_pool, run_migrations, PostgresConfig};

const SELECT_COLUMNS: &str = "id, name, secret, created_at";

#[derive(Debug, FromRow)]
struct ApiKeyRow {
    id: String,
    name: String,
    secret: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ApiKeyRow> for ApiKeyRecord {
    type Error = DomainError;

    fn try_from(row: ApiKeyRow) -> Result<Self, Self::Error> {
        let id = ApiKeyId::new(row.id)
            .map_err(|e| DomainError::storage_unavailable(format!("Corrupt api_keys row: {}", e)))?;

        Ok(ApiKeyRecord::new(id, row.name, row.secret, row.created_at))
    }
}

/// API key repository on a Postgres `api_keys` table
///
/// Lifecycle: [`connect`](Self::connect), then [`init`](Self::init) before
/// first use, [`close`](Self::close) on shutdown.
#[derive(Debug, Clone)]
pub struct PostgresApiKeyRepository {
    pool: PgPool,
}

impl PostgresApiKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pooled connection to the configured database
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = connect_pool(config).await?;
        info!(
            "Connected to PostgreSQL (max_connections={})",
            config.max_connections
        );

        Ok(Self::new(pool))
    }

    /// Bring the schema up to date
    pub async fn init(&self) -> Result<(), DomainError> {
        run_migrations(&self.pool).await
    }

    /// Release all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

fn map_sqlx_error(action: &str, err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::conflict(format!("API key already exists: {}", db.message()))
        }
        _ => DomainError::storage_unavailable(format!("Failed to {}: {}", action, err)),
    }
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepository {
    async fn list(&self) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let query = format!(
            "SELECT {} FROM api_keys ORDER BY created_at DESC, seq DESC",
            SELECT_COLUMNS
        );

        let rows: Vec<ApiKeyRow> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list API keys", e))?;

        rows.into_iter().map(ApiKeyRecord::try_from).collect()
    }

    async fn insert(&self, record: NewApiKeyRecord) -> Result<ApiKeyRecord, DomainError> {
        let record = record.into_record();
        let query = format!(
            "INSERT INTO api_keys (id, name, secret, created_at) VALUES ($1, $2, $3, $4) RETURNING {}",
            SELECT_COLUMNS
        );

        let row: ApiKeyRow = sqlx::query_as(&query)
            .bind(record.id().as_str())
            .bind(record.name())
            .bind(record.secret())
            .bind(record.created_at())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert API key", e))?;

        row.try_into()
    }

    async fn update_name(&self, id: &ApiKeyId, name: &str) -> Result<ApiKeyRecord, DomainError> {
        let query = format!(
            "UPDATE api_keys SET name = $2 WHERE id = $1 RETURNING {}",
            SELECT_COLUMNS
        );

        let row: Option<ApiKeyRow> = sqlx::query_as(&query)
            .bind(id.as_str())
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update API key", e))?;

        row.ok_or_else(|| DomainError::not_found("API key not found"))?
            .try_into()
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete API key", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("API key not found"));
        }

        Ok(())
    }

    async fn find_by_secret(&self, secret: &str) -> Result<Option<ApiKeyRecord>, DomainError> {
        let query = format!("SELECT {} FROM api_keys WHERE secret = $1", SELECT_COLUMNS);

        let row: Option<ApiKeyRow> = sqlx::query_as(&query)
            .bind(secret)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("look up API key", e))?;

        row.map(ApiKeyRecord::try_from).transpose()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx_error("reach database", e))
    }
}
