//! API Key infrastructure implementations
//!
//! Secret generation, the in-memory and PostgreSQL key stores, and the
//! service that orchestrates them.

mod generator;
mod postgres_repository;
mod repository;
mod service;

pub use generator::{ApiKeyGenerator, SecretGenerator, DEFAULT_KEY_BYTES, DEFAULT_PREFIX};
pub use postgres_repository::PostgresApiKeyRepository;
pub use repository::InMemoryApiKeyRepository;
pub use service::{ApiKeyService, MAX_SECRET_ATTEMPTS};
