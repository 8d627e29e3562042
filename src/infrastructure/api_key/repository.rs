//! In-memory API key repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::generator::constant_time_compare;
use crate::domain::api_key::{ApiKeyId, ApiKeyRecord, ApiKeyRepository, NewApiKeyRecord};
use crate::domain::DomainError;

/// In-memory implementation of ApiKeyRepository
///
/// Data lives for the lifetime of the instance only.
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    /// Records by id, each tagged with its insertion sequence number
    records: HashMap<ApiKeyId, (u64, ApiKeyRecord)>,
    next_seq: u64,
}

impl State {
    fn push(&mut self, record: ApiKeyRecord) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.records.insert(record.id().clone(), (seq, record));
    }
}

impl InMemoryApiKeyRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial records, inserted in the given order
    pub fn with_records(records: Vec<ApiKeyRecord>) -> Self {
        let mut state = State::default();

        for record in records {
            state.push(record);
        }

        Self {
            state: RwLock::new(state),
        }
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn list(&self) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let state = self.state.read().await;

        let mut entries: Vec<&(u64, ApiKeyRecord)> = state.records.values().collect();
        entries.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| seq_b.cmp(seq_a))
        });

        Ok(entries.into_iter().map(|(_, r)| r.clone()).collect())
    }

    async fn insert(&self, record: NewApiKeyRecord) -> Result<ApiKeyRecord, DomainError> {
        let record = record.into_record();
        let mut state = self.state.write().await;

        if state.records.contains_key(record.id()) {
            return Err(DomainError::conflict(format!(
                "API key with ID '{}' already exists",
                record.id()
            )));
        }

        if state
            .records
            .values()
            .any(|(_, existing)| existing.secret() == record.secret())
        {
            return Err(DomainError::conflict("API key secret already exists"));
        }

        state.push(record.clone());
        Ok(record)
    }

    async fn update_name(&self, id: &ApiKeyId, name: &str) -> Result<ApiKeyRecord, DomainError> {
        let mut state = self.state.write().await;

        let (_, record) = state
            .records
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("API key not found"))?;

        record.set_name(name);
        Ok(record.clone())
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        state
            .records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("API key not found"))
    }

    async fn find_by_secret(&self, secret: &str) -> Result<Option<ApiKeyRecord>, DomainError> {
        let state = self.state.read().await;

        // Scan every record so lookup time does not depend on where the match sits
        let mut found = None;

        for (_, record) in state.records.values() {
            if constant_time_compare(record.secret(), secret) {
                found = Some(record.clone());
            }
        }

        Ok(found)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
