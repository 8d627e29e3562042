//! Client-side cache of key records, kept in step with the server
//!
//! Every mutation goes to the server first; the cache is only ever replaced by
//! a fresh listing afterwards, never patched locally. Observers receive
//! immutable snapshots through a `watch` channel.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::error::ClientError;
use super::http::ApiKeysClient;
use super::masking::MaskState;
use super::notification::Notifier;
use crate::domain::api_key::{ApiKeyId, ApiKeyRecord};

/// Point-in-time view of the client state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeysSnapshot {
    /// Newest first, as returned by the server
    pub keys: Vec<ApiKeyRecord>,
    pub loading: bool,
    pub mask: MaskState,
}

impl KeysSnapshot {
    /// The record's secret, masked unless its id was toggled
    pub fn display_secret(&self, record: &ApiKeyRecord) -> String {
        self.mask.display(record.id(), record.secret())
    }

    pub fn find(&self, id: &ApiKeyId) -> Option<&ApiKeyRecord> {
        self.keys.iter().find(|k| k.id() == id)
    }
}

/// Messages for one kind of mutation
struct ActionMessages {
    success: &'static str,
    failed: &'static str,
    transport: &'static str,
}

const CREATE: ActionMessages = ActionMessages {
    success: "API key created successfully!",
    failed: "Failed to create API key",
    transport: "Error creating API key",
};

const UPDATE: ActionMessages = ActionMessages {
    success: "API key updated successfully!",
    failed: "Failed to update API key",
    transport: "Error updating API key",
};

const DELETE: ActionMessages = ActionMessages {
    success: "API key deleted successfully!",
    failed: "Failed to delete API key",
    transport: "Error deleting API key",
};

const FETCH_FAILED: &str = "Failed to fetch API keys";
const FETCH_TRANSPORT: &str = "Error loading API keys";

pub struct ApiKeysSync {
    client: Arc<dyn ApiKeysClient>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<Arc<KeysSnapshot>>,
}

impl ApiKeysSync {
    /// Starts in the loading state with an empty cache; call [`refresh`](Self::refresh) to populate
    pub fn new(client: Arc<dyn ApiKeysClient>, notifier: Arc<dyn Notifier>) -> Self {
        let initial = KeysSnapshot {
            loading: true,
            ..Default::default()
        };
        let (state, _) = watch::channel(Arc::new(initial));

        Self {
            client,
            notifier,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<KeysSnapshot>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> Arc<KeysSnapshot> {
        self.state.borrow().clone()
    }

    fn publish(&self, update: impl FnOnce(&mut KeysSnapshot)) {
        self.state.send_modify(|current| {
            let mut next = KeysSnapshot::clone(current);
            update(&mut next);
            *current = Arc::new(next);
        });
    }

    /// Replace the cache with the server's listing.
    ///
    /// On failure the previous records stay in place and an error is reported.
    pub async fn refresh(&self) -> bool {
        self.publish(|s| s.loading = true);

        let result = self.client.list().await;

        match result {
            Ok(keys) => {
                debug!("Refreshed {} API keys", keys.len());
                self.publish(|s| {
                    s.mask.retain(|id| keys.iter().any(|k| k.id() == id));
                    s.keys = keys;
                    s.loading = false;
                });
                true
            }
            Err(e) => {
                debug!("Refresh failed: {}", e);
                let message = match e {
                    ClientError::Api { .. } => FETCH_FAILED,
                    _ => FETCH_TRANSPORT,
                };
                self.notifier.error(message);
                self.publish(|s| s.loading = false);
                false
            }
        }
    }

    pub async fn create(&self, name: &str) -> bool {
        let result = self.client.create(name).await.map(|_| ());
        self.finish(result, &CREATE).await
    }

    pub async fn rename(&self, id: &str, name: &str) -> bool {
        let result = self.client.rename(id, name).await.map(|_| ());
        self.finish(result, &UPDATE).await
    }

    pub async fn remove(&self, id: &str) -> bool {
        let result = self.client.delete(id).await;
        self.finish(result, &DELETE).await
    }

    /// Report the outcome of a mutation and resync on success.
    ///
    /// The mutation counts as successful even if the follow-up refresh fails.
    async fn finish(&self, result: Result<(), ClientError>, messages: &ActionMessages) -> bool {
        match result {
            Ok(()) => {
                self.notifier.success(messages.success);
                self.refresh().await;
                true
            }
            Err(ClientError::Api { message, .. }) => {
                let message = message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| messages.failed.to_string());
                self.notifier.error(&message);
                false
            }
            Err(e) => {
                debug!("{}: {}", messages.transport, e);
                self.notifier.error(messages.transport);
                false
            }
        }
    }

    /// Check a secret against the server; the cache is untouched
    pub async fn validate(&self, secret: &str) -> Result<bool, ClientError> {
        self.client.validate(secret).await
    }

    /// Flip masking for one record; returns whether it is now unmasked
    pub fn toggle_mask(&self, id: &ApiKeyId) -> bool {
        let mut unmasked = false;
        self.publish(|s| unmasked = s.mask.toggle(id));
        unmasked
    }

    pub fn display_secret(&self, record: &ApiKeyRecord) -> String {
        self.snapshot().display_secret(record)
    }
}
