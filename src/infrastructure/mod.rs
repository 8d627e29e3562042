//! Infrastructure layer - key generation, storage backends, logging and metrics

pub mod api_key;
pub mod logging;
pub mod observability;
pub mod storage;
