//! Dashboard client: HTTP access to the key management API plus a locally
//! cached, observable view of the key list

mod error;
mod http;
mod masking;
mod notification;
mod sync;

pub use error::ClientError;
pub use http::{ApiKeysClient, HttpApiKeysClient};
#[cfg(test)]
pub use http::MockApiKeysClient;
pub use masking::{mask_secret, MaskState, MASK_SUFFIX, SHORT_MASK, VISIBLE_PREFIX_LEN};
pub use notification::{ChannelNotifier, Notification, NotificationKind, Notifier, TracingNotifier};
pub use sync::{ApiKeysSync, KeysSnapshot};
