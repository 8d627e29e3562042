//! Keys command - manage keys against a running server

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::client::{
    ApiKeysSync, HttpApiKeysClient, KeysSnapshot, Notification, NotificationKind, Notifier,
};
use crate::config::AppConfig;
use crate::domain::api_key::ApiKeyId;
use crate::infrastructure::logging::init_cli_logging;

#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Base URL of the server; overrides `client.api_url`
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub action: KeysAction,
}

#[derive(Subcommand, Debug)]
pub enum KeysAction {
    /// List keys, newest first
    List {
        /// Show the full secret of this key; may be repeated
        #[arg(long = "unmask", value_name = "ID")]
        unmask: Vec<String>,
    },

    /// Create a key
    Create { name: String },

    /// Rename a key
    Rename { id: String, name: String },

    /// Delete a key
    Delete { id: String },

    /// Check whether a secret belongs to an existing key
    Validate { secret: String },
}

/// Prints success to stdout and errors to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => println!("{}", notification.message),
            NotificationKind::Error => eprintln!("{}", notification.message),
        }
    }
}

pub async fn run(args: KeysArgs) -> anyhow::Result<()> {
    init_cli_logging();

    let config = AppConfig::load().unwrap_or_default();
    let api_url = args.api_url.unwrap_or(config.client.api_url);
    let timeout = config.client.timeout_secs.map(Duration::from_secs);

    let client = HttpApiKeysClient::new(api_url, timeout)?;
    let sync = ApiKeysSync::new(Arc::new(client), Arc::new(ConsoleNotifier));

    let ok = match args.action {
        KeysAction::List { unmask } => {
            let ok = sync.refresh().await;
            if ok {
                for missing in unmask_listed(&sync, unmask)? {
                    eprintln!("No API key with id {}", missing);
                }
                print!("{}", render_table(&sync.snapshot()));
            }
            ok
        }
        KeysAction::Create { name } => print_after(&sync, sync.create(&name).await),
        KeysAction::Rename { id, name } => print_after(&sync, sync.rename(&id, &name).await),
        KeysAction::Delete { id } => print_after(&sync, sync.remove(&id).await),
        KeysAction::Validate { secret } => {
            let valid = sync.validate(&secret).await?;
            println!("{}", if valid { "valid" } else { "invalid" });
            valid
        }
    };

    if !ok {
        anyhow::bail!("keys command failed");
    }

    Ok(())
}

/// Unmask each listed id present in the cache; returns the ids that were not found
fn unmask_listed(sync: &ApiKeysSync, ids: Vec<String>) -> anyhow::Result<Vec<ApiKeyId>> {
    let mut missing = Vec::new();

    for id in ids {
        let id = ApiKeyId::new(id)?;

        if sync.snapshot().find(&id).is_some() {
            if !sync.snapshot().mask.is_unmasked(&id) {
                sync.toggle_mask(&id);
            }
        } else {
            missing.push(id);
        }
    }

    Ok(missing)
}

fn print_after(sync: &ApiKeysSync, ok: bool) -> bool {
    if ok {
        print!("{}", render_table(&sync.snapshot()));
    }
    ok
}

/// Render the cached keys as a fixed-width table
pub fn render_table(snapshot: &KeysSnapshot) -> String {
    if snapshot.keys.is_empty() {
        return "No API keys\n".to_string();
    }

    let name_width = snapshot
        .keys
        .iter()
        .map(|k| k.name().chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let id_width = snapshot
        .keys
        .iter()
        .map(|k| k.id().as_str().len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:<id_width$}  {:<36}  CREATED",
        "NAME", "ID", "KEY"
    );

    for key in &snapshot.keys {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:<id_width$}  {:<36}  {}",
            key.name(),
            key.id().as_str(),
            snapshot.display_secret(key),
            key.created_at().format("%Y-%m-%d %H:%M:%S UTC"),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MaskState, MockApiKeysClient};
    use crate::domain::api_key::ApiKeyRecord;
    use chrono::{TimeZone, Utc};

    fn snapshot() -> KeysSnapshot {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        KeysSnapshot {
            keys: vec![
                ApiKeyRecord::new(
                    ApiKeyId::new("k2").unwrap(),
                    "production",
                    "sk_0123456789abcdef0123456789abcdef",
                    created,
                ),
                ApiKeyRecord::new(
                    ApiKeyId::new("k1").unwrap(),
                    "dev",
                    "sk_fedcba9876543210fedcba9876543210",
                    created,
                ),
            ],
            loading: false,
            mask: MaskState::new(),
        }
    }

    #[test]
    fn test_render_table_masks_secrets() {
        let table = render_table(&snapshot());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[1].starts_with("production  k2"));
        assert!(lines[1].contains("sk_••••••••••••"));
        assert!(lines[1].ends_with("2024-03-01 09:30:00 UTC"));
        assert!(!table.contains("0123456789abcdef"));
    }

    #[test]
    fn test_render_table_unmasked() {
        let mut snapshot = snapshot();
        snapshot.mask.toggle(&ApiKeyId::new("k1").unwrap());

        let table = render_table(&snapshot);

        assert!(table.contains("sk_fedcba9876543210fedcba9876543210"));
        assert!(!table.contains("sk_0123456789abcdef0123456789abcdef"));
    }

    #[tokio::test]
    async fn test_unmask_listed_reports_unknown_ids() {
        let listed = snapshot().keys;
        let mut client = MockApiKeysClient::new();
        client
            .expect_list()
            .returning(move || Ok(listed.clone()));
        let sync = ApiKeysSync::new(Arc::new(client), Arc::new(ConsoleNotifier));
        sync.refresh().await;

        let missing = unmask_listed(
            &sync,
            vec!["k1".to_string(), "nope".to_string(), "k1".to_string()],
        )
        .unwrap();

        assert_eq!(missing, vec![ApiKeyId::new("nope").unwrap()]);
        let snapshot = sync.snapshot();
        assert!(snapshot.mask.is_unmasked(&ApiKeyId::new("k1").unwrap()));
        assert!(!snapshot.mask.is_unmasked(&ApiKeyId::new("k2").unwrap()));
    }

    #[tokio::test]
    async fn test_unmask_listed_rejects_blank_id() {
        let sync = ApiKeysSync::new(Arc::new(MockApiKeysClient::new()), Arc::new(ConsoleNotifier));

        assert!(unmask_listed(&sync, vec!["  ".to_string()]).is_err());
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_table(&KeysSnapshot::default()), "No API keys\n");
    }
}
