//! CLI for the API key dashboard
//!
//! - `serve`: run the key management API
//! - `keys`: manage keys against a running server

pub mod keys;
pub mod serve;

use clap::{Parser, Subcommand};

/// API key dashboard - create, list, rename, delete and validate API keys
#[derive(Parser)]
#[command(name = "api-key-dashboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the key management API server
    Serve,

    /// Manage keys through a running server
    Keys(keys::KeysArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["api-key-dashboard", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_keys() {
        let cli = Cli::try_parse_from([
            "api-key-dashboard",
            "keys",
            "--api-url",
            "http://localhost:4000",
            "rename",
            "k1",
            "new name",
        ])
        .unwrap();

        let Command::Keys(args) = cli.command else {
            panic!("expected keys command");
        };
        assert_eq!(args.api_url.as_deref(), Some("http://localhost:4000"));
        assert!(matches!(
            args.action,
            keys::KeysAction::Rename { ref id, ref name } if id == "k1" && name == "new name"
        ));
    }
}
