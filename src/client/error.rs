use thiserror::Error;

/// Failure of a single call to the key management API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status. `message` is the body's
    /// `error` field when one could be read.
    #[error("API returned {status}: {}", message.as_deref().unwrap_or("no error message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// The request never produced a usable response
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Server-supplied message, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
