use thiserror::Error;

/// Failure to read state from the monitored RPC endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Response is missing field '{0}'")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Failure to hand an alert to the notification channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertError {
    #[error("Alert delivery failed: {0}")]
    Transport(String),

    #[error("Alert delivery timed out: {0}")]
    Timeout(String),

    #[error("Alert rejected with HTTP status {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<reqwest::Error> for AlertError {
    fn from(e: reqwest::Error) -> Self {
        // The Bot API URL carries the bot token
        let e = e.without_url();
        if e.is_timeout() {
            AlertError::Timeout(e.to_string())
        } else {
            AlertError::Transport(e.to_string())
        }
    }
}
