/// Failure taxonomy for the Spotify integration.
///
/// `NotAuthenticated` and `ExchangeFailed` are normal outcomes that command
/// handlers turn into user-facing prompts. `Http` and `Api` are transient
/// upstream failures and never cause credential deletion.
#[derive(Debug, thiserror::Error)]
pub enum SpotifyError {
    #[error("no linked Spotify account")]
    NotAuthenticated,
    #[error("authorization code rejected: {0}")]
    ExchangeFailed(String),
    #[error("spotify request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("spotify returned status {status}: {detail}")]
    Api { status: u16, detail: String },
    #[error("credential storage: {0}")]
    Store(#[from] std::io::Error),
    #[error("credential encoding: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("timestamp parse: {0}")]
    Timestamp(#[from] time::error::Parse),
}

impl SpotifyError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Api { .. })
    }
}
