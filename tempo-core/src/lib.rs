use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use twilight_http::Client;

use tempo_spotify::SpotifyAuth;
use tempo_utils::pagination::PaginationRegistry;

/// Startup configuration, gathered from the environment in one place.
#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
    /// Directory holding one credential file per linked user.
    pub token_dir: PathBuf,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `SPOTIFY_TOKEN_DIR` is optional and defaults to `user_tokens`.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            discord_token: env::var("DISCORD_TOKEN")?,
            spotify_client_id: env::var("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: env::var("SPOTIFY_CLIENT_SECRET")?,
            spotify_redirect_uri: env::var("SPOTIFY_REDIRECT_URI")?,
            token_dir: env::var("SPOTIFY_TOKEN_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("user_tokens")),
        })
    }
}

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub spotify: Arc<SpotifyAuth>,
    pub sessions: Arc<PaginationRegistry>,
}

impl Context {
    /// Create a new application context.
    pub fn new(http: Arc<Client>, spotify: Arc<SpotifyAuth>) -> Self {
        Self {
            http,
            spotify,
            sessions: Arc::new(PaginationRegistry::new()),
        }
    }
}
