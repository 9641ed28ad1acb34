/// Per-user credential lifecycle: liveness checks, code exchange, revocation.
pub mod auth;
/// Authenticated Spotify Web API client.
pub mod client;
/// Error taxonomy for auth, API, and storage failures.
pub mod error;
/// Clean domain types produced by the API client.
pub mod model;
/// Durable per-user credential storage.
pub mod store;
/// Lenient time-range normalization for the "top" queries.
pub mod time_range;

pub use auth::{AuthSession, SpotifyAuth, extract_authorization_code};
pub use client::{SpotifyClient, SpotifyConfig};
pub use error::SpotifyError;
pub use model::{Artist, RecentPlay, Track, UserProfile};
pub use store::{CredentialRecord, CredentialStore};
pub use time_range::TimeRange;

/// OAuth scopes requested when linking an account.
pub const OAUTH_SCOPES: [&str; 2] = ["user-top-read", "user-read-recently-played"];
