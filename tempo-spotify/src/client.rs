//! Authenticated read-only client for the Spotify Web API.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use url::Url;

use crate::error::SpotifyError;
use crate::model::{Artist, RecentPlay, Track, UserProfile};
use crate::time_range::TimeRange;

/// Bounded timeout applied to every outbound Spotify request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Spotify application configuration.
///
/// Required fields are constructor parameters; the endpoint bases default to
/// the public Spotify hosts and are overridable for tests.
#[derive(Clone, Debug)]
pub struct SpotifyConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) redirect_uri: String,
    pub(crate) accounts_base: Url,
    pub(crate) api_base: Url,
}

impl SpotifyConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            accounts_base: "https://accounts.spotify.com"
                .parse()
                .expect("valid default URL"),
            api_base: "https://api.spotify.com"
                .parse()
                .expect("valid default URL"),
        }
    }

    /// Override the accounts (authorize/token) host.
    #[must_use]
    pub fn with_accounts_base(mut self, base: Url) -> Self {
        self.accounts_base = base;
        self
    }

    /// Override the Web API host.
    #[must_use]
    pub fn with_api_base(mut self, base: Url) -> Self {
        self.api_base = base;
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }
}

/// Read-only Spotify Web API client.
///
/// All operations take the caller's access token; credential lifecycle lives
/// in [`crate::auth::SpotifyAuth`].
pub struct SpotifyClient {
    config: SpotifyConfig,
    http: reqwest::Client,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client construction");

        Self { config, http }
    }

    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Fetch the linked account's public profile.
    ///
    /// Also serves as the cheap liveness probe for stored credentials.
    pub async fn me(&self, access_token: &str) -> Result<UserProfile, SpotifyError> {
        let me: MeResponse = self.get_json("/v1/me", &[], access_token).await?;

        Ok(UserProfile {
            display_name: me
                .display_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Spotify user".to_owned()),
            url: me.external_urls.spotify,
            image: me.images.into_iter().next().map(|image| image.url),
        })
    }

    /// Most-listened artists over the given window, best first.
    pub async fn top_artists(
        &self,
        access_token: &str,
        limit: usize,
        range: TimeRange,
    ) -> Result<Vec<Artist>, SpotifyError> {
        let query = [
            ("limit", limit.to_string()),
            ("time_range", range.as_query().to_owned()),
        ];
        let page: Paging<ArtistItem> = self
            .get_json("/v1/me/top/artists", &query, access_token)
            .await?;

        Ok(page.items.into_iter().map(Into::into).collect())
    }

    /// Most-listened tracks over the given window, best first.
    pub async fn top_tracks(
        &self,
        access_token: &str,
        limit: usize,
        range: TimeRange,
    ) -> Result<Vec<Track>, SpotifyError> {
        let query = [
            ("limit", limit.to_string()),
            ("time_range", range.as_query().to_owned()),
        ];
        let page: Paging<TrackItem> = self
            .get_json("/v1/me/top/tracks", &query, access_token)
            .await?;

        Ok(page.items.into_iter().map(Into::into).collect())
    }

    /// Listening history, most recent first.
    pub async fn recently_played(
        &self,
        access_token: &str,
        limit: usize,
    ) -> Result<Vec<RecentPlay>, SpotifyError> {
        let query = [("limit", limit.to_string())];
        let page: Paging<PlayItem> = self
            .get_json("/v1/me/player/recently-played", &query, access_token)
            .await?;

        page.items
            .into_iter()
            .map(|item| {
                let played_at = OffsetDateTime::parse(&item.played_at, &Rfc3339)?;
                Ok(RecentPlay {
                    track: item.track.into(),
                    played_at: played_at.unix_timestamp().max(0) as u64,
                })
            })
            .collect()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        access_token: &str,
    ) -> Result<T, SpotifyError> {
        let url = self
            .config
            .api_base
            .join(path)
            .expect("valid API path");

        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[derive(Deserialize)]
struct MeResponse {
    #[serde(default)]
    display_name: Option<String>,
    external_urls: ExternalUrls,
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Deserialize)]
struct ExternalUrls {
    spotify: String,
}

#[derive(Deserialize)]
struct Image {
    url: String,
}

#[derive(Deserialize)]
struct Paging<T> {
    items: Vec<T>,
}

#[derive(Deserialize)]
struct ArtistItem {
    name: String,
    external_urls: ExternalUrls,
    followers: Followers,
}

#[derive(Deserialize)]
struct Followers {
    total: u64,
}

impl From<ArtistItem> for Artist {
    fn from(item: ArtistItem) -> Self {
        Self {
            name: item.name,
            url: item.external_urls.spotify,
            followers: item.followers.total,
        }
    }
}

#[derive(Deserialize)]
struct TrackItem {
    name: String,
    external_urls: ExternalUrls,
    artists: Vec<ArtistRef>,
    album: AlbumRef,
}

#[derive(Deserialize)]
struct ArtistRef {
    name: String,
}

#[derive(Deserialize)]
struct AlbumRef {
    name: String,
    external_urls: ExternalUrls,
}

impl From<TrackItem> for Track {
    fn from(item: TrackItem) -> Self {
        Self {
            name: item.name,
            url: item.external_urls.spotify,
            artists: item.artists.into_iter().map(|artist| artist.name).collect(),
            album_name: item.album.name,
            album_url: item.album.external_urls.spotify,
        }
    }
}

#[derive(Deserialize)]
struct PlayItem {
    track: TrackItem,
    played_at: String,
}
