//! Credential lifecycle: authorize URL, code exchange, liveness, revocation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};
use url::Url;

use crate::OAUTH_SCOPES;
use crate::client::SpotifyClient;
use crate::error::SpotifyError;
use crate::model::UserProfile;
use crate::store::{CredentialRecord, CredentialStore};

/// Access tokens expiring within this window are refreshed up front.
const EXPIRY_SKEW_SECS: u64 = 30;

/// Ephemeral per-request binding of a validated credential to API capability.
///
/// Produced by [`SpotifyAuth::check`] and discarded once the response is
/// sent; never persisted.
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub access_token: String,
    pub profile: UserProfile,
}

/// Per-user OAuth credential manager.
///
/// State is recomputed on every command from the stored record alone: no
/// record means unlinked, a record that fails refresh with `invalid_grant`
/// was revoked remotely and is cleared on the spot. Operations for the same
/// user are serialized so a command racing a logout cannot interleave on the
/// stored record; different users never contend.
pub struct SpotifyAuth {
    client: SpotifyClient,
    store: CredentialStore,
    user_locks: Mutex<HashMap<u64, Arc<Mutex<()>>>>,
}

impl SpotifyAuth {
    pub fn new(client: SpotifyClient, store: CredentialStore) -> Self {
        Self {
            client,
            store,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying API client, for data fetches after a successful check.
    pub fn client(&self) -> &SpotifyClient {
        &self.client
    }

    /// URL the user opens in a browser to grant access.
    pub fn authorize_url(&self) -> String {
        let config = self.client.config();
        let mut url = config
            .accounts_base
            .join("/authorize")
            .expect("valid authorize path");

        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &config.client_id)
            .append_pair("redirect_uri", &config.redirect_uri)
            .append_pair("scope", &OAUTH_SCOPES.join(" "));

        url.into()
    }

    /// Exchange an authorization code (or pasted redirect URL) for tokens
    /// and persist the resulting credential record.
    ///
    /// On rejection nothing is persisted and any prior record is untouched.
    pub async fn exchange_code(
        &self,
        user_id: u64,
        input: &str,
    ) -> Result<CredentialRecord, SpotifyError> {
        let _guard = self.user_lock(user_id).await;

        let code = extract_authorization_code(input);
        if code.is_empty() {
            return Err(SpotifyError::ExchangeFailed("no code provided".to_owned()));
        }

        let config = self.client.config();
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
        ];

        let response = match self.post_token(&params).await {
            Ok(response) => response,
            Err(TokenFailure::Rejected { description, .. }) => {
                return Err(SpotifyError::ExchangeFailed(description));
            }
            Err(TokenFailure::Transient(source)) => return Err(source),
        };

        let record = build_record(response, None, now_unix_secs());
        self.store.put(user_id, &record).await?;
        info!(user_id, "spotify account linked");

        Ok(record)
    }

    /// Validate the user's stored credential and return a live session.
    ///
    /// Refreshes an expired access token in place, probes the API once, and
    /// clears the record only when the authority reports the refresh token
    /// invalid. Network failures, rate limits, and ambiguous rejections are
    /// surfaced as retryable errors and never delete the credential.
    pub async fn check(&self, user_id: u64) -> Result<AuthSession, SpotifyError> {
        let _guard = self.user_lock(user_id).await;

        let Some(mut record) = self.store.get(user_id).await? else {
            return Err(SpotifyError::NotAuthenticated);
        };

        if record.is_expired(now_unix_secs(), EXPIRY_SKEW_SECS) {
            self.refresh_in_place(user_id, &mut record).await?;
        }

        match self.client.me(&record.access_token).await {
            Ok(profile) => Ok(AuthSession {
                access_token: record.access_token,
                profile,
            }),
            Err(SpotifyError::Api { status: 401, .. }) => {
                // Token rejected despite a fresh-looking expiry. One refresh
                // attempt decides between revoked and stale.
                self.refresh_in_place(user_id, &mut record).await?;
                let profile = self.client.me(&record.access_token).await?;
                Ok(AuthSession {
                    access_token: record.access_token,
                    profile,
                })
            }
            Err(source) => Err(source),
        }
    }

    /// Unlink the user. Deleting a nonexistent record is not an error.
    pub async fn logout(&self, user_id: u64) -> Result<bool, SpotifyError> {
        let _guard = self.user_lock(user_id).await;

        let removed = self.store.delete(user_id).await?;
        if removed {
            info!(user_id, "spotify account unlinked");
        }

        Ok(removed)
    }

    /// Refresh the access token and persist the updated record.
    ///
    /// An `invalid_grant` rejection means the refresh token was revoked: the
    /// stored record is deleted (idempotently) and the caller sees
    /// `NotAuthenticated`. Any other rejection is treated as transient.
    async fn refresh_in_place(
        &self,
        user_id: u64,
        record: &mut CredentialRecord,
    ) -> Result<(), SpotifyError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", record.refresh_token.as_str()),
        ];

        match self.post_token(&params).await {
            Ok(response) => {
                *record = build_record(response, Some(record), now_unix_secs());
                self.store.put(user_id, record).await?;
                debug!(user_id, "access token refreshed");
                Ok(())
            }
            Err(TokenFailure::Rejected { error, .. }) if error == "invalid_grant" => {
                if self.store.delete(user_id).await? {
                    info!(user_id, "revoked credential cleared");
                }
                Err(SpotifyError::NotAuthenticated)
            }
            Err(TokenFailure::Rejected { status, error, description }) => {
                Err(SpotifyError::Api {
                    status,
                    detail: format!("{error}: {description}"),
                })
            }
            Err(TokenFailure::Transient(source)) => Err(source),
        }
    }

    async fn post_token(&self, params: &[(&str, &str)]) -> Result<TokenResponse, TokenFailure> {
        let config = self.client.config();
        let url = config
            .accounts_base
            .join("/api/token")
            .expect("valid token path");

        let response = self
            .client
            .http()
            .post(url)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(params)
            .send()
            .await
            .map_err(|source| TokenFailure::Transient(source.into()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<TokenResponse>()
                .await
                .map_err(|source| TokenFailure::Transient(source.into()));
        }

        let detail = response.text().await.unwrap_or_default();
        if status.is_client_error() && status.as_u16() != 429 {
            let body: OAuthErrorBody = serde_json::from_str(&detail).unwrap_or_default();
            return Err(TokenFailure::Rejected {
                status: status.as_u16(),
                description: body.error_description.unwrap_or_else(|| detail.clone()),
                error: body.error,
            });
        }

        Err(TokenFailure::Transient(SpotifyError::Api {
            status: status.as_u16(),
            detail,
        }))
    }

    async fn user_lock(&self, user_id: u64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.user_locks.lock().await;
            Arc::clone(locks.entry(user_id).or_default())
        };

        lock.lock_owned().await
    }
}

/// Pull the authorization code out of user input.
///
/// Users paste either the bare code or the entire redirect URL from the
/// browser bar; try the `code` query parameter first and fall back to
/// treating the whole (trimmed) input as the code.
pub fn extract_authorization_code(input: &str) -> String {
    let trimmed = input.trim();

    if let Ok(url) = Url::parse(trimmed)
        && let Some((_, code)) = url.query_pairs().find(|(key, _)| key == "code")
        && !code.is_empty()
    {
        return code.into_owned();
    }

    trimmed.to_owned()
}

enum TokenFailure {
    /// The authority rejected the grant itself (4xx with an OAuth body).
    Rejected {
        status: u16,
        error: String,
        description: String,
    },
    /// Network-level or upstream failure; retrying later may succeed.
    Transient(SpotifyError),
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: u64,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

#[derive(Default, Deserialize)]
struct OAuthErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Build the stored record from a token response.
///
/// A refresh response may omit the refresh token and scope; the prior
/// record's values carry over in that case.
fn build_record(
    response: TokenResponse,
    prior: Option<&CredentialRecord>,
    now_unix: u64,
) -> CredentialRecord {
    let refresh_token = response
        .refresh_token
        .or_else(|| prior.map(|record| record.refresh_token.clone()))
        .unwrap_or_default();

    let scopes = match response.scope {
        Some(scope) if !scope.is_empty() => {
            scope.split_whitespace().map(ToOwned::to_owned).collect()
        }
        _ => match prior {
            Some(record) => record.scopes.clone(),
            None => OAUTH_SCOPES.iter().map(|&scope| scope.to_owned()).collect(),
        },
    };

    CredentialRecord {
        access_token: response.access_token,
        refresh_token,
        token_type: response.token_type,
        expires_at: now_unix.saturating_add(response.expires_in),
        scopes,
    }
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}
