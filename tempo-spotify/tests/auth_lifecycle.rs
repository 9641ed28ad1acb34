//! Credential lifecycle tests against a mock OAuth authority and API.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tempo_spotify::{
    CredentialRecord, CredentialStore, SpotifyAuth, SpotifyClient, SpotifyConfig, SpotifyError,
};

const USER: u64 = 4242;

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn auth_against(server: &MockServer, dir: &TempDir) -> SpotifyAuth {
    let base: url::Url = server.uri().parse().unwrap();
    let config = SpotifyConfig::new("client-id", "client-secret", "http://127.0.0.1:3000")
        .with_accounts_base(base.clone())
        .with_api_base(base);

    SpotifyAuth::new(SpotifyClient::new(config), CredentialStore::new(dir.path()))
}

fn stored_record(expires_at: u64) -> CredentialRecord {
    CredentialRecord {
        access_token: "stored-access".to_owned(),
        refresh_token: "stored-refresh".to_owned(),
        token_type: "Bearer".to_owned(),
        expires_at,
        scopes: vec!["user-top-read".to_owned()],
    }
}

fn token_success(access_token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600,
        "scope": "user-top-read user-read-recently-played"
    }))
}

fn me_success() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "display_name": "Listener",
        "external_urls": { "spotify": "https://open.spotify.com/user/listener" },
        "images": [ { "url": "https://i.scdn.co/image/abc" } ]
    }))
}

#[tokio::test]
async fn exchange_from_redirect_url_persists_one_record() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let auth = auth_against(&server, &dir);

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=ABC123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-access",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "fresh-refresh",
            "scope": "user-top-read user-read-recently-played"
        })))
        .mount(&server)
        .await;

    let record = auth
        .exchange_code(USER, "https://host/cb?code=ABC123&state=xyz")
        .await
        .unwrap();

    assert_eq!(record.access_token, "fresh-access");
    assert_eq!(record.refresh_token, "fresh-refresh");

    let store = CredentialStore::new(dir.path());
    let stored = store.get(USER).await.unwrap().unwrap();
    assert_eq!(stored, record);
}

#[tokio::test]
async fn rejected_exchange_persists_nothing_and_keeps_prior_record() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let auth = auth_against(&server, &dir);

    let store = CredentialStore::new(dir.path());
    let prior = stored_record(now_unix() + 3600);
    store.put(USER, &prior).await.unwrap();

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid authorization code"
        })))
        .mount(&server)
        .await;

    let result = auth.exchange_code(USER, "BOGUS").await;

    assert!(matches!(result, Err(SpotifyError::ExchangeFailed(_))));
    assert_eq!(store.get(USER).await.unwrap().unwrap(), prior);
}

#[tokio::test]
async fn check_without_record_is_not_authenticated() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let auth = auth_against(&server, &dir);

    let result = auth.check(USER).await;

    assert!(matches!(result, Err(SpotifyError::NotAuthenticated)));
}

#[tokio::test]
async fn valid_credential_yields_live_session() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let auth = auth_against(&server, &dir);

    CredentialStore::new(dir.path())
        .put(USER, &stored_record(now_unix() + 3600))
        .await
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(me_success())
        .mount(&server)
        .await;

    let session = auth.check(USER).await.unwrap();

    assert_eq!(session.access_token, "stored-access");
    assert_eq!(session.profile.display_name, "Listener");
    assert_eq!(
        session.profile.image.as_deref(),
        Some("https://i.scdn.co/image/abc")
    );
}

#[tokio::test]
async fn expired_credential_refreshes_and_updates_record_in_place() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let auth = auth_against(&server, &dir);

    let store = CredentialStore::new(dir.path());
    store.put(USER, &stored_record(now_unix() - 10)).await.unwrap();

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=stored-refresh"))
        .respond_with(token_success("refreshed-access"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(me_success())
        .mount(&server)
        .await;

    let session = auth.check(USER).await.unwrap();
    assert_eq!(session.access_token, "refreshed-access");

    // The refresh response omitted a refresh token, so the old one stays.
    let stored = store.get(USER).await.unwrap().unwrap();
    assert_eq!(stored.access_token, "refreshed-access");
    assert_eq!(stored.refresh_token, "stored-refresh");
    assert!(stored.expires_at > now_unix());
}

#[tokio::test]
async fn revoked_refresh_clears_record_exactly_once() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let auth = auth_against(&server, &dir);

    let store = CredentialStore::new(dir.path());
    store.put(USER, &stored_record(now_unix() - 10)).await.unwrap();

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Refresh token revoked"
        })))
        .mount(&server)
        .await;

    let first = auth.check(USER).await;
    assert!(matches!(first, Err(SpotifyError::NotAuthenticated)));
    assert!(store.get(USER).await.unwrap().is_none());

    // Repeated probes stay NotAuthenticated without touching the authority.
    let second = auth.check(USER).await;
    assert!(matches!(second, Err(SpotifyError::NotAuthenticated)));
}

#[tokio::test]
async fn upstream_failure_is_transient_and_preserves_record() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let auth = auth_against(&server, &dir);

    let store = CredentialStore::new(dir.path());
    let record = stored_record(now_unix() + 3600);
    store.put(USER, &record).await.unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = auth.check(USER).await;

    match result {
        Err(source) => assert!(source.is_transient()),
        Ok(_) => panic!("probe against a 503 endpoint must fail"),
    }
    assert_eq!(store.get(USER).await.unwrap().unwrap(), record);
}

#[tokio::test]
async fn rate_limited_refresh_never_deletes_the_record() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let auth = auth_against(&server, &dir);

    let store = CredentialStore::new(dir.path());
    let record = stored_record(now_unix() - 10);
    store.put(USER, &record).await.unwrap();

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = auth.check(USER).await;

    match result {
        Err(source) => assert!(source.is_transient()),
        Ok(_) => panic!("rate-limited refresh must fail"),
    }
    assert_eq!(store.get(USER).await.unwrap().unwrap(), record);
}

#[tokio::test]
async fn stale_access_token_recovers_through_one_refresh() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let auth = auth_against(&server, &dir);

    let store = CredentialStore::new(dir.path());
    store.put(USER, &stored_record(now_unix() + 3600)).await.unwrap();

    // Expiry looks fine locally but the authority already rejects the token.
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(token_success("recovered-access"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(me_success())
        .mount(&server)
        .await;

    let session = auth.check(USER).await.unwrap();

    assert_eq!(session.access_token, "recovered-access");
    let stored = store.get(USER).await.unwrap().unwrap();
    assert_eq!(stored.access_token, "recovered-access");
}

#[tokio::test]
async fn logout_is_idempotent() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let auth = auth_against(&server, &dir);

    CredentialStore::new(dir.path())
        .put(USER, &stored_record(now_unix() + 3600))
        .await
        .unwrap();

    assert!(auth.logout(USER).await.unwrap());
    assert!(!auth.logout(USER).await.unwrap());
}

#[tokio::test]
async fn authorize_url_carries_client_and_scopes() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let auth = auth_against(&server, &dir);

    let url = auth.authorize_url();

    assert!(url.contains("response_type=code"));
    assert!(url.contains("client_id=client-id"));
    assert!(url.contains("user-top-read"));
    assert!(url.contains("user-read-recently-played"));
}
