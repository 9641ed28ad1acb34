pub mod artists;
pub mod auth;
pub mod embeds;
pub mod login;
pub mod logout;
pub mod recent;
pub mod tracks;

use tracing::error;
use twilight_http::Client;
use twilight_model::gateway::payload::incoming::MessageCreate;
use twilight_model::id::{Id, marker::ChannelMarker};

use tempo_core::Context;
use tempo_spotify::{AuthSession, SpotifyError};

use self::embeds::{NOT_LINKED_MESSAGE, STORAGE_FAILED_MESSAGE, TRY_AGAIN_MESSAGE};

/// Items fetched per query; the Spotify API maximum. The full list is
/// fetched once and paginated locally.
pub(crate) const FETCH_LIMIT: usize = 50;

/// Records shown per embed page.
pub(crate) const ITEMS_PER_PAGE: usize = 10;

/// Validate the author's credential and return a live session.
///
/// On failure the user already got the appropriate prompt (login hint for
/// unlinked or revoked accounts, retry hint for upstream trouble) and the
/// command should return without further output.
pub(crate) async fn checked_session(
    ctx: &Context,
    msg: &MessageCreate,
) -> anyhow::Result<Option<AuthSession>> {
    match ctx.spotify.check(msg.author.id.get()).await {
        Ok(session) => Ok(Some(session)),
        Err(SpotifyError::NotAuthenticated) => {
            ctx.http
                .create_message(msg.channel_id)
                .content(NOT_LINKED_MESSAGE)
                .await?;
            Ok(None)
        }
        Err(source) if source.is_transient() => {
            ctx.http
                .create_message(msg.channel_id)
                .content(TRY_AGAIN_MESSAGE)
                .await?;
            Ok(None)
        }
        Err(source) => {
            error!(?source, user_id = msg.author.id.get(), "credential check failed");
            ctx.http
                .create_message(msg.channel_id)
                .content(STORAGE_FAILED_MESSAGE)
                .await?;
            Ok(None)
        }
    }
}

/// Report a failed data fetch without tearing down the command flow.
pub(crate) async fn report_fetch_failure(
    http: &Client,
    channel_id: Id<ChannelMarker>,
    source: &SpotifyError,
) -> anyhow::Result<()> {
    error!(?source, "spotify data fetch failed");
    http.create_message(channel_id)
        .content(TRY_AGAIN_MESSAGE)
        .await?;

    Ok(())
}
