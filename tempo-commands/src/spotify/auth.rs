use tracing::error;
use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use crate::spotify::embeds::{
    AUTH_USAGE_MESSAGE, EXCHANGE_FAILED_MESSAGE, LINKED_MESSAGE, STORAGE_FAILED_MESSAGE,
    TRY_AGAIN_MESSAGE,
};
use tempo_core::Context;
use tempo_spotify::SpotifyError;

pub const META: CommandMeta = CommandMeta {
    name: "auth",
    desc: "Finish linking with the code from the login page.",
    category: "spotify",
    usage: "!auth <code>",
};

/// Complete the linking flow by exchanging the pasted code.
///
/// Accepts either the bare code or the full redirect URL. A rejected code
/// leaves any previously linked account untouched.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;

    let Some(input) = arg1 else {
        http.create_message(msg.channel_id)
            .content(AUTH_USAGE_MESSAGE)
            .await?;
        return Ok(());
    };

    let out = match ctx.spotify.exchange_code(msg.author.id.get(), input).await {
        Ok(_) => LINKED_MESSAGE,
        Err(SpotifyError::ExchangeFailed(_)) => EXCHANGE_FAILED_MESSAGE,
        Err(source) if source.is_transient() => TRY_AGAIN_MESSAGE,
        Err(source) => {
            error!(?source, user_id = msg.author.id.get(), "code exchange failed");
            STORAGE_FAILED_MESSAGE
        }
    };

    http.create_message(msg.channel_id).content(out).await?;

    Ok(())
}
