use tracing::error;
use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use crate::spotify::embeds::{
    NOT_LINKED_LOGOUT_MESSAGE, STORAGE_FAILED_MESSAGE, UNLINKED_MESSAGE,
};
use tempo_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "logout",
    desc: "Unlink your Spotify account.",
    category: "spotify",
    usage: "!logout",
};

/// Delete the author's credential record. Safe to repeat.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let out = match ctx.spotify.logout(msg.author.id.get()).await {
        Ok(true) => UNLINKED_MESSAGE,
        Ok(false) => NOT_LINKED_LOGOUT_MESSAGE,
        Err(source) => {
            error!(?source, user_id = msg.author.id.get(), "logout failed");
            STORAGE_FAILED_MESSAGE
        }
    };

    ctx.http.create_message(msg.channel_id).content(out).await?;

    Ok(())
}
