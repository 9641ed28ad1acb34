use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use crate::spotify::embeds::login_embed;
use tempo_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "login",
    desc: "Start linking your Spotify account.",
    category: "spotify",
    usage: "!login",
};

/// Present the authorization URL that starts the linking flow.
///
/// Nothing is persisted here; the credential record only appears once the
/// user completes `!auth` with the code from the redirect.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let authorize_url = ctx.spotify.authorize_url();
    let embed = login_embed(&authorize_url)?;

    ctx.http
        .create_message(msg.channel_id)
        .embeds(&[embed])
        .await?;

    Ok(())
}
