use std::sync::Arc;

use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use crate::spotify::embeds::{profile_header, recent_records};
use crate::spotify::{FETCH_LIMIT, ITEMS_PER_PAGE, checked_session, report_fetch_failure};
use tempo_core::Context;
use tempo_utils::pagination::{DEFAULT_TIMEOUT_SECS, PageSet, send_paginated_session};

pub const META: CommandMeta = CommandMeta {
    name: "recent",
    desc: "See your recently played tracks.",
    category: "spotify",
    usage: "!recent",
};

/// Show the author's listening history as a paginated embed.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let Some(session) = checked_session(&ctx, &msg).await? else {
        return Ok(());
    };

    let plays = match ctx
        .spotify
        .client()
        .recently_played(&session.access_token, FETCH_LIMIT)
        .await
    {
        Ok(plays) => plays,
        Err(source) => {
            return report_fetch_failure(&ctx.http, msg.channel_id, &source).await;
        }
    };

    send_paginated_session(
        Arc::clone(&ctx.http),
        Arc::clone(&ctx.sessions),
        msg.channel_id,
        META.name,
        msg.author.id.get(),
        PageSet::new(recent_records(plays), ITEMS_PER_PAGE),
        profile_header("Recently Played Tracks", &session.profile),
        DEFAULT_TIMEOUT_SECS,
    )
    .await
}
