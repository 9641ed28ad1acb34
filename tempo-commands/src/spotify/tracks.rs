use std::sync::Arc;

use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use crate::spotify::embeds::{profile_header, track_records};
use crate::spotify::{FETCH_LIMIT, ITEMS_PER_PAGE, checked_session, report_fetch_failure};
use tempo_core::Context;
use tempo_spotify::TimeRange;
use tempo_utils::pagination::{DEFAULT_TIMEOUT_SECS, PageSet, send_paginated_session};

pub const META: CommandMeta = CommandMeta {
    name: "tracks",
    desc: "See your most listened tracks.",
    category: "spotify",
    usage: "!tracks [short|medium|long]",
};

/// Show the author's top tracks as a paginated embed.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let Some(session) = checked_session(&ctx, &msg).await? else {
        return Ok(());
    };

    let range = TimeRange::parse(arg1);
    let tracks = match ctx
        .spotify
        .client()
        .top_tracks(&session.access_token, FETCH_LIMIT, range)
        .await
    {
        Ok(tracks) => tracks,
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
        PageSet::new(track_records(tracks), ITEMS_PER_PAGE),
        profile_header("Top Tracks", &session.profile),
        DEFAULT_TIMEOUT_SECS,
    )
    .await
}
