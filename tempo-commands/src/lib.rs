pub mod spotify;
pub mod utility;

use std::sync::Arc;

use twilight_model::{
    application::interaction::InteractionData,
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
};

use tempo_core::Context;
use tempo_utils::COMMAND_PREFIX;
use tempo_utils::pagination::{DEFAULT_TIMEOUT_SECS, handle_pagination_interaction};

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::help::META,
    spotify::login::META,
    spotify::auth::META,
    spotify::logout::META,
    spotify::artists::META,
    spotify::tracks::META,
    spotify::recent::META,
    // Add new commands here
];

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let content_owned = msg.content.clone();
    let content = content_owned.trim();

    if content.starts_with("hi") {
        let greeting = format!("Hi there! <@{}>!", msg.author.id.get());
        ctx.http.create_message(msg.channel_id).content(&greeting).await?;
        return Ok(());
    }

    if !content.starts_with(COMMAND_PREFIX) {
        return Ok(());
    }

    let content = content.trim_start_matches(COMMAND_PREFIX).trim();
    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let cmd = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
    let arg1 = command_and_rest
        .next()
        .and_then(|rest| rest.split_whitespace().next())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);
    let arg1 = arg1.as_deref();

    match cmd.as_str() {
        "help" => utility::help::run(ctx.clone(), msg).await?,
        "login" => spotify::login::run(ctx.clone(), msg).await?,
        "auth" => spotify::auth::run(ctx.clone(), msg, arg1).await?,
        "logout" => spotify::logout::run(ctx.clone(), msg).await?,
        "artists" => spotify::artists::run(ctx.clone(), msg, arg1).await?,
        "tracks" => spotify::tracks::run(ctx.clone(), msg, arg1).await?,
        "recent" => spotify::recent::run(ctx.clone(), msg).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}

pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    let custom_id = match interaction.data.as_ref() {
        Some(InteractionData::MessageComponent(data)) => data.custom_id.clone(),
        _ => return Ok(()),
    };

    if custom_id.starts_with("pg:") {
        let _handled = handle_pagination_interaction(
            Arc::clone(&ctx.http),
            Arc::clone(&ctx.sessions),
            &interaction,
            DEFAULT_TIMEOUT_SECS,
        )
        .await?;
    }

    Ok(())
}
