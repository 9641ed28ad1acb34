//! Message sending, in-place updates, and expiry scheduling for sessions.

use std::sync::Arc;
use std::time::Duration;

use twilight_http::Client;
use twilight_model::{
    channel::message::{Component, MessageFlags, embed::Embed},
    gateway::payload::incoming::InteractionCreate,
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::{
        Id,
        marker::{ChannelMarker, MessageMarker},
    },
};
use twilight_util::builder::InteractionResponseDataBuilder;

use crate::embed::rendered_page_embed;

use super::components::build_nav_components;
use super::record::{PageHeader, PageSet};
use super::render::render;
use super::session::{PaginationRegistry, PaginationSession};

/// Shown instead of an empty first page when a result set has no items.
pub const NO_RECORDS_MESSAGE: &str = "You have no records";

/// Generic message shown when a nav interaction belongs to another user.
pub const PAGINATION_WRONG_USER_MESSAGE: &str = "This pagination session belongs to another user.";
/// Generic message shown when a nav interaction has expired.
pub const PAGINATION_EXPIRED_MESSAGE: &str =
    "This pagination session expired. Run the command again.";
/// Generic message shown when a nav interaction payload is invalid.
pub const PAGINATION_INVALID_MESSAGE: &str = "Invalid pagination interaction.";

/// Send a paginated result and, when it spans multiple pages, open a session.
///
/// An empty set is reported explicitly with no navigation controls and no
/// session; a single-page set is sent without controls; otherwise page 1 is
/// sent with the nav row, the session is registered under the new message id,
/// and the inactivity timer starts.
pub async fn send_paginated_session(
    http: Arc<Client>,
    registry: Arc<PaginationRegistry>,
    channel_id: Id<ChannelMarker>,
    command: &str,
    owner_user_id: u64,
    set: PageSet,
    header: PageHeader,
    timeout_secs: u64,
) -> anyhow::Result<()> {
    let rendered = render(&set, &header, 1);
    let embed = rendered_page_embed(&rendered)?;

    if set.is_empty() {
        http.create_message(channel_id)
            .content(NO_RECORDS_MESSAGE)
            .embeds(&[embed])
            .await?;
        return Ok(());
    }

    let total = set.total_pages();
    let components = build_nav_components(command, 1, total, owner_user_id, timeout_secs);

    let message = http
        .create_message(channel_id)
        .embeds(&[embed])
        .components(&components)
        .await?
        .model()
        .await?;

    if total > 1 {
        let session = PaginationSession::new(command, owner_user_id, set, header);
        registry.insert(message.id.get(), session).await;
        schedule_expiry(registry, http, message.channel_id, message.id, timeout_secs).await;
    }

    Ok(())
}

/// Arm (or re-arm) the inactivity timer for a session.
///
/// When the timer fires the session is released exactly once and the
/// message's controls are stripped; a navigation event racing the timer
/// either re-arms it first or finds the session already gone.
pub async fn schedule_expiry(
    registry: Arc<PaginationRegistry>,
    http: Arc<Client>,
    channel_id: Id<ChannelMarker>,
    message_id: Id<MessageMarker>,
    timeout_secs: u64,
) {
    let message_key = message_id.get();

    let task = tokio::spawn({
        let registry = Arc::clone(&registry);
        async move {
            tokio::time::sleep(Duration::from_secs(timeout_secs)).await;

            if registry.expire(message_key).await.is_some() {
                strip_message_components(&http, channel_id, message_id).await;
            }
        }
    });

    registry.set_expiry_task(message_key, task).await;
}

/// Remove interactive controls from a sent message, keeping its embed.
pub async fn strip_message_components(
    http: &Client,
    channel_id: Id<ChannelMarker>,
    message_id: Id<MessageMarker>,
) {
    let empty_components: [Component; 0] = [];
    let _ = http
        .update_message(channel_id, message_id)
        .components(Some(&empty_components))
        .await;
}

/// Respond to a component interaction with an in-place message update.
pub async fn respond_update_message(
    http: &Client,
    interaction: &InteractionCreate,
    embeds: &[Embed],
    components: &[Component],
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::UpdateMessage,
        data: Some(
            InteractionResponseDataBuilder::new()
                .embeds(embeds.to_vec())
                .components(components.to_vec())
                .build(),
        ),
    };

    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await?;

    Ok(())
}

/// Respond to a component interaction with an ephemeral message.
pub async fn respond_ephemeral_message(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .content(content)
                .flags(MessageFlags::EPHEMERAL)
                .build(),
        ),
    };

    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await?;

    Ok(())
}

/// Respond with the standard wrong-owner pagination message.
pub async fn respond_wrong_user(
    http: &Client,
    interaction: &InteractionCreate,
) -> anyhow::Result<()> {
    respond_ephemeral_message(http, interaction, PAGINATION_WRONG_USER_MESSAGE).await
}

/// Respond with the standard expired pagination message.
pub async fn respond_expired(http: &Client, interaction: &InteractionCreate) -> anyhow::Result<()> {
    respond_ephemeral_message(http, interaction, PAGINATION_EXPIRED_MESSAGE).await
}

/// Respond with the standard invalid pagination message.
pub async fn respond_invalid(http: &Client, interaction: &InteractionCreate) -> anyhow::Result<()> {
    respond_ephemeral_message(http, interaction, PAGINATION_INVALID_MESSAGE).await
}
