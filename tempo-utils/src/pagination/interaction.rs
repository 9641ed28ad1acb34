//! Validation and handling of nav-button interactions.

use std::sync::Arc;

use twilight_http::Client;
use twilight_model::gateway::payload::incoming::InteractionCreate;

use crate::embed::rendered_page_embed;

use super::components::build_nav_components;
use super::render::render;
use super::respond::{
    respond_expired, respond_invalid, respond_update_message, respond_wrong_user, schedule_expiry,
};
use super::session::{NavAction, PaginationRegistry};
use super::token::{NavValidationError, validate_custom_id};

/// Outcome when validating whether an interaction is a pagination button.
#[derive(Debug, Clone)]
pub enum NavValidation {
    /// Interaction does not target pagination buttons.
    NotForPagination,
    /// Interaction was invalid and already acknowledged with a response.
    HandledInvalid,
    /// Interaction is valid for its token's owner.
    Valid {
        actor_user_id: u64,
        action: NavAction,
    },
}

/// Validate a component interaction against its pagination token.
///
/// Foreign users and expired tokens are acknowledged with an ephemeral
/// notice and reported as handled, leaving all session state untouched.
pub async fn validate_nav_interaction(
    http: &Client,
    interaction: &InteractionCreate,
) -> anyhow::Result<NavValidation> {
    let Some(twilight_model::application::interaction::InteractionData::MessageComponent(
        component_data,
    )) = interaction.data.as_ref()
    else {
        return Ok(NavValidation::NotForPagination);
    };

    if !component_data.custom_id.starts_with("pg:") {
        return Ok(NavValidation::NotForPagination);
    }

    let Some(actor_user_id) = interaction.author_id().map(|id| id.get()) else {
        respond_invalid(http, interaction).await?;
        return Ok(NavValidation::HandledInvalid);
    };

    match validate_custom_id(&component_data.custom_id, actor_user_id) {
        Ok(token) => Ok(NavValidation::Valid {
            actor_user_id,
            action: token.action,
        }),
        Err(NavValidationError::WrongUser) => {
            respond_wrong_user(http, interaction).await?;
            Ok(NavValidation::HandledInvalid)
        }
        Err(NavValidationError::Expired) => {
            respond_expired(http, interaction).await?;
            Ok(NavValidation::HandledInvalid)
        }
        Err(NavValidationError::Invalid) => {
            respond_invalid(http, interaction).await?;
            Ok(NavValidation::HandledInvalid)
        }
    }
}

/// Handle one nav-button press against the session registry.
///
/// Returns `false` when the interaction is not a pagination button at all.
/// Every accepted transition re-renders from the session's stored page set
/// and updates the original message in place; the message thread never
/// grows.
pub async fn handle_pagination_interaction(
    http: Arc<Client>,
    registry: Arc<PaginationRegistry>,
    interaction: &InteractionCreate,
    timeout_secs: u64,
) -> anyhow::Result<bool> {
    let (actor_user_id, action) = match validate_nav_interaction(&http, interaction).await? {
        NavValidation::NotForPagination => return Ok(false),
        NavValidation::HandledInvalid => return Ok(true),
        NavValidation::Valid {
            actor_user_id,
            action,
        } => (actor_user_id, action),
    };

    let Some(message) = interaction.message.as_ref() else {
        respond_invalid(&http, interaction).await?;
        return Ok(true);
    };
    let message_key = message.id.get();

    let Some(entry) = registry.get(message_key).await else {
        // Session already closed, expired, or lost to a restart.
        respond_expired(&http, interaction).await?;
        return Ok(true);
    };

    // Serializes re-renders for this session; held across the update so a
    // rapid double-click cannot interleave.
    let mut session = entry.lock().await;

    if session.owner_user_id != actor_user_id {
        respond_wrong_user(&http, interaction).await?;
        return Ok(true);
    }

    if action == NavAction::Close {
        let rendered = render(&session.set, &session.header, session.current_page);
        let embed = rendered_page_embed(&rendered)?;
        drop(session);

        registry.remove(message_key).await;
        respond_update_message(&http, interaction, &[embed], &[]).await?;
        return Ok(true);
    }

    let page = session.apply(action);
    let rendered = render(&session.set, &session.header, page);
    let embed = rendered_page_embed(&rendered)?;
    let components = build_nav_components(
        &session.command,
        page,
        session.set.total_pages(),
        session.owner_user_id,
        timeout_secs,
    );

    respond_update_message(&http, interaction, &[embed], &components).await?;
    drop(session);

    schedule_expiry(
        registry,
        Arc::clone(&http),
        message.channel_id,
        message.id,
        timeout_secs,
    )
    .await;

    Ok(true)
}
