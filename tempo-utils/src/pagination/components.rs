//! Navigation button builders for paginated messages.

use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component};

use super::session::NavAction;
use super::token::{build_custom_id, now_unix_secs};

/// Build the first/prev/next/last/close button row for a paginated message.
///
/// Single-page results get no controls at all.
pub fn build_nav_components(
    command: &str,
    current_page: usize,
    total_pages: usize,
    user_id: u64,
    timeout_secs: u64,
) -> Vec<Component> {
    if total_pages <= 1 {
        return vec![];
    }

    let expires_at = now_unix_secs().saturating_add(timeout_secs);
    let at_start = current_page <= 1;
    let at_end = current_page >= total_pages;

    let buttons = [
        nav_button(command, NavAction::First, "«", at_start, user_id, expires_at),
        nav_button(command, NavAction::Prev, "◀ Prev", at_start, user_id, expires_at),
        nav_button(command, NavAction::Next, "Next ▶", at_end, user_id, expires_at),
        nav_button(command, NavAction::Last, "»", at_end, user_id, expires_at),
        nav_button(command, NavAction::Close, "✕", false, user_id, expires_at),
    ];

    vec![Component::ActionRow(ActionRow {
        components: buttons.into_iter().map(Component::Button).collect(),
    })]
}

fn nav_button(
    command: &str,
    action: NavAction,
    label: &str,
    disabled: bool,
    user_id: u64,
    expires_at: u64,
) -> Button {
    Button {
        custom_id: Some(build_custom_id(command, action, user_id, expires_at)),
        disabled,
        emoji: None,
        label: Some(label.to_owned()),
        style: match action {
            NavAction::Close => ButtonStyle::Danger,
            _ => ButtonStyle::Secondary,
        },
        url: None,
        sku_id: None,
    }
}
