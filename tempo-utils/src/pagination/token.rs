//! Custom-id token encoding, parsing, and validation for nav buttons.
//!
//! Page state lives server-side in the session registry; the token only
//! carries what is needed to route the press and reject foreign or stale
//! interactions before any registry lookup.

use std::time::{SystemTime, UNIX_EPOCH};

use super::session::NavAction;

const TOKEN_PREFIX: &str = "pg";

/// Parsed nav-button token data from a component custom ID.
#[derive(Debug, Clone, PartialEq)]
pub struct NavToken {
    /// Logical command name (e.g. `artists`).
    pub command: String,
    pub action: NavAction,
    /// User ID that owns this pagination session.
    pub user_id: u64,
    /// Expiry timestamp (unix seconds).
    pub expires_at: u64,
}

/// Validation outcome for nav-button presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavValidationError {
    Invalid,
    WrongUser,
    Expired,
}

/// Build a compact custom ID for one nav button.
pub fn build_custom_id(command: &str, action: NavAction, user_id: u64, expires_at: u64) -> String {
    format!(
        "{TOKEN_PREFIX}:{command}:{}:{user_id}:{expires_at}",
        action.as_str()
    )
}

/// Parse a nav custom ID.
pub fn parse_custom_id(custom_id: &str) -> Option<NavToken> {
    let mut parts = custom_id.split(':');

    let prefix = parts.next()?;
    if prefix != TOKEN_PREFIX {
        return None;
    }

    let command = parts.next()?.to_owned();
    let action = NavAction::parse(parts.next()?)?;
    let user_id = parts.next()?.parse::<u64>().ok()?;
    let expires_at = parts.next()?.parse::<u64>().ok()?;

    if parts.next().is_some() {
        return None;
    }

    Some(NavToken {
        command,
        action,
        user_id,
        expires_at,
    })
}

/// Validate a nav token for the acting user and expiry.
pub fn validate_custom_id(
    custom_id: &str,
    actor_user_id: u64,
) -> Result<NavToken, NavValidationError> {
    let token = parse_custom_id(custom_id).ok_or(NavValidationError::Invalid)?;

    if token.user_id != actor_user_id {
        return Err(NavValidationError::WrongUser);
    }

    if is_expired(token.expires_at) {
        return Err(NavValidationError::Expired);
    }

    Ok(token)
}

/// Whether the provided unix timestamp is already expired.
pub fn is_expired(expires_at: u64) -> bool {
    now_unix_secs() > expires_at
}

pub(crate) fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAR_FUTURE: u64 = u64::MAX / 2;

    #[test]
    fn custom_id_round_trips() {
        let custom_id = build_custom_id("artists", NavAction::Next, 42, FAR_FUTURE);
        let token = parse_custom_id(&custom_id).unwrap();

        assert_eq!(token.command, "artists");
        assert_eq!(token.action, NavAction::Next);
        assert_eq!(token.user_id, 42);
        assert_eq!(token.expires_at, FAR_FUTURE);
    }

    #[test]
    fn foreign_prefix_and_malformed_ids_do_not_parse() {
        assert!(parse_custom_id("other:artists:next:42:1").is_none());
        assert!(parse_custom_id("pg:artists:sideways:42:1").is_none());
        assert!(parse_custom_id("pg:artists:next:notanid:1").is_none());
        assert!(parse_custom_id("pg:artists:next:42:1:extra").is_none());
    }

    #[test]
    fn wrong_user_is_rejected_before_expiry() {
        let custom_id = build_custom_id("artists", NavAction::Prev, 42, 0);

        assert_eq!(
            validate_custom_id(&custom_id, 43),
            Err(NavValidationError::WrongUser)
        );
    }

    #[test]
    fn expired_token_is_rejected_for_the_owner() {
        let custom_id = build_custom_id("artists", NavAction::Prev, 42, 1);

        assert_eq!(
            validate_custom_id(&custom_id, 42),
            Err(NavValidationError::Expired)
        );
    }

    #[test]
    fn live_token_validates_for_the_owner() {
        let custom_id = build_custom_id("recent", NavAction::Close, 42, FAR_FUTURE);
        let token = validate_custom_id(&custom_id, 42).unwrap();

        assert_eq!(token.action, NavAction::Close);
        assert_eq!(token.command, "recent");
    }
}
