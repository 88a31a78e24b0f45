//! Correlation ids linking a user turn to its streamed reply.
//!
//! A correlation id has the shape `"<serverEventId>___<epochMillis>"`. The
//! prefix before the separator is sent back to the service as `requestId`
//! on the next turn, which lets a conversation continue a server-side
//! exchange; an id without a prefix starts a fresh one.

use chrono::Utc;

/// Separator between the server event id and the local timestamp suffix.
pub const SEPARATOR: &str = "___";

/// Mint the correlation id for the next turn from the last server event id.
#[must_use]
pub fn mint(server_event_id: &str) -> String {
    format!("{server_event_id}{SEPARATOR}{}", Utc::now().timestamp_millis())
}

/// A correlation id with no server prefix, used when no prior exchange
/// exists to continue.
#[must_use]
pub fn fresh() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// Derive the `requestId` sent to the service from a correlation id.
///
/// This is the prefix before [`SEPARATOR`], or the current epoch millis
/// when the prefix is empty.
#[must_use]
pub fn request_token(correlation_id: &str) -> String {
    let prefix = correlation_id
        .split(SEPARATOR)
        .next()
        .unwrap_or_default();
    if prefix.is_empty() {
        fresh()
    } else {
        prefix.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_token_takes_prefix() {
        assert_eq!(request_token("evt-42___1700000000000"), "evt-42");
    }

    #[test]
    fn request_token_passes_plain_id_through() {
        // A freshly minted id with no separator is its own token.
        assert_eq!(request_token("1700000000000"), "1700000000000");
    }

    #[test]
    fn request_token_falls_back_for_empty_prefix() {
        let token = request_token("___1700000000000");
        assert!(!token.is_empty());
        assert!(token.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn mint_embeds_event_id_and_separator() {
        let id = mint("evt-7");
        assert!(id.starts_with("evt-7___"));
        assert_eq!(request_token(&id), "evt-7");
    }
}
