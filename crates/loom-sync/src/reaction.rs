//! Reaction-pattern detection (§4.6): a message whose text is a compact
//! `react:<emoji>:<target-message-id>` token is a reaction on a previously
//! synced message, not a new chat line.

use loom_core::models::ChatReaction;

pub fn parse_reaction(text: &str, from_user: &str) -> Option<ChatReaction> {
    let rest = text.trim().strip_prefix("react:")?;
    let (emoji, target) = rest.split_once(':')?;
    if emoji.is_empty() || target.is_empty() {
        return None;
    }
    Some(ChatReaction {
        target_message_id: target.to_string(),
        emoji: emoji.to_string(),
        from_user: from_user.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_reaction_token() {
        let reaction = parse_reaction("react:👍:msg-42", "alice").unwrap();
        assert_eq!(reaction.emoji, "👍");
        assert_eq!(reaction.target_message_id, "msg-42");
        assert_eq!(reaction.from_user, "alice");
    }

    #[test]
    fn non_reaction_text_is_not_parsed() {
        assert!(parse_reaction("just a normal message", "alice").is_none());
    }

    #[test]
    fn malformed_reaction_token_is_rejected() {
        assert!(parse_reaction("react::msg-42", "alice").is_none());
        assert!(parse_reaction("react:👍:", "alice").is_none());
    }
}
