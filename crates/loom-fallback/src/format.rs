//! Header/body/footer formatting for recovered messages (§4.5).

use loom_core::models::chat::MessageRole;

use crate::scan::RecoveredMessage;

pub fn format_recovered_block(messages: &[RecoveredMessage]) -> String {
    let mut block = String::new();
    block.push_str("Recovered Context (Fallback)\n");
    block.push_str(&format!("count: {}\n\n", messages.len()));
    for message in messages {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
            MessageRole::Tool => "tool",
        };
        block.push_str(&format!("[{}] {}: {}\n", message.timestamp.to_rfc3339(), role, message.text));
    }
    block.push_str("\n=== End Recovered Context ===\n");
    block
}
