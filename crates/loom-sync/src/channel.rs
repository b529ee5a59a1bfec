//! Channel-metadata extraction (§4.6): display name, handle, message id,
//! and reply target are pulled off the raw session record and attached to
//! the outgoing `ChatMessage` before it reaches the Store.

use loom_core::models::chat::SessionRecord;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ChannelMetadata {
    pub display_name: Option<String>,
    pub handle: Option<String>,
    pub reply_to: Option<String>,
}

impl ChannelMetadata {
    pub fn extract(record: &SessionRecord) -> Option<Self> {
        if record.display_name.is_none() && record.handle.is_none() && record.reply_to.is_none() {
            return None;
        }
        Some(Self {
            display_name: record.display_name.clone(),
            handle: record.handle.clone(),
            reply_to: record.reply_to.clone(),
        })
    }

    pub fn to_source_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
