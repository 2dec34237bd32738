//! Outbound messaging seam.

use async_trait::async_trait;
use dayslot_core::error::Result;
use serde::{Deserialize, Serialize};

use crate::discord::response::MessagePayload;

/// Address of a message the bot has sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel_id: String,
    pub message_id: String,
}

/// Everything the bot sends outside an interaction reply.
#[async_trait]
pub trait Messenger: Send + Sync {
    fn name(&self) -> &str;

    /// Open (or reuse) the DM channel with `user_id` and post there.
    async fn send_dm(&self, user_id: &str, payload: MessagePayload) -> Result<MessageRef>;

    async fn send_channel_message(
        &self,
        channel_id: &str,
        payload: MessagePayload,
    ) -> Result<MessageRef>;

    async fn edit_message(&self, message: &MessageRef, payload: MessagePayload) -> Result<()>;

    /// Whether the bot can see `channel_id`.
    async fn channel_exists(&self, channel_id: &str) -> Result<bool>;
}
