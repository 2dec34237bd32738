//! Notification dispatch: sends notifications as Discord DMs.

use std::sync::Arc;

use async_trait::async_trait;
use dayslot_channels::Messenger;
use dayslot_channels::discord::MessagePayload;
use dayslot_core::error::Result;

use crate::notify::{Notification, Notifier};

pub struct DmNotifier {
    messenger: Arc<dyn Messenger>,
}

impl DmNotifier {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self { messenger }
    }
}

#[async_trait]
impl Notifier for DmNotifier {
    fn name(&self) -> &str {
        "dm"
    }

    async fn notify(&self, notification: &Notification) -> Result<()> {
        self.messenger
            .send_dm(
                &notification.user_id,
                MessagePayload::text(notification.body.clone()),
            )
            .await?;
        tracing::info!(
            "🔔 Sent '{}' to user {} ({})",
            notification.title,
            notification.user_id,
            notification.source
        );
        Ok(())
    }
}
