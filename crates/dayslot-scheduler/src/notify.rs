//! Notifications raised when a timer fires.

use async_trait::async_trait;
use dayslot_core::error::Result;
use serde::{Deserialize, Serialize};

/// A message for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Recipient (platform user id).
    pub user_id: String,
    pub title: String,
    /// Full message text.
    pub body: String,
    /// What raised it, e.g. `timer:42_<task id>`.
    pub source: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Notification {
    /// The "time's up" DM for a task.
    pub fn times_up(user_id: &str, task_name: &str, source: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            title: "Time's up!".into(),
            body: times_up_text(task_name),
            source: source.to_string(),
            timestamp: chrono::Utc::now(),
        }
    }
}

pub fn times_up_text(task_name: &str) -> String {
    format!(
        "🔔 **Time's up!** Your task **'{task_name}'** is due to end.\n\nDon't forget to mark it as complete with `/done` to log your reflection!"
    )
}

/// Delivers notifications. Failures are reported, never retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;
    async fn notify(&self, notification: &Notification) -> Result<()>;
}
