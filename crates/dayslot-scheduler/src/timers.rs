//! Task completion timers, persisted so they survive a restart.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dayslot_core::error::Result;
use dayslot_core::paths;
use dayslot_core::traits::DocumentStore;
use dayslot_core::types::Task;
use serde::{Deserialize, Serialize};

use crate::notify::{Notification, Notifier};
use crate::registry::TimerRegistry;

/// A pending "time's up" DM, stored at `timers/{user}_{task}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerRecord {
    pub user_id: String,
    pub task_id: String,
    pub task_name: String,
    pub duration_minutes: u32,
    pub fires_at: DateTime<Utc>,
}

impl TimerRecord {
    pub fn key(&self) -> String {
        timer_key(&self.user_id, &self.task_id)
    }

    /// Time left until the record fires; zero once overdue.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.fires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

pub fn timer_key(user_id: &str, task_id: &str) -> String {
    format!("{user_id}_{task_id}")
}

pub struct TaskTimers {
    registry: TimerRegistry<String>,
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl TaskTimers {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            registry: TimerRegistry::new(),
            store,
            notifier,
        }
    }

    /// Arm the completion timer for a task that was just started.
    /// Starting the same task again replaces its timer.
    pub async fn start(&self, user_id: &str, task: &Task) -> Result<TimerRecord> {
        let record = TimerRecord {
            user_id: user_id.to_string(),
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            duration_minutes: task.duration,
            fires_at: Utc::now() + chrono::Duration::minutes(i64::from(task.duration)),
        };
        self.store
            .set(&paths::timer(&record.key()), serde_json::to_value(&record)?)
            .await?;
        self.arm(record.clone(), Duration::from_secs(u64::from(task.duration) * 60));
        tracing::info!(
            "⏱️ Timer started for '{}' ({}m), user {}",
            record.task_name,
            record.duration_minutes,
            user_id
        );
        Ok(record)
    }

    /// Drop a task's timer. Returns whether one was pending.
    pub async fn cancel(&self, user_id: &str, task_id: &str) -> Result<bool> {
        let key = timer_key(user_id, task_id);
        let was_armed = self.registry.cancel(&key);
        self.store.delete(&paths::timer(&key)).await?;
        if was_armed {
            tracing::debug!("⏱️ Timer cancelled: {key}");
        }
        Ok(was_armed)
    }

    /// Re-arm every persisted timer. Overdue ones fire right away.
    pub async fn restore(&self) -> Result<usize> {
        let now = Utc::now();
        let mut restored = 0;
        for (path, doc) in self.store.list(paths::TIMERS).await? {
            let record: TimerRecord = match serde_json::from_value(doc) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("⚠️ Dropping unreadable timer {path}: {e}");
                    self.store.delete(&path).await?;
                    continue;
                }
            };
            let delay = record.remaining(now);
            self.arm(record, delay);
            restored += 1;
        }
        if restored > 0 {
            tracing::info!("⏱️ Restored {restored} task timer(s)");
        }
        Ok(restored)
    }

    pub fn is_armed(&self, user_id: &str, task_id: &str) -> bool {
        self.registry.is_armed(&timer_key(user_id, task_id))
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.registry.len()
    }

    fn arm(&self, record: TimerRecord, delay: Duration) {
        let store = Arc::clone(&self.store);
        let notifier = Arc::clone(&self.notifier);
        let key = record.key();
        self.registry.arm(key.clone(), delay, move || async move {
            let notification =
                Notification::times_up(&record.user_id, &record.task_name, &format!("timer:{key}"));
            if let Err(e) = notifier.notify(&notification).await {
                tracing::error!(
                    "⚠️ Could not notify user {} about '{}': {e}",
                    record.user_id,
                    record.task_name
                );
            }
            if let Err(e) = clear_fired(store.as_ref(), &key, record.fires_at).await {
                tracing::warn!("⚠️ Could not clear fired timer {key}: {e}");
            }
        });
    }
}

/// Delete a fired timer's record unless a restart has already replaced it.
async fn clear_fired(store: &dyn DocumentStore, key: &str, fires_at: DateTime<Utc>) -> Result<()> {
    let path = paths::timer(key);
    let current = store
        .get(&path)
        .await?
        .and_then(|doc| serde_json::from_value::<TimerRecord>(doc).ok());
    if current.is_none_or(|r| r.fires_at == fires_at) {
        store.delete(&path).await?;
    }
    Ok(())
}
