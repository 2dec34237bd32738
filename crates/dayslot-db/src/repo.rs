//! Typed access to a user's documents.

use std::sync::Arc;

use dayslot_core::error::Result;
use dayslot_core::paths;
use dayslot_core::planner;
use dayslot_core::traits::DocumentStore;
use dayslot_core::types::{CheckInRecord, DaySchedule, UserConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Reads and writes `users/{uid}/...` documents as domain types.
#[derive(Clone)]
pub struct UserStore {
    store: Arc<dyn DocumentStore>,
}

impl UserStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn read<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        match self.store.get(path).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    async fn write<T: Serialize>(&self, path: &str, value: &T) -> Result<()> {
        self.store.set(path, serde_json::to_value(value)?).await
    }

    pub async fn config(&self, user_id: &str) -> Result<Option<UserConfig>> {
        self.read(&paths::user_config(user_id)).await
    }

    pub async fn save_config(&self, user_id: &str, config: &UserConfig) -> Result<()> {
        self.write(&paths::user_config(user_id), config).await?;
        tracing::info!("⚙️ Saved config for user {user_id}");
        Ok(())
    }

    pub async fn schedule(&self, user_id: &str, date: &str) -> Result<Option<DaySchedule>> {
        self.read(&paths::schedule(user_id, date)).await
    }

    /// Today's schedule, creating and persisting four empty slots on first access.
    pub async fn schedule_or_create(
        &self,
        user_id: &str,
        date: &str,
        start_hour: u8,
    ) -> Result<DaySchedule> {
        if let Some(existing) = self.schedule(user_id, date).await? {
            return Ok(existing);
        }
        let fresh = planner::new_day(date, start_hour);
        self.save_schedule(user_id, &fresh).await?;
        tracing::debug!("📅 Created schedule {date} for user {user_id}");
        Ok(fresh)
    }

    pub async fn save_schedule(&self, user_id: &str, schedule: &DaySchedule) -> Result<()> {
        self.write(&paths::schedule(user_id, &schedule.date), schedule)
            .await
    }

    pub async fn checkin(&self, user_id: &str, date: &str) -> Result<Option<CheckInRecord>> {
        self.read(&paths::checkin(user_id, date)).await
    }

    pub async fn save_checkin(&self, user_id: &str, record: &CheckInRecord) -> Result<()> {
        self.write(&paths::checkin(user_id, &record.date), record)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryDocumentStore;
    use crate::SqliteDocumentStore;

    fn config() -> UserConfig {
        UserConfig {
            start_hour: 6,
            journal_channel_id: "123456789012345678".into(),
            positive_habits: vec!["Gym".into()],
            negative_habits: vec!["Sugar".into()],
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_config_roundtrip() {
        let users = UserStore::new(Arc::new(MemoryDocumentStore::new()));
        assert!(users.config("1").await.unwrap().is_none());
        let cfg = config();
        users.save_config("1", &cfg).await.unwrap();
        assert_eq!(users.config("1").await.unwrap(), Some(cfg));
    }

    #[tokio::test]
    async fn test_schedule_created_once() {
        let users = UserStore::new(Arc::new(SqliteDocumentStore::open_in_memory().unwrap()));
        let mut day = users.schedule_or_create("1", "2026-03-01", 6).await.unwrap();
        assert_eq!(day.slots[0].start_hour, 6);

        planner::place_task(&mut day, "Read", 30).unwrap();
        users.save_schedule("1", &day).await.unwrap();

        // Second access returns the stored day, not a fresh one.
        let again = users.schedule_or_create("1", "2026-03-01", 9).await.unwrap();
        assert_eq!(again.slots[0].start_hour, 6);
        assert_eq!(again.slots[0].tasks.len(), 1);
        assert_eq!(again.slots[0].remaining_minutes, 210);
    }

    #[tokio::test]
    async fn test_schedules_are_per_user_and_date() {
        let users = UserStore::new(Arc::new(MemoryDocumentStore::new()));
        users.schedule_or_create("1", "2026-03-01", 6).await.unwrap();
        assert!(users.schedule("2", "2026-03-01").await.unwrap().is_none());
        assert!(users.schedule("1", "2026-03-02").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_checkin_roundtrip() {
        let users = UserStore::new(Arc::new(MemoryDocumentStore::new()));
        let record = CheckInRecord {
            date: "2026-03-01".into(),
            answers: vec![],
            journal: Some("Good day".into()),
            summary: None,
            recorded_at: chrono::Utc::now(),
            completed_at: None,
        };
        users.save_checkin("1", &record).await.unwrap();
        let loaded = users.checkin("1", "2026-03-01").await.unwrap().unwrap();
        assert_eq!(loaded.journal.as_deref(), Some("Good day"));
    }
}
