//! Per-user documents: the data model persisted in the document store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of slots in every day.
pub const SLOTS_PER_DAY: usize = 4;
/// Length of one slot in hours.
pub const SLOT_HOURS: u8 = 4;
/// Capacity of one slot in minutes.
pub const SLOT_MINUTES: u32 = SLOT_HOURS as u32 * 60;

/// A user's configuration, written by `/setup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Wake hour (0–23); the first slot starts here.
    pub start_hour: u8,
    /// Channel snowflake where daily journals are posted.
    pub journal_channel_id: String,
    #[serde(default)]
    pub positive_habits: Vec<String>,
    #[serde(default)]
    pub negative_habits: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl UserConfig {
    /// Total number of habits asked during a check-in.
    pub fn habit_count(&self) -> usize {
        self.positive_habits.len() + self.negative_habits.len()
    }
}

/// One day's four-slot schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub slots: Vec<Slot>,
}

/// A fixed 4-hour window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// 0–3.
    pub index: u8,
    pub start_hour: u8,
    pub total_minutes: u32,
    pub remaining_minutes: u32,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Slot {
    /// 1-based number shown to users.
    pub fn number(&self) -> u8 {
        self.index + 1
    }
}

/// A task placed in a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Minutes.
    pub duration: u32,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reflection: Option<Reflection>,
}

impl Task {
    pub fn new(name: &str, duration: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            duration,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            reflection: None,
        }
    }

    /// Label used in select menus: `Read (45m)`.
    pub fn label(&self) -> String {
        format!("{} ({}m)", self.name, self.duration)
    }
}

/// Task lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn emoji(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "◻️",
            TaskStatus::InProgress => "▶️",
            TaskStatus::Completed => "✅",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Answers from the task reflection modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    #[serde(default)]
    pub difficulties: String,
    #[serde(default)]
    pub interruptions: String,
    #[serde(default)]
    pub feelings: String,
    pub recorded_at: DateTime<Utc>,
}

/// Whether a habit is one to keep or one to avoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitKind {
    Positive,
    Negative,
}

/// One recorded yes/no answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitAnswer {
    pub habit: String,
    pub kind: HabitKind,
    /// The answer to the question as asked. Negative habits are asked as
    /// "Did you avoid …", so `true` is the good outcome for both kinds.
    pub yes: bool,
}

/// Computed result of a check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub title: String,
    pub text: String,
}

/// The daily check-in document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub date: String,
    pub answers: Vec<HabitAnswer>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub summary: Option<DailySummary>,
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_serializes_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn test_new_task_is_pending_with_unique_id() {
        let a = Task::new("Read", 30);
        let b = Task::new("Read", 30);
        assert_eq!(a.status, TaskStatus::Pending);
        assert_ne!(a.id, b.id);
        assert_eq!(a.label(), "Read (30m)");
    }

    #[test]
    fn test_old_task_documents_still_load() {
        let json = serde_json::json!({
            "id": "t1",
            "name": "Gym",
            "duration": 60,
            "status": "completed",
            "created_at": "2026-01-01T07:00:00Z"
        });
        let task: Task = serde_json::from_value(json).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.reflection.is_none());
    }
}
