//! Document paths: `collection/doc[/collection/doc...]`.

/// Collection holding persisted task timers.
pub const TIMERS: &str = "timers";

pub fn user_config(user_id: &str) -> String {
    format!("users/{user_id}/config/main")
}

pub fn schedule(user_id: &str, date: &str) -> String {
    format!("users/{user_id}/schedules/{date}")
}

pub fn checkin(user_id: &str, date: &str) -> String {
    format!("users/{user_id}/checkins/{date}")
}

pub fn timer(key: &str) -> String {
    format!("{TIMERS}/{key}")
}

/// Parent collection of a document path (`users/1/config/main` → `users/1/config`).
pub fn collection_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}
