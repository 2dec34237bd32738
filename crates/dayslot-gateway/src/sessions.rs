//! Live check-in sessions. In memory only; a restart drops them.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dayslot_channels::MessageRef;
use dayslot_core::checkin::CheckIn;
use dayslot_scheduler::TimerRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Waiting for a Yes/No click.
    Answering,
    /// All habits answered; waiting for the journal or a skip.
    AwaitingJournal,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub checkin: CheckIn,
    /// Day the check-in belongs to.
    pub date: String,
    /// The DM carrying the buttons.
    pub message: MessageRef,
    pub user_name: String,
    pub avatar_url: String,
    pub stage: Stage,
    /// Bumped on every step; a timeout only acts on the turn it was armed for.
    pub turn: u64,
}

impl Session {
    pub fn new(
        checkin: CheckIn,
        date: String,
        message: MessageRef,
        user_name: &str,
        avatar_url: String,
    ) -> Self {
        Self {
            checkin,
            date,
            message,
            user_name: user_name.to_string(),
            avatar_url,
            stage: Stage::Answering,
            turn: 0,
        }
    }
}

/// user id → session, plus one inactivity timer per user.
#[derive(Clone)]
pub struct CheckInSessions {
    live: Arc<Mutex<HashMap<String, Session>>>,
    timeouts: TimerRegistry<String>,
    pub answer_timeout: Duration,
    pub journal_timeout: Duration,
}

impl CheckInSessions {
    pub fn new(answer_timeout: Duration, journal_timeout: Duration) -> Self {
        Self {
            live: Arc::new(Mutex::new(HashMap::new())),
            timeouts: TimerRegistry::new(),
            answer_timeout,
            journal_timeout,
        }
    }

    /// Begin a session, replacing any previous one for the user.
    pub fn begin(&self, user_id: &str, session: Session) -> Option<Session> {
        self.timeouts.cancel(&user_id.to_string());
        self.live
            .lock()
            .ok()
            .and_then(|mut live| live.insert(user_id.to_string(), session))
    }

    /// Run `f` on the user's session, if one is live.
    pub fn update<R>(&self, user_id: &str, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut live = self.live.lock().ok()?;
        live.get_mut(user_id).map(f)
    }

    /// End the session and its timeout.
    pub fn finish(&self, user_id: &str) -> Option<Session> {
        self.timeouts.cancel(&user_id.to_string());
        self.live.lock().ok()?.remove(user_id)
    }

    /// End the session only if it hasn't moved past `turn`.
    pub fn expire(&self, user_id: &str, turn: u64) -> Option<Session> {
        let mut live = self.live.lock().ok()?;
        if live.get(user_id).is_some_and(|s| s.turn == turn) {
            return live.remove(user_id);
        }
        None
    }

    pub fn stage(&self, user_id: &str) -> Option<Stage> {
        self.update(user_id, |s| s.stage)
    }

    pub fn is_live(&self, user_id: &str) -> bool {
        self.live
            .lock()
            .map(|live| live.contains_key(user_id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (Re)arm the user's inactivity timer.
    pub fn arm_timeout<F, Fut>(&self, user_id: &str, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.timeouts.arm(user_id.to_string(), delay, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayslot_core::types::UserConfig;

    fn session() -> Session {
        let config = UserConfig {
            start_hour: 7,
            journal_channel_id: "1".into(),
            positive_habits: vec!["Read".into()],
            negative_habits: vec![],
            updated_at: chrono::Utc::now(),
        };
        Session::new(
            CheckIn::new(&config).unwrap(),
            "2026-03-01".into(),
            MessageRef {
                channel_id: "dm".into(),
                message_id: "m1".into(),
            },
            "ana",
            String::new(),
        )
    }

    #[tokio::test]
    async fn test_begin_update_finish() {
        let sessions = CheckInSessions::new(Duration::from_secs(300), Duration::from_secs(600));
        assert!(sessions.begin("42", session()).is_none());
        assert!(sessions.is_live("42"));
        assert_eq!(sessions.stage("42"), Some(Stage::Answering));

        sessions.update("42", |s| s.stage = Stage::AwaitingJournal);
        assert_eq!(sessions.stage("42"), Some(Stage::AwaitingJournal));

        assert!(sessions.begin("42", session()).is_some());
        assert_eq!(sessions.len(), 1);
        assert!(sessions.finish("42").is_some());
        assert!(sessions.is_empty());
        assert!(sessions.update("42", |_| ()).is_none());
    }

    #[tokio::test]
    async fn test_expire_respects_turn() {
        let sessions = CheckInSessions::new(Duration::from_secs(300), Duration::from_secs(600));
        sessions.begin("42", session());
        sessions.update("42", |s| s.turn += 1);
        assert!(sessions.expire("42", 0).is_none());
        assert!(sessions.expire("42", 1).is_some());
        assert!(!sessions.is_live("42"));
    }
}
