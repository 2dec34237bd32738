//! Test doubles shared by the handler and route tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use dayslot_channels::discord::verify::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use dayslot_channels::discord::{Interaction, MessagePayload};
use dayslot_channels::{MessageRef, Messenger, SignatureVerifier};
use dayslot_core::config::DaySlotConfig;
use dayslot_core::error::{DaySlotError, Result};
use dayslot_core::traits::DocumentStore;
use dayslot_core::types::UserConfig;
use dayslot_db::MemoryDocumentStore;
use ed25519_dalek::{Signer, SigningKey};
use serde_json::{Value, json};

use crate::server::AppState;

pub const USER: &str = "42";
pub const JOURNAL_CHANNEL: &str = "123456789012345678";

/// Records everything the bot sends.
#[derive(Default)]
pub struct FakeMessenger {
    pub dms: Mutex<Vec<(String, MessagePayload)>>,
    pub posts: Mutex<Vec<(String, MessagePayload)>>,
    pub edits: Mutex<Vec<(MessageRef, MessagePayload)>>,
    pub channels: Mutex<HashSet<String>>,
    pub dm_blocked: AtomicBool,
    pub posts_fail: AtomicBool,
    next_id: AtomicU64,
}

impl FakeMessenger {
    pub fn dm_texts(&self) -> Vec<String> {
        self.dms
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, p)| p.content.clone())
            .collect()
    }

    fn next_ref(&self, channel_id: &str) -> MessageRef {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        MessageRef {
            channel_id: channel_id.to_string(),
            message_id: format!("m{n}"),
        }
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    fn name(&self) -> &str {
        "fake"
    }

    async fn send_dm(&self, user_id: &str, payload: MessagePayload) -> Result<MessageRef> {
        if self.dm_blocked.load(Ordering::SeqCst) {
            return Err(DaySlotError::Forbidden("Cannot send messages to this user".into()));
        }
        self.dms
            .lock()
            .unwrap()
            .push((user_id.to_string(), payload));
        Ok(self.next_ref(&format!("dm-{user_id}")))
    }

    async fn send_channel_message(
        &self,
        channel_id: &str,
        payload: MessagePayload,
    ) -> Result<MessageRef> {
        if self.posts_fail.load(Ordering::SeqCst) {
            return Err(DaySlotError::Forbidden("Missing Permissions".into()));
        }
        if !self.channels.lock().unwrap().contains(channel_id) {
            return Err(DaySlotError::NotFound(format!("channel {channel_id}")));
        }
        self.posts
            .lock()
            .unwrap()
            .push((channel_id.to_string(), payload));
        Ok(self.next_ref(channel_id))
    }

    async fn edit_message(&self, message: &MessageRef, payload: MessagePayload) -> Result<()> {
        self.edits.lock().unwrap().push((message.clone(), payload));
        Ok(())
    }

    async fn channel_exists(&self, channel_id: &str) -> Result<bool> {
        Ok(self.channels.lock().unwrap().contains(channel_id))
    }
}

/// Memory store whose writes under `fail_prefix` error out.
pub struct FailingStore {
    inner: MemoryDocumentStore,
    fail_prefix: String,
}

impl FailingStore {
    pub fn new(fail_prefix: &str) -> Self {
        Self {
            inner: MemoryDocumentStore::new(),
            fail_prefix: fail_prefix.to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn get(&self, path: &str) -> Result<Option<Value>> {
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, doc: Value) -> Result<()> {
        if path.contains(&self.fail_prefix) {
            return Err(DaySlotError::Database("disk full".into()));
        }
        self.inner.set(path, doc).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.inner.delete(path).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        self.inner.list(collection).await
    }
}

pub struct TestBot {
    pub state: Arc<AppState>,
    pub messenger: Arc<FakeMessenger>,
    pub key: SigningKey,
}

impl TestBot {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryDocumentStore::new()))
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        let messenger = Arc::new(FakeMessenger::default());
        messenger
            .channels
            .lock()
            .unwrap()
            .insert(JOURNAL_CHANNEL.to_string());
        let state = AppState::new(
            DaySlotConfig::default(),
            SignatureVerifier::from_key(key.verifying_key()),
            store,
            messenger.clone(),
        );
        Self {
            state: Arc::new(state),
            messenger,
            key,
        }
    }

    /// A copy of the state for `build_router`.
    pub fn state_value(&self) -> AppState {
        (*self.state).clone()
    }

    /// Save a config for [`USER`].
    pub async fn configure(&self, positive: &[&str], negative: &[&str]) -> UserConfig {
        let config = UserConfig {
            start_hour: 7,
            journal_channel_id: JOURNAL_CHANNEL.into(),
            positive_habits: positive.iter().map(|s| s.to_string()).collect(),
            negative_habits: negative.iter().map(|s| s.to_string()).collect(),
            updated_at: chrono::Utc::now(),
        };
        self.state.users.save_config(USER, &config).await.unwrap();
        config
    }
}

fn parse(value: Value) -> Interaction {
    serde_json::from_value(value).unwrap()
}

/// Slash command from [`USER`] in a guild.
pub fn command(name: &str, options: Value) -> Interaction {
    parse(json!({
        "id": "100",
        "type": 2,
        "token": "tok",
        "guild_id": "5",
        "member": {"user": {"id": USER, "username": "ana", "avatar": null}},
        "data": {"name": name, "options": options}
    }))
}

/// Button click or select from [`USER`] on `message_id` in `channel_id`.
pub fn component(
    custom_id: &str,
    values: &[&str],
    channel_id: &str,
    message_id: &str,
) -> Interaction {
    let component_type = if values.is_empty() { 2 } else { 3 };
    parse(json!({
        "id": "101",
        "type": 3,
        "token": "tok",
        "user": {"id": USER, "username": "ana"},
        "message": {"id": message_id, "channel_id": channel_id},
        "data": {
            "custom_id": custom_id,
            "component_type": component_type,
            "values": values
        }
    }))
}

/// Modal submit from [`USER`].
pub fn modal(custom_id: &str, fields: &[(&str, &str)]) -> Interaction {
    let rows: Vec<Value> = fields
        .iter()
        .map(|(id, value)| {
            json!({"type": 1, "components": [{"type": 4, "custom_id": id, "value": value}]})
        })
        .collect();
    parse(json!({
        "id": "102",
        "type": 5,
        "token": "tok",
        "user": {"id": USER, "username": "ana"},
        "data": {"custom_id": custom_id, "components": rows}
    }))
}

/// POST /interactions signed by `key`.
pub fn signed_request(key: &SigningKey, body: &str) -> Request<Body> {
    let timestamp = "1700000000";
    let mut message = timestamp.as_bytes().to_vec();
    message.extend_from_slice(body.as_bytes());
    let signature = hex::encode(key.sign(&message).to_bytes());
    Request::post("/interactions")
        .header(SIGNATURE_HEADER, signature)
        .header(TIMESTAMP_HEADER, timestamp)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
