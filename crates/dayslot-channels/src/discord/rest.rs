//! Discord REST API client (bot token auth).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use dayslot_core::config::DiscordConfig;
use dayslot_core::error::{DaySlotError, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::response::MessagePayload;
use crate::messenger::{MessageRef, Messenger};

pub struct DiscordRest {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    application_id: String,
    /// user id → DM channel id
    dm_channels: Mutex<HashMap<String, String>>,
}

impl DiscordRest {
    pub fn new(config: &DiscordConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!(
                    "DiscordBot (https://github.com/dayslot/dayslot, ",
                    env!("CARGO_PKG_VERSION"),
                    ")"
                ))
                .build()
                .unwrap_or_default(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            application_id: config.application_id.clone(),
            dm_channels: Mutex::new(HashMap::new()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let mut req = self
            .client
            .request(method.clone(), self.url(path))
            .header("Authorization", format!("Bot {}", self.bot_token));
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req
            .send()
            .await
            .map_err(|e| DaySlotError::Discord(format!("{method} {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(if status == StatusCode::FORBIDDEN {
                DaySlotError::Forbidden(format!("{path}: {error_text}"))
            } else if status == StatusCode::NOT_FOUND {
                DaySlotError::NotFound(format!("{path}: {error_text}"))
            } else {
                DaySlotError::Discord(format!(
                    "Discord API error {status} on {method} {path}: {error_text}"
                ))
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        response
            .json()
            .await
            .map_err(|e| DaySlotError::Discord(format!("Invalid Discord response: {e}")))
    }

    /// Open the DM channel with a user, cached per user.
    pub async fn dm_channel(&self, user_id: &str) -> Result<String> {
        let cached = self
            .dm_channels
            .lock()
            .ok()
            .and_then(|c| c.get(user_id).cloned());
        if let Some(id) = cached {
            return Ok(id);
        }
        let body = serde_json::json!({ "recipient_id": user_id });
        let channel = self
            .request(Method::POST, "/users/@me/channels", Some(&body))
            .await?;
        let id = channel["id"]
            .as_str()
            .ok_or_else(|| DaySlotError::Discord("DM channel response without id".into()))?
            .to_string();
        if let Ok(mut cache) = self.dm_channels.lock() {
            cache.insert(user_id.to_string(), id.clone());
        }
        Ok(id)
    }

    pub async fn create_message(
        &self,
        channel_id: &str,
        payload: &MessagePayload,
    ) -> Result<MessageRef> {
        let body = serde_json::to_value(payload)?;
        let message = self
            .request(
                Method::POST,
                &format!("/channels/{channel_id}/messages"),
                Some(&body),
            )
            .await?;
        let message_id = message["id"].as_str().unwrap_or_default().to_string();
        tracing::debug!("Discord message sent: {message_id} → {channel_id}");
        Ok(MessageRef {
            channel_id: channel_id.to_string(),
            message_id,
        })
    }

    pub async fn get_channel(&self, channel_id: &str) -> Result<Value> {
        self.request(Method::GET, &format!("/channels/{channel_id}"), None)
            .await
    }

    /// Bulk-overwrite the application's slash commands, globally or for one guild.
    /// Returns how many commands Discord now has registered.
    pub async fn register_commands(
        &self,
        guild_id: Option<&str>,
        commands: &[Value],
    ) -> Result<usize> {
        if self.application_id.is_empty() {
            return Err(DaySlotError::Config("discord.application_id is not set".into()));
        }
        let path = match guild_id {
            Some(guild) => format!(
                "/applications/{}/guilds/{guild}/commands",
                self.application_id
            ),
            None => format!("/applications/{}/commands", self.application_id),
        };
        let body = Value::Array(commands.to_vec());
        let registered = self.request(Method::PUT, &path, Some(&body)).await?;
        let count = registered.as_array().map(|a| a.len()).unwrap_or(0);
        tracing::info!(
            "📝 Registered {count} slash commands ({})",
            guild_id.map(|g| format!("guild {g}")).unwrap_or_else(|| "global".into())
        );
        Ok(count)
    }
}

#[async_trait]
impl Messenger for DiscordRest {
    fn name(&self) -> &str {
        "discord"
    }

    async fn send_dm(&self, user_id: &str, payload: MessagePayload) -> Result<MessageRef> {
        let channel_id = self.dm_channel(user_id).await?;
        self.create_message(&channel_id, &payload).await
    }

    async fn send_channel_message(
        &self,
        channel_id: &str,
        payload: MessagePayload,
    ) -> Result<MessageRef> {
        self.create_message(channel_id, &payload).await
    }

    async fn edit_message(&self, message: &MessageRef, payload: MessagePayload) -> Result<()> {
        let body = serde_json::to_value(&payload)?;
        self.request(
            Method::PATCH,
            &format!(
                "/channels/{}/messages/{}",
                message.channel_id, message.message_id
            ),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    async fn channel_exists(&self, channel_id: &str) -> Result<bool> {
        match self.get_channel(channel_id).await {
            Ok(_) => Ok(true),
            Err(DaySlotError::NotFound(_)) | Err(DaySlotError::Forbidden(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
