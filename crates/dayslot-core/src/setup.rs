//! Parsing the `/setup` modal into a [`UserConfig`].

use chrono::Utc;
use thiserror::Error;

use crate::types::UserConfig;

/// Raw text from the setup form.
#[derive(Debug, Clone, Default)]
pub struct SetupForm {
    pub start_hour: String,
    pub journal_channel: String,
    pub positive_habits: String,
    pub negative_habits: String,
}

/// Problems with the submitted form, worded for the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("Invalid hour. Please use a number between 0 and 23.")]
    InvalidHour,
    #[error("Could not find channel with ID `{0}`. Make sure I have access to it!")]
    UnknownChannel(String),
}

impl SetupForm {
    /// Validate and normalize. Channel existence is checked by the caller.
    pub fn parse(&self) -> Result<UserConfig, SetupError> {
        let start_hour = self
            .start_hour
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|h| *h <= 23)
            .ok_or(SetupError::InvalidHour)?;

        let channel = self.journal_channel.trim();
        let channel_id = channel
            .parse::<u64>()
            .map_err(|_| SetupError::UnknownChannel(channel.to_string()))?;

        Ok(UserConfig {
            start_hour,
            journal_channel_id: channel_id.to_string(),
            positive_habits: split_habits(&self.positive_habits),
            negative_habits: split_habits(&self.negative_habits),
            updated_at: Utc::now(),
        })
    }
}

/// One habit per line; whitespace trimmed, blank lines dropped.
pub fn split_habits(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(String::from)
        .collect()
}
