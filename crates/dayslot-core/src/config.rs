//! DaySlot configuration system.
//!
//! Values come from `~/.dayslot/config.toml` (missing file → defaults) and
//! are then overridden by environment variables such as `DISCORD_TOKEN` and
//! `DATABASE_URL`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DaySlotError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySlotConfig {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub checkin: CheckInConfig,
}

impl DaySlotConfig {
    /// Load config from the default path (~/.dayslot/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DaySlotError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| DaySlotError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the given path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| DaySlotError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the DaySlot home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dayslot")
    }

    /// Apply environment overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("DISCORD_TOKEN") {
            self.discord.bot_token = v;
        }
        if let Some(v) = get("DISCORD_APPLICATION_ID") {
            self.discord.application_id = v;
        }
        if let Some(v) = get("DISCORD_PUBLIC_KEY") {
            self.discord.public_key = v;
        }
        if let Some(v) = get("DISCORD_GUILD_ID") {
            self.discord.guild_id = Some(v);
        }
        if let Some(v) = get("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = get("DAYSLOT_HOST") {
            self.gateway.host = v;
        }
        if let Some(v) = get("DAYSLOT_PORT") {
            self.gateway.port = v
                .trim()
                .parse()
                .map_err(|_| DaySlotError::Config(format!("DAYSLOT_PORT is not a port: {v}")))?;
        }
        Ok(())
    }

    /// Check that everything needed to talk to Discord is present.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("DISCORD_TOKEN", self.discord.bot_token.is_empty()),
            ("DISCORD_APPLICATION_ID", self.discord.application_id.is_empty()),
            ("DISCORD_PUBLIC_KEY", self.discord.public_key.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, empty)| empty.then_some(name))
        .collect();

        if !missing.is_empty() {
            return Err(DaySlotError::Config(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }
        if self.database.url.trim().is_empty() {
            return Err(DaySlotError::Config("database.url is empty".into()));
        }
        Ok(())
    }

    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.gateway.host, self.gateway.port)
    }
}

/// Discord application credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub application_id: String,
    /// Hex-encoded Ed25519 public key from the developer portal.
    #[serde(default)]
    pub public_key: String,
    /// Register commands to one guild (instant) instead of globally.
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String { "https://discord.com/api/v10".into() }

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            application_id: String::new(),
            public_key: String::new(),
            guild_id: None,
            api_base: default_api_base(),
        }
    }
}

/// Document store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String { "sqlite://~/.dayslot/dayslot.db".into() }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: default_database_url() }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_interactions_path")]
    pub interactions_path: String,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3000 }
fn default_interactions_path() -> String { "/interactions".into() }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            interactions_path: default_interactions_path(),
        }
    }
}

/// Check-in dialog timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInConfig {
    /// Inactivity window while answering habit questions.
    #[serde(default = "default_answer_timeout")]
    pub answer_timeout_secs: u64,
    /// How long to wait for the journal entry before summarizing without it.
    #[serde(default = "default_journal_timeout")]
    pub journal_timeout_secs: u64,
}

fn default_answer_timeout() -> u64 { 300 }
fn default_journal_timeout() -> u64 { 600 }

impl Default for CheckInConfig {
    fn default() -> Self {
        Self {
            answer_timeout_secs: default_answer_timeout(),
            journal_timeout_secs: default_journal_timeout(),
        }
    }
}
