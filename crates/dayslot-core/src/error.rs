//! Error type shared across DaySlot crates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaySlotError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Discord error: {0}")]
    Discord(String),

    /// The platform refused the call (DMs closed, missing channel permission).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DaySlotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let e = DaySlotError::Discord("403 Missing Access".into());
        assert_eq!(e.to_string(), "Discord error: 403 Missing Access");
        let e = DaySlotError::Config("DISCORD_TOKEN not set".into());
        assert!(e.to_string().starts_with("Config error"));
    }

    #[test]
    fn test_json_error_converts() {
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{not json")?)
        }
        assert!(matches!(parse(), Err(DaySlotError::Json(_))));
    }
}
