//! # DaySlot Core
//! Shared types, configuration, and the small pure functions behind every
//! slash command: slot placement, habit prompts, check-in progression and
//! the daily summary.

pub mod checkin;
pub mod config;
pub mod error;
pub mod habits;
pub mod paths;
pub mod planner;
pub mod setup;
pub mod traits;
pub mod types;

pub use config::DaySlotConfig;
pub use error::{DaySlotError, Result};
pub use traits::DocumentStore;
