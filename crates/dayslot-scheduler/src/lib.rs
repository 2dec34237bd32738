//! # DaySlot Scheduler
//!
//! Timers for running tasks. Starting a task arms one completion timer; when
//! it fires the user gets a DM.
//!
//! ```text
//! /starttask ──▶ TaskTimers::start ──▶ timers/{uid}_{task} (persisted)
//!                      └── TimerRegistry (tokio sleep, one per key)
//!                               └── fires ──▶ Notifier ──▶ Messenger::send_dm
//! startup ──▶ TaskTimers::restore ──▶ re-arm persisted timers
//! ```

pub mod dispatch;
pub mod notify;
pub mod registry;
pub mod timers;

pub use dispatch::DmNotifier;
pub use notify::{Notification, Notifier};
pub use registry::TimerRegistry;
pub use timers::{TaskTimers, TimerRecord};
