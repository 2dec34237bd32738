//! # DaySlot Channels
//! Discord plumbing: the interactions payload model, response and component
//! builders, the REST client, request signature checks, and the outbound
//! [`Messenger`] seam the bot talks through.

pub mod discord;
pub mod messenger;

pub use discord::rest::DiscordRest;
pub use discord::verify::SignatureVerifier;
pub use messenger::{MessageRef, Messenger};
